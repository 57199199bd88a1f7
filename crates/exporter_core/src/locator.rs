use std::fmt;

use crate::{MessageId, RawMessageRecord};

/// Scroll geometry of one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: u64,
    pub scroll_height: u64,
    pub client_height: u64,
}

impl ScrollMetrics {
    /// Content taller than the viewport, i.e. the element can actually scroll.
    pub fn overflows(&self) -> bool {
        self.scroll_height > self.client_height
    }
}

/// The engine's view of the host document.
///
/// Every query is evaluated against the current document state; nothing may be
/// cached between calls because the host keeps re-rendering its window.
pub trait Locator {
    type Node: Clone + PartialEq + fmt::Debug;
    type Item: Clone + 'static;

    /// Container of the message items, if the host currently renders one.
    fn find_list_root(&self) -> Option<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn metrics(&self, node: &Self::Node) -> ScrollMetrics;

    /// Hosts clamp the written offset to their scrollable range.
    fn set_scroll_top(&mut self, node: &Self::Node, offset: u64);

    /// Message items currently rendered, in document order.
    fn list_visible_items(&self) -> Vec<Self::Item>;

    fn extract_identity(&self, item: &Self::Item) -> Option<MessageId>;

    /// Base record with empty defaults for any absent substructure.
    fn extract_base(&self, item: &Self::Item) -> RawMessageRecord;

    /// Walks up from `seed` to the first node whose content overflows its
    /// viewport. Falls back to `seed` when no such ancestor exists.
    fn find_scrollable_ancestor(&self, seed: &Self::Node) -> Self::Node {
        let mut candidate = Some(seed.clone());
        while let Some(node) = candidate {
            if self.metrics(&node).overflows() {
                return node;
            }
            candidate = self.parent(&node);
        }
        seed.clone()
    }
}
