use exporter_core::{MessageId, ScrollMetrics};

use crate::ElementPath;

/// Narrow bridge to a live document: its current markup and scroll state.
pub trait ScrollHost {
    /// Serialized markup of the document as currently rendered.
    fn markup(&self) -> &str;

    fn metrics(&self, path: &ElementPath) -> ScrollMetrics;

    fn set_scroll_top(&mut self, path: &ElementPath, offset: u64);
}

/// A message item captured at scan time; outlives the host's rendering window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub identity: Option<MessageId>,
    pub html: String,
}
