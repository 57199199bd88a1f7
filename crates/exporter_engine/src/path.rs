use std::fmt;

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Position of an element as child indices from the root element.
///
/// Unlike parsed node handles, a path stays meaningful across re-parses of
/// the same document, which is what a live host hands us on every query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ElementPath(Vec<usize>);

impl ElementPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn of(element: ElementRef<'_>) -> Self {
        let mut indices = Vec::new();
        let mut node: NodeRef<'_, Node> = *element;
        while let Some(parent) = node.parent() {
            if !parent.value().is_element() {
                break;
            }
            indices.push(node.prev_siblings().filter(|n| n.value().is_element()).count());
            node = parent;
        }
        indices.reverse();
        Self(indices)
    }

    pub fn resolve<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let mut current = document.root_element();
        for &index in &self.0 {
            current = current.children().filter_map(ElementRef::wrap).nth(index)?;
        }
        Some(current)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("html")?;
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}
