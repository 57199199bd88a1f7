use std::collections::HashSet;

use crate::MessageId;

/// Insertion-ordered set of every identity discovered in the current run.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    index: HashSet<MessageId>,
    order: Vec<MessageId>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `id` was not seen before.
    pub fn insert(&mut self, id: MessageId) -> bool {
        if self.index.contains(&id) {
            return false;
        }
        self.index.insert(id.clone());
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    /// Discovery order, first-seen first.
    pub fn order(&self) -> &[MessageId] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_discovery_order_without_duplicates() {
        let mut seen = SeenSet::new();
        assert!(seen.insert("b".into()));
        assert!(seen.insert("a".into()));
        assert!(!seen.insert("b".into()));

        assert_eq!(seen.len(), 2);
        assert_eq!(seen.order(), &[MessageId::from("b"), MessageId::from("a")]);
        assert!(seen.contains(&"a".into()));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut seen = SeenSet::new();
        seen.insert("x".into());
        seen.clear();
        assert!(seen.is_empty());
        assert!(seen.insert("x".into()));
    }
}
