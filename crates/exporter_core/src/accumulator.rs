use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use exporter_logging::exporter_info;

use crate::{DiscoveryEngine, Locator, MessageId, StopKind};

type CompleteListener<I> = Box<dyn FnMut(&[(MessageId, I)], StopKind)>;

struct Store<I> {
    entries: Vec<(MessageId, I)>,
    index: HashMap<MessageId, usize>,
    complete_listeners: Vec<CompleteListener<I>>,
}

impl<I> Default for Store<I> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            complete_listeners: Vec::new(),
        }
    }
}

impl<I> Store<I> {
    fn put(&mut self, id: &MessageId, item: I) {
        match self.index.get(id) {
            Some(&slot) => self.entries[slot].1 = item,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id.clone(), item));
            }
        }
    }
}

/// Keeps a snapshot of every discovered message before the host evicts it.
///
/// Clones share the same store, so a handle can be moved into a completion
/// callback while another one stays with the caller.
pub struct MessageAccumulator<I> {
    store: Rc<RefCell<Store<I>>>,
}

impl<I> Clone for MessageAccumulator<I> {
    fn clone(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
        }
    }
}

impl<I> Default for MessageAccumulator<I> {
    fn default() -> Self {
        Self {
            store: Rc::new(RefCell::new(Store::default())),
        }
    }
}

impl<I: Clone + 'static> MessageAccumulator<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to new messages and to the end of scrolling.
    pub fn attach<L: Locator<Item = I>>(&self, engine: &mut DiscoveryEngine<L>) {
        let store = Rc::clone(&self.store);
        engine.on_message(move |id, item| {
            store.borrow_mut().put(id, item.clone());
            Ok(())
        });

        let store = Rc::clone(&self.store);
        engine.on_stop(move |kind| fire_complete(&store, kind));
    }

    /// Called with everything collected so far once the attached engine stops.
    pub fn on_complete(&self, listener: impl FnMut(&[(MessageId, I)], StopKind) + 'static) {
        self.store
            .borrow_mut()
            .complete_listeners
            .push(Box::new(listener));
    }

    /// Copy of all entries in discovery order.
    pub fn get_all(&self) -> Vec<(MessageId, I)> {
        self.store.borrow().entries.clone()
    }

    pub fn get(&self, id: &MessageId) -> Option<I> {
        let store = self.store.borrow();
        store.index.get(id).map(|&slot| store.entries[slot].1.clone())
    }

    pub fn len(&self) -> usize {
        self.store.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().entries.is_empty()
    }
}

fn fire_complete<I: Clone>(store: &Rc<RefCell<Store<I>>>, kind: StopKind) {
    // Release the borrow while listeners run; they may read the accumulator.
    let (entries, mut listeners) = {
        let mut store = store.borrow_mut();
        let listeners = std::mem::take(&mut store.complete_listeners);
        (store.entries.clone(), listeners)
    };
    exporter_info!("Conversation collection complete: {} messages", entries.len());
    for listener in &mut listeners {
        listener(&entries, kind);
    }
    let mut store = store.borrow_mut();
    listeners.append(&mut store.complete_listeners);
    store.complete_listeners = listeners;
}
