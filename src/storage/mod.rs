//! Key/value storage holding the persisted profile slot.
//!
//! A storage handle plays the role of one browsing context: writes made
//! through a handle are announced to listeners registered on *other* handles
//! sharing the same backing data, never to the writer's own listeners.

use slab::Slab;
use std::sync::{Arc, Mutex};

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::{MemoryBackend, MemoryStorage};

/// Notification that a key was modified by another context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// Raw new value, `None` when the key was removed.
    pub new_value: Option<String>,
}

pub type StorageListener = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

/// Handle returned by [`KeyValueStore::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) usize);

pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;

    fn remove_item(&self, key: &str) -> anyhow::Result<()>;

    /// Register a listener for cross-context writes.
    fn add_listener(&self, listener: StorageListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);
}

/// Listener bookkeeping shared by the storage backends.
#[derive(Default)]
pub(crate) struct ListenerSet {
    listeners: Mutex<Slab<StorageListener>>,
}

impl ListenerSet {
    pub(crate) fn insert(&self, listener: StorageListener) -> ListenerId {
        match self.listeners.lock() {
            Ok(mut slab) => ListenerId(slab.insert(listener)),
            Err(poisoned) => ListenerId(poisoned.into_inner().insert(listener)),
        }
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let Ok(mut slab) = self.listeners.lock() else {
            return false;
        };
        slab.try_remove(id.0).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.lock().map(|slab| slab.len()).unwrap_or(0)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every listener. Listeners are cloned out first so a callback may
    /// register or remove listeners without deadlocking.
    pub(crate) fn dispatch(&self, event: &StorageEvent) {
        let listeners: Vec<StorageListener> = match self.listeners.lock() {
            Ok(slab) => slab.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn removed_listener_is_not_called() {
        let set = ListenerSet::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let id = set.insert(Arc::new(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        let event = StorageEvent {
            key: "k".into(),
            new_value: None,
        };
        set.dispatch(&event);
        assert!(set.remove(id));
        assert!(!set.remove(id));
        set.dispatch(&event);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(set.is_empty());
    }
}
