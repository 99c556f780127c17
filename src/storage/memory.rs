use super::{KeyValueStore, ListenerId, ListenerSet, StorageEvent, StorageListener};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-process key/value data shared by any number of [`MemoryStorage`]
/// contexts.
#[derive(Default)]
pub struct MemoryBackend {
    data: Mutex<HashMap<String, String>>,
    contexts: Mutex<Vec<(usize, Arc<ListenerSet>)>>,
    next_context: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Open a new context over this backend.
    pub fn context(self: &Arc<Self>) -> MemoryStorage {
        let id = self.next_context.fetch_add(1, Ordering::SeqCst);
        let listeners = Arc::new(ListenerSet::default());
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push((id, Arc::clone(&listeners)));
        }
        MemoryStorage {
            backend: Arc::clone(self),
            context: id,
            listeners,
        }
    }

    fn notify_others(&self, writer: usize, event: StorageEvent) {
        let targets: Vec<Arc<ListenerSet>> = match self.contexts.lock() {
            Ok(contexts) => contexts
                .iter()
                .filter(|(id, _)| *id != writer)
                .map(|(_, set)| Arc::clone(set))
                .collect(),
            Err(_) => return,
        };
        for set in targets {
            set.dispatch(&event);
        }
    }

    fn detach(&self, context: usize) {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.retain(|(id, _)| *id != context);
        }
    }
}

/// One context over a [`MemoryBackend`]. Mirrors the browser rule that the
/// writing context is not told about its own writes.
pub struct MemoryStorage {
    backend: Arc<MemoryBackend>,
    context: usize,
    listeners: Arc<ListenerSet>,
}

impl MemoryStorage {
    /// Fresh backend with a single context.
    pub fn new() -> Self {
        MemoryBackend::new().context()
    }

    /// Another context sharing this handle's data.
    pub fn sibling(&self) -> Self {
        self.backend.context()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryStorage {
    fn drop(&mut self) {
        self.backend.detach(self.context);
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let data = self
            .backend
            .data
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        Ok(data.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        {
            let mut data = self
                .backend
                .data
                .lock()
                .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
            if data.get(key).map(String::as_str) == Some(value) {
                return Ok(());
            }
            data.insert(key.to_string(), value.to_string());
        }
        self.backend.notify_others(
            self.context,
            StorageEvent {
                key: key.to_string(),
                new_value: Some(value.to_string()),
            },
        );
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let removed = self
            .backend
            .data
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?
            .remove(key)
            .is_some();
        if removed {
            self.backend.notify_others(
                self.context,
                StorageEvent {
                    key: key.to_string(),
                    new_value: None,
                },
            );
        }
        Ok(())
    }

    fn add_listener(&self, listener: StorageListener) -> ListenerId {
        self.listeners.insert(listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<StorageEvent>>>, StorageListener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: StorageListener = Arc::new(move |ev: &StorageEvent| {
            sink.lock().unwrap().push(ev.clone());
        });
        (seen, listener)
    }

    #[test]
    fn writer_context_does_not_hear_itself() {
        let writer = MemoryStorage::new();
        let reader = writer.sibling();
        let (writer_seen, writer_listener) = recorder();
        let (reader_seen, reader_listener) = recorder();
        writer.add_listener(writer_listener);
        reader.add_listener(reader_listener);

        writer.set_item("doctorData", "{}").unwrap();

        assert!(writer_seen.lock().unwrap().is_empty());
        assert_eq!(
            *reader_seen.lock().unwrap(),
            vec![StorageEvent {
                key: "doctorData".into(),
                new_value: Some("{}".into()),
            }]
        );
        assert_eq!(reader.get_item("doctorData").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn remove_announces_missing_value() {
        let writer = MemoryStorage::new();
        let reader = writer.sibling();
        let (seen, listener) = recorder();
        reader.add_listener(listener);

        writer.set_item("k", "1").unwrap();
        writer.remove_item("k").unwrap();
        writer.remove_item("k").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].new_value, None);
        assert_eq!(reader.get_item("k").unwrap(), None);
    }

    #[test]
    fn dropped_context_stops_receiving() {
        let writer = MemoryStorage::new();
        let reader = writer.sibling();
        let (seen, listener) = recorder();
        reader.add_listener(listener);
        drop(reader);
        writer.set_item("k", "1").unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }
}
