use super::{KeyValueStore, ListenerId, ListenerSet, StorageEvent, StorageListener};
use crate::common::json_watch::{watch_json, JsonWatcher};
use anyhow::Context;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Per-handle bookkeeping shared with the watcher callback, keyed by file stem.
#[derive(Default)]
struct Slots {
    /// Last content this handle wrote or announced.
    known: HashMap<String, Option<String>>,
    /// Keys as callers spelled them.
    keys: HashMap<String, String>,
}

impl Slots {
    fn key_for(&self, stem: &str) -> String {
        self.keys
            .get(stem)
            .cloned()
            .unwrap_or_else(|| stem.to_string())
    }
}

/// Directory backed storage: one `<key>.json` file per key.
///
/// Each `FileStorage` is its own context. Writes made by other handles or
/// other processes on the same directory are announced to this handle's
/// listeners; its own writes are not.
pub struct FileStorage {
    root: PathBuf,
    listeners: Arc<ListenerSet>,
    slots: Arc<Mutex<Slots>>,
    watcher: Mutex<Option<JsonWatcher>>,
}

impl FileStorage {
    pub fn open(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("creating storage directory {}", root.display()))?;
        Ok(Self {
            root,
            listeners: Arc::new(ListenerSet::default()),
            slots: Arc::new(Mutex::new(Slots::default())),
            watcher: Mutex::new(None),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem_for(key)))
    }

    /// Records the caller's spelling of `key` and returns its file path.
    fn slot_path(&self, key: &str) -> PathBuf {
        let stem = file_stem_for(key);
        if let Ok(mut slots) = self.slots.lock() {
            if stem != key {
                slots.keys.insert(stem.clone(), key.to_string());
            }
        }
        self.root.join(format!("{stem}.json"))
    }

    fn remember_write(&self, key: &str, value: Option<&str>) {
        if let Ok(mut slots) = self.slots.lock() {
            slots
                .known
                .insert(file_stem_for(key), value.map(str::to_string));
        }
    }

    fn ensure_watcher(&self) {
        let Ok(mut slot) = self.watcher.lock() else {
            return;
        };
        if slot.is_some() {
            return;
        }
        let listeners = Arc::clone(&self.listeners);
        let slots = Arc::clone(&self.slots);
        match watch_json(&self.root, move |path| {
            announce_change(path, &listeners, &slots);
        }) {
            Ok(w) => *slot = Some(w),
            Err(e) => {
                tracing::warn!(dir = %self.root.display(), error = %e, "storage watcher unavailable")
            }
        }
    }

    fn stop_watcher_if_idle(&self) {
        if !self.listeners.is_empty() {
            return;
        }
        let watcher = self.watcher.lock().ok().and_then(|mut slot| slot.take());
        drop(watcher);
    }
}

/// Announces the content of `path` unless this handle already knows it.
/// One write usually raises several filesystem events; only the first
/// carries news.
fn announce_change(path: &Path, listeners: &ListenerSet, slots: &Mutex<Slots>) {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return;
    };
    let new_value = std::fs::read_to_string(path).ok();
    let key = {
        let Ok(mut slots) = slots.lock() else {
            return;
        };
        if slots.known.get(stem) == Some(&new_value) {
            return;
        }
        slots.known.insert(stem.to_string(), new_value.clone());
        slots.key_for(stem)
    };
    tracing::debug!(key = %key, "storage slot changed by another context");
    listeners.dispatch(&StorageEvent { key, new_value });
}

fn file_stem_for(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.slot_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        self.remember_write(key, Some(value));
        std::fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let path = self.slot_path(key);
        self.remember_write(key, None);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }

    fn add_listener(&self, listener: StorageListener) -> ListenerId {
        let id = self.listeners.insert(listener);
        self.ensure_watcher();
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
        self.stop_watcher_if_idle();
    }
}
