use super::bridge::{BridgeOptions, ChangeBridge};
use crate::profile::record::{kind_of, ProfileRecord};
use crate::storage::KeyValueStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The storage backend could not be read.
    Unavailable,
    /// The slot holds text that is not JSON.
    Malformed,
    /// The slot holds JSON that is not an object.
    NotARecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub key: String,
    pub kind: StoreErrorKind,
    pub message: String,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            StoreErrorKind::Unavailable => "storage unavailable",
            StoreErrorKind::Malformed => "malformed JSON",
            StoreErrorKind::NotARecord => "not a profile record",
        };
        write!(f, "slot '{}': {what}: {}", self.key, self.message)
    }
}

impl std::error::Error for StoreError {}

/// Parse the raw slot content. Empty content and JSON `null` are absent.
pub fn parse_record(key: &str, raw: &str) -> Result<Option<ProfileRecord>, StoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(raw).map_err(|e| StoreError {
        key: key.to_string(),
        kind: StoreErrorKind::Malformed,
        message: e.to_string(),
    })?;
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(ProfileRecord::from_object(&map))),
        other => Err(StoreError {
            key: key.to_string(),
            kind: StoreErrorKind::NotARecord,
            message: format!("found {}", kind_of(&other)),
        }),
    }
}

/// Read access to the shared profile slot, injected into every widget.
#[derive(Clone)]
pub struct ProfileStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    pub fn try_read(&self) -> Result<Option<ProfileRecord>, StoreError> {
        let raw = self.storage.get_item(&self.key).map_err(|e| StoreError {
            key: self.key.clone(),
            kind: StoreErrorKind::Unavailable,
            message: format!("{e:#}"),
        })?;
        match raw {
            Some(raw) => parse_record(&self.key, &raw),
            None => Ok(None),
        }
    }

    /// Latest shared record, or `None` when the slot is absent or unusable.
    /// Never fails; problems are logged.
    pub fn read(&self) -> Option<ProfileRecord> {
        match self.try_read() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable shared profile record");
                None
            }
        }
    }

    /// Replace the slot. Used by the profile editor; widgets only read.
    pub fn write(&self, record: &ProfileRecord) -> anyhow::Result<()> {
        let json = serde_json::to_string(record)?;
        self.storage.set_item(&self.key, &json)
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.storage.remove_item(&self.key)
    }

    pub fn bridge(&self, options: BridgeOptions) -> ChangeBridge {
        ChangeBridge::new(Arc::clone(&self.storage), self.key.clone(), options)
    }
}
