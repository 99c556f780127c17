use crate::sync::bridge::BridgeOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Storage key the profile editor writes the shared doctor record under.
pub const DEFAULT_PROFILE_KEY: &str = "doctorData";

fn default_profile_key() -> String {
    DEFAULT_PROFILE_KEY.into()
}

fn default_poll_interval() -> f32 {
    1.0
}

fn default_cross_context_events() -> bool {
    true
}

fn default_dashboard_path() -> String {
    "dashboard.json".into()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Name of the storage slot holding the serialized profile record.
    #[serde(default = "default_profile_key")]
    pub profile_key: String,
    /// Directory used by the file storage backend. Falls back to the user data
    /// directory when missing.
    #[serde(default)]
    pub storage_dir: Option<String>,
    /// Same-context polling cadence in seconds. `0` disables polling.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: f32,
    /// Listen for writes made through other storage handles.
    #[serde(default = "default_cross_context_events")]
    pub cross_context_events: bool,
    /// Show the per-widget diagnostics panel. Defaults to on for debug builds.
    #[serde(default)]
    pub show_diagnostics: Option<bool>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional directory for a log file.
    #[serde(default)]
    pub log_dir: Option<String>,
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile_key: default_profile_key(),
            storage_dir: None,
            poll_interval_secs: default_poll_interval(),
            cross_context_events: default_cross_context_events(),
            show_diagnostics: None,
            debug_logging: false,
            log_dir: None,
            dashboard_path: default_dashboard_path(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn storage_dir(&self) -> PathBuf {
        match self.storage_dir.as_ref().filter(|p| !p.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs_next::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("profile_widgets")
                .join("storage"),
        }
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        if self.poll_interval_secs.is_finite() && self.poll_interval_secs > 0.0 {
            Some(Duration::from_secs_f32(self.poll_interval_secs.max(0.05)))
        } else {
            None
        }
    }

    pub fn bridge_options(&self) -> BridgeOptions {
        BridgeOptions {
            cross_context: self.cross_context_events,
            poll_interval: self.poll_interval(),
        }
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.show_diagnostics.unwrap_or(cfg!(debug_assertions))
    }
}
