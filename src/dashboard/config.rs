use crate::dashboard::widgets::{merge_json, WidgetRegistry};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};

fn default_version() -> u32 {
    1
}

/// Widget slot configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub widget: String,
    /// Explicit props handed to the widget.
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl SlotConfig {
    pub fn with_widget(widget: &str) -> Self {
        Self {
            id: None,
            widget: widget.to_string(),
            settings: serde_json::Value::Null,
        }
    }
}

/// Primary dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            slots: vec![
                SlotConfig::with_widget("profile_summary"),
                SlotConfig::with_widget("about_doctor"),
                SlotConfig::with_widget("services_conditions"),
                SlotConfig::with_widget("testimonial_carousel"),
                SlotConfig::with_widget("testimonial_card"),
            ],
        }
    }
}

impl DashboardConfig {
    /// Load a configuration from disk. Unknown widget types or invalid slots are
    /// filtered out using the provided registry.
    pub fn load(path: impl AsRef<Path>, registry: &WidgetRegistry) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).unwrap_or_default();
        let mut cfg = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(&content)?
        };
        let warnings = cfg.sanitize(registry);
        for w in warnings {
            tracing::warn!("{w}");
        }
        Ok(cfg)
    }

    /// Save the configuration to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Remove unsupported widgets and normalize empty settings.
    pub fn sanitize(&mut self, registry: &WidgetRegistry) -> Vec<String> {
        let mut warnings = Vec::new();
        self.migrate_component_names(registry, &mut warnings);
        self.slots.retain(|slot| {
            if slot.widget.is_empty() {
                return false;
            }
            if !registry.contains(&slot.widget) {
                let msg = format!("unknown dashboard widget '{}' dropped", slot.widget);
                tracing::warn!(widget = %slot.widget, "unknown dashboard widget dropped");
                warnings.push(msg);
                return false;
            }
            true
        });
        for slot in &mut self.slots {
            let defaults = registry
                .default_settings(&slot.widget)
                .unwrap_or_else(|| json!({}));
            slot.settings = if slot.settings.is_null() {
                defaults
            } else {
                merge_json(&defaults, &slot.settings)
            };
        }
        warnings
    }

    pub fn path_for(base: &str) -> PathBuf {
        let base = Path::new(base);
        if base.is_dir() {
            base.join("dashboard.json")
        } else {
            PathBuf::from(base)
        }
    }

    /// Accept component-style names (`TestimonialCarousel`) for the
    /// registered snake_case widgets.
    fn migrate_component_names(&mut self, registry: &WidgetRegistry, warnings: &mut Vec<String>) {
        for slot in &mut self.slots {
            if slot.widget.is_empty() || registry.contains(&slot.widget) {
                continue;
            }
            let snake = to_snake_case(&slot.widget);
            if snake != slot.widget && registry.contains(&snake) {
                warnings.push(format!(
                    "dashboard widget '{}' migrated to '{}'",
                    slot.widget, snake
                ));
                slot.widget = snake;
            }
        }
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch == ' ' {
            out.push('_');
        } else {
            out.push(ch);
        }
    }
    out
}
