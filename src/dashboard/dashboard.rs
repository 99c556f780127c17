use crate::common::json_watch::{watch_json, JsonWatcher};
use crate::dashboard::config::DashboardConfig;
use crate::dashboard::widgets::{Widget, WidgetEnv, WidgetEvent, WidgetRegistry};
use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardEvent {
    Reloaded,
}

/// Context shared with widgets at render time.
#[derive(Clone, Copy, Debug, Default)]
pub struct DashboardContext {
    pub show_diagnostics: bool,
}

struct SlotRuntime {
    id: Option<String>,
    widget_name: String,
    settings: serde_json::Value,
    widget: Box<dyn Widget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SlotKey {
    Id { id: String, widget: String },
    Position { widget: String, index: usize },
}

impl SlotKey {
    fn new(id: Option<&String>, widget: &str, index: usize) -> Self {
        match id {
            Some(id) => SlotKey::Id {
                id: id.clone(),
                widget: widget.to_string(),
            },
            None => SlotKey::Position {
                widget: widget.to_string(),
                index,
            },
        }
    }
}

/// Vertical stack of profile widgets built from `dashboard.json`.
///
/// Slots are matched across reloads by id (or widget and position), so a
/// widget whose settings changed keeps its feed and selection. Slots that
/// disappear are dropped, which unmounts their widgets.
pub struct Dashboard {
    config_path: PathBuf,
    pub config: DashboardConfig,
    runtime_slots: Vec<SlotRuntime>,
    registry: WidgetRegistry,
    env: WidgetEnv,
    watcher: Option<JsonWatcher>,
    pub warnings: Vec<String>,
    event_cb: Option<Arc<dyn Fn(DashboardEvent) + Send + Sync>>,
}

impl Dashboard {
    pub fn new(
        config_path: impl AsRef<Path>,
        registry: WidgetRegistry,
        env: WidgetEnv,
        event_cb: Option<Arc<dyn Fn(DashboardEvent) + Send + Sync>>,
    ) -> Self {
        let path = config_path.as_ref().to_path_buf();
        let (config, warnings) = Self::load_internal(&path, &registry);
        let mut dashboard = Self {
            config_path: path,
            config,
            runtime_slots: Vec::new(),
            registry,
            env,
            watcher: None,
            warnings,
            event_cb,
        };
        dashboard.rebuild_runtime_slots();
        dashboard
    }

    fn load_internal(path: &Path, registry: &WidgetRegistry) -> (DashboardConfig, Vec<String>) {
        let mut warnings = Vec::new();
        let cfg = match DashboardConfig::load(path, registry) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load dashboard config");
                warnings.push(format!("dashboard config unreadable: {e}"));
                let mut cfg = DashboardConfig::default();
                cfg.sanitize(registry);
                cfg
            }
        };
        if cfg.slots.is_empty() {
            warnings.push("dashboard has no valid slots".into());
        }
        (cfg, warnings)
    }

    fn rebuild_runtime_slots(&mut self) {
        let mut reusable: HashMap<SlotKey, SlotRuntime> = HashMap::new();
        for (index, rt) in self.runtime_slots.drain(..).enumerate() {
            let key = SlotKey::new(rt.id.as_ref(), &rt.widget_name, index);
            reusable.insert(key, rt);
        }

        let mut runtime_slots = Vec::with_capacity(self.config.slots.len());
        for (index, slot) in self.config.slots.iter().enumerate() {
            let key = SlotKey::new(slot.id.as_ref(), &slot.widget, index);
            if let Some(mut runtime) = reusable.remove(&key) {
                if runtime.settings != slot.settings {
                    runtime.widget.on_config_updated(&slot.settings);
                    runtime.settings = slot.settings.clone();
                }
                runtime_slots.push(runtime);
            } else if let Some(widget) =
                self.registry
                    .create(&slot.widget, &slot.settings, &self.env)
            {
                runtime_slots.push(SlotRuntime {
                    id: slot.id.clone(),
                    widget_name: slot.widget.clone(),
                    settings: slot.settings.clone(),
                    widget,
                });
            }
        }
        if !reusable.is_empty() {
            tracing::debug!(count = reusable.len(), "unmounting removed dashboard widgets");
        }
        drop(reusable);
        self.runtime_slots = runtime_slots;
    }

    pub fn reload(&mut self) {
        let (cfg, warnings) = Self::load_internal(&self.config_path, &self.registry);
        self.config = cfg;
        self.warnings = warnings;
        self.rebuild_runtime_slots();
    }

    pub fn set_path(&mut self, path: impl AsRef<Path>) {
        self.config_path = path.as_ref().to_path_buf();
        self.reload();
        self.attach_watcher();
    }

    pub fn attach_watcher(&mut self) {
        let tx = self.event_cb.clone();
        self.watcher = watch_json(&self.config_path, move |_| {
            tracing::info!("dashboard config changed");
            if let Some(tx) = &tx {
                (tx)(DashboardEvent::Reloaded);
            }
        })
        .map_err(|e| tracing::warn!(error = %e, "dashboard config watcher unavailable"))
        .ok();
    }

    pub fn widget_count(&self) -> usize {
        self.runtime_slots.len()
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext) -> Option<WidgetEvent> {
        let mut event = None;
        egui::ScrollArea::vertical()
            .id_source("profile-dashboard")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for slot in &mut self.runtime_slots {
                    let response = egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        slot.widget.render(ui, ctx)
                    });
                    event = event.take().or(response.inner);
                    ui.add_space(8.0);
                }
            });
        event
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }
}
