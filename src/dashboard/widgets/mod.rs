use crate::dashboard::dashboard::DashboardContext;
use crate::sync::{BridgeOptions, DataSource, ProfileFeed, ProfileStore, Waker};
use eframe::egui;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

mod about_doctor;
mod profile_summary;
mod services_conditions;
mod testimonial_card;
mod testimonial_carousel;

pub use about_doctor::{AboutDoctorConfig, AboutDoctorWidget};
pub use profile_summary::{ProfileSummaryConfig, ProfileSummaryWidget};
pub use services_conditions::{ServicesConditionsConfig, ServicesConditionsWidget};
pub use testimonial_card::{TestimonialCardConfig, TestimonialCardWidget};
pub use testimonial_carousel::{TestimonialCarouselConfig, TestimonialCarouselWidget};

/// User interaction a widget reports to the host. The widgets attach no
/// meaning to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    AskAboutCondition,
}

/// Capabilities handed to every widget when it is mounted.
#[derive(Clone)]
pub struct WidgetEnv {
    pub store: ProfileStore,
    pub bridge: BridgeOptions,
    pub waker: Option<Waker>,
}

impl WidgetEnv {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store,
            bridge: BridgeOptions::default(),
            waker: None,
        }
    }

    pub fn with_bridge(mut self, bridge: BridgeOptions) -> Self {
        self.bridge = bridge;
        self
    }

    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn mount_feed(&self) -> ProfileFeed {
        ProfileFeed::mount(self.store.clone(), self.bridge, self.waker.clone())
    }
}

/// Widget trait implemented by all dashboard widgets. Creating a widget
/// mounts it; dropping it unmounts it.
pub trait Widget: Send {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext) -> Option<WidgetEvent>;

    fn on_config_updated(&mut self, _settings: &Value) {}
}

/// Descriptor for building widgets from JSON settings.
#[derive(Clone)]
pub struct WidgetDescriptor {
    ctor: Arc<dyn Fn(&Value, &WidgetEnv) -> Box<dyn Widget> + Send + Sync>,
    default_settings: Arc<dyn Fn() -> Value + Send + Sync>,
}

pub type WidgetFactory = WidgetDescriptor;

impl WidgetDescriptor {
    pub fn new<T: Widget + 'static, C: DeserializeOwned + Serialize + Default + 'static>(
        build: fn(C, &WidgetEnv) -> T,
    ) -> Self {
        Self {
            ctor: Arc::new(move |v: &Value, env: &WidgetEnv| -> Box<dyn Widget> {
                let cfg = parse_settings::<C>(v);
                Box::new(build(cfg, env))
            }),
            default_settings: Arc::new(|| {
                serde_json::to_value(C::default()).unwrap_or_else(|_| json!({}))
            }),
        }
    }

    pub fn default_settings(&self) -> Value {
        (self.default_settings)()
    }

    pub fn create(&self, settings: &Value, env: &WidgetEnv) -> Box<dyn Widget> {
        (self.ctor)(settings, env)
    }
}

#[derive(Clone, Default)]
pub struct WidgetRegistry {
    map: HashMap<String, WidgetDescriptor>,
}

impl WidgetRegistry {
    pub fn with_defaults() -> Self {
        let mut reg = Self::default();
        reg.register("about_doctor", WidgetFactory::new(AboutDoctorWidget::new));
        reg.register("profile_summary", WidgetFactory::new(ProfileSummaryWidget::new));
        reg.register(
            "testimonial_carousel",
            WidgetFactory::new(TestimonialCarouselWidget::new),
        );
        reg.register("testimonial_card", WidgetFactory::new(TestimonialCardWidget::new));
        reg.register(
            "services_conditions",
            WidgetFactory::new(ServicesConditionsWidget::new),
        );
        reg
    }

    pub fn register(&mut self, name: &str, factory: WidgetFactory) {
        self.map.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Build and mount a widget. Settings are layered over the widget's
    /// defaults so partial settings keep the remaining keys.
    pub fn create(&self, name: &str, settings: &Value, env: &WidgetEnv) -> Option<Box<dyn Widget>> {
        let factory = self.map.get(name)?;
        let settings = if settings.is_null() {
            factory.default_settings()
        } else {
            merge_json(&factory.default_settings(), settings)
        };
        Some(factory.create(&settings, env))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_settings(&self, name: &str) -> Option<Value> {
        self.map.get(name).map(|f| f.default_settings())
    }
}

pub(crate) fn merge_json(base: &Value, updates: &Value) -> Value {
    match (base, updates) {
        (Value::Object(a), Value::Object(b)) => {
            let mut merged = a.clone();
            for (k, v) in b {
                merged.insert(k.clone(), v.clone());
            }
            Value::Object(merged)
        }
        _ => updates.clone(),
    }
}

/// Widget settings are explicit props; unusable settings fall back to the
/// widget's defaults rather than failing the mount.
pub(crate) fn parse_settings<C: DeserializeOwned + Default>(value: &Value) -> C {
    match serde_json::from_value::<C>(value.clone()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "invalid widget settings, using defaults");
            C::default()
        }
    }
}

/// Five star glyphs, `filled` of them highlighted.
pub(crate) fn stars(ui: &mut egui::Ui, filled: usize) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 1.0;
        for i in 0..5 {
            let color = if i < filled {
                egui::Color32::from_rgb(250, 204, 21)
            } else {
                egui::Color32::from_gray(200)
            };
            ui.colored_label(color, "★");
        }
    });
}

pub(crate) fn section_title(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).strong().size(18.0));
}

/// Development-only provenance panel.
pub(crate) fn diagnostics_panel(
    ui: &mut egui::Ui,
    feed: &ProfileFeed,
    source: DataSource,
    rows: &[(&str, String)],
) {
    let stats = feed.stats();
    egui::Frame::none()
        .fill(egui::Color32::from_gray(240))
        .inner_margin(egui::Margin::same(6.0))
        .rounding(egui::Rounding::same(4.0))
        .show(ui, |ui| {
            let small = |text: String| egui::RichText::new(text).small();
            ui.label(small(format!("Data source: {}", source.as_str())));
            for (label, value) in rows {
                ui.label(small(format!("{label}: {value}")));
            }
            ui.label(small(format!(
                "Reads: {} (signals {}, polls {})",
                stats.reads, stats.cross_context_signals, stats.poll_ticks
            )));
            if let Some(at) = stats.last_read {
                ui.label(small(format!("Last read: {}", at.format("%H:%M:%S"))));
            }
            if let Some(err) = &stats.last_error {
                ui.colored_label(egui::Color32::DARK_RED, small(err.clone()));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn env() -> WidgetEnv {
        let store = ProfileStore::new(Arc::new(MemoryStorage::new()), "doctorData");
        WidgetEnv::new(store).with_bridge(BridgeOptions::disabled())
    }

    #[test]
    fn merge_json_preserves_unknown_fields() {
        let base = json!({"known": 1, "extra": {"keep": true}});
        let updates = json!({"known": 2});
        let merged = merge_json(&base, &updates);
        assert_eq!(merged["known"], json!(2));
        assert_eq!(merged["extra"], json!({"keep": true}));
    }

    #[test]
    fn registry_knows_all_profile_widgets() {
        let reg = WidgetRegistry::with_defaults();
        assert_eq!(
            reg.names(),
            vec![
                "about_doctor",
                "profile_summary",
                "services_conditions",
                "testimonial_card",
                "testimonial_carousel"
            ]
        );
        let env = env();
        for name in reg.names() {
            assert!(reg.create(&name, &Value::Null, &env).is_some());
        }
        assert!(reg.create("weather", &Value::Null, &env).is_none());
    }

    #[test]
    fn bad_settings_fall_back_to_defaults() {
        let cfg: ServicesConditionsConfig = parse_settings(&json!({"conditions": 5}));
        assert_eq!(cfg.conditions, None);
    }
}
