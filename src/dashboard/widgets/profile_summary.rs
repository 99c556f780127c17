use super::{diagnostics_panel, parse_settings, Widget, WidgetEnv, WidgetEvent};
use crate::dashboard::dashboard::DashboardContext;
use crate::profile::defaults::default_record;
use crate::profile::effective::{overall_source, ProfileSummaryEffective};
use crate::profile::record::ProfileRecord;
use crate::sync::{ProfileFeed, Sources};
use eframe::egui;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileSummaryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    pub class_name: String,
}

impl ProfileSummaryConfig {
    pub fn explicit(&self) -> ProfileRecord {
        ProfileRecord {
            doctor_name: self.doctor_name.clone(),
            specialty: self.specialty.clone(),
            patients: self.patients.clone(),
            experience: self.experience.clone(),
            rating: self.rating.clone(),
            image_src: self.image_src.clone(),
            ..Default::default()
        }
    }
}

pub struct ProfileSummaryWidget {
    cfg: ProfileSummaryConfig,
    explicit: ProfileRecord,
    feed: ProfileFeed,
}

impl ProfileSummaryWidget {
    pub fn new(cfg: ProfileSummaryConfig, env: &WidgetEnv) -> Self {
        Self {
            explicit: cfg.explicit(),
            cfg,
            feed: env.mount_feed(),
        }
    }

    pub fn effective(&self) -> ProfileSummaryEffective {
        let shared = self.feed.snapshot();
        ProfileSummaryEffective::resolve(&Sources::new(
            shared.as_deref(),
            &self.explicit,
            default_record(),
        ))
    }
}

fn stat(ui: &mut egui::Ui, value: &str, label: &str) {
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(value).strong().size(16.0));
        ui.label(egui::RichText::new(label).small().weak());
    });
}

impl Widget for ProfileSummaryWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext) -> Option<WidgetEvent> {
        self.feed.refresh();
        let eff = self.effective();

        ui.horizontal(|ui| {
            if !eff.image_src.value.is_empty() {
                ui.label(egui::RichText::new("👤").size(32.0))
                    .on_hover_text(&eff.image_src.value);
            }
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(&eff.doctor_name.value).strong().size(18.0));
                ui.label(egui::RichText::new(&eff.specialty.value).weak());
            });
        });
        ui.add_space(6.0);
        ui.columns(3, |cols| {
            stat(&mut cols[0], &eff.patients.value, "Patients");
            stat(&mut cols[1], &eff.experience.value, "Experience");
            stat(&mut cols[2], &eff.rating.value, "Rating");
        });

        if ctx.show_diagnostics {
            let source = overall_source(&[
                eff.doctor_name.source,
                eff.specialty.source,
                eff.patients.source,
                eff.experience.source,
                eff.rating.source,
                eff.image_src.source,
            ]);
            diagnostics_panel(
                ui,
                &self.feed,
                source,
                &[
                    ("Name from", eff.doctor_name.source.as_str().to_string()),
                    ("Class", self.cfg.class_name.clone()),
                ],
            );
        }
        None
    }

    fn on_config_updated(&mut self, settings: &Value) {
        self.cfg = parse_settings(settings);
        self.explicit = self.cfg.explicit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStorage};
    use crate::sync::{BridgeOptions, DataSource, ProfileStore};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn settings_override_defaults_until_shared_arrives() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = storage.sibling();
        let env = WidgetEnv::new(ProfileStore::new(storage, "doctorData"))
            .with_bridge(BridgeOptions::events_only());
        let cfg: ProfileSummaryConfig = parse_settings(&json!({"doctorName": "Dr. Ada Grey"}));
        let mut widget = ProfileSummaryWidget::new(cfg, &env);

        let eff = widget.effective();
        assert_eq!(eff.doctor_name.value, "Dr. Ada Grey");
        assert_eq!(eff.doctor_name.source, DataSource::Explicit);
        assert_eq!(eff.specialty.source, DataSource::Default);

        writer
            .set_item("doctorData", r#"{"doctorName":"Dr. Shared"}"#)
            .unwrap();
        widget.feed.refresh();
        assert_eq!(widget.effective().doctor_name.value, "Dr. Shared");
    }
}
