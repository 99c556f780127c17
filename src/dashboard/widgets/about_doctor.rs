use super::{diagnostics_panel, parse_settings, section_title, Widget, WidgetEnv, WidgetEvent};
use crate::dashboard::dashboard::DashboardContext;
use crate::profile::effective::{overall_source, AboutEffective};
use crate::profile::record::{EducationEntry, ProfileRecord};
use crate::profile::defaults::default_record;
use crate::sync::{ProfileFeed, Sources};
use eframe::egui;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutDoctorConfig {
    #[serde(alias = "biography", skip_serializing_if = "Option::is_none")]
    pub about_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitals: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    pub class_name: String,
}

impl AboutDoctorConfig {
    pub fn explicit(&self) -> ProfileRecord {
        ProfileRecord {
            about_text: self.about_text.clone(),
            education: self.education.clone(),
            hospitals: self.hospitals.clone(),
            certificates: self.certificates.clone(),
            languages: self.languages.clone(),
            ..Default::default()
        }
    }
}

/// Biography, education, hospitals, certificates and languages.
pub struct AboutDoctorWidget {
    cfg: AboutDoctorConfig,
    explicit: ProfileRecord,
    feed: ProfileFeed,
}

impl AboutDoctorWidget {
    pub fn new(cfg: AboutDoctorConfig, env: &WidgetEnv) -> Self {
        Self {
            explicit: cfg.explicit(),
            cfg,
            feed: env.mount_feed(),
        }
    }

    pub fn effective(&self) -> AboutEffective {
        let shared = self.feed.snapshot();
        AboutEffective::resolve(&Sources::new(
            shared.as_deref(),
            &self.explicit,
            default_record(),
        ))
    }

    fn list_section(ui: &mut egui::Ui, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        ui.add_space(6.0);
        ui.label(egui::RichText::new(title).strong());
        for item in items {
            ui.label(format!("• {item}"));
        }
    }
}

impl Widget for AboutDoctorWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext) -> Option<WidgetEvent> {
        self.feed.refresh();
        let eff = self.effective();

        section_title(ui, "About Me");
        ui.label(&eff.about_text.value);

        if !eff.education.value.is_empty() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Education").strong());
            for entry in &eff.education.value {
                ui.label(&entry.college);
                if !entry.activity.is_empty() {
                    ui.label(egui::RichText::new(&entry.activity).weak());
                }
            }
        }
        Self::list_section(ui, "Hospitals", &eff.hospitals.value);
        Self::list_section(ui, "Certificates", &eff.certificates.value);
        if !eff.languages.value.is_empty() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Languages").strong());
            ui.label(eff.languages.value.join(", "));
        }

        if ctx.show_diagnostics {
            let source = overall_source(&[
                eff.about_text.source,
                eff.education.source,
                eff.hospitals.source,
                eff.certificates.source,
                eff.languages.source,
            ]);
            diagnostics_panel(
                ui,
                &self.feed,
                source,
                &[
                    ("Education entries", eff.education.value.len().to_string()),
                    ("Hospitals", eff.hospitals.value.len().to_string()),
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
    fn biography_alias_is_accepted() {
        let cfg: AboutDoctorConfig = parse_settings(&json!({"biography": "Hi", "className": "w-full"}));
        assert_eq!(cfg.about_text.as_deref(), Some("Hi"));
        assert_eq!(cfg.class_name, "w-full");
    }

    #[test]
    fn shared_languages_override_settings() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item("doctorData", r#"{"languages":["Spanish"]}"#)
            .unwrap();
        let env = WidgetEnv::new(ProfileStore::new(storage, "doctorData"))
            .with_bridge(BridgeOptions::disabled());
        let cfg = AboutDoctorConfig {
            languages: Some(vec!["French".into()]),
            hospitals: Some(vec!["St. Mary".into()]),
            ..Default::default()
        };
        let widget = AboutDoctorWidget::new(cfg, &env);
        let eff = widget.effective();
        assert_eq!(eff.languages.value, vec!["Spanish".to_string()]);
        assert_eq!(eff.hospitals.value, vec!["St. Mary".to_string()]);
        assert_eq!(eff.hospitals.source, DataSource::Explicit);
        assert_eq!(eff.certificates.source, DataSource::Default);
    }
}
