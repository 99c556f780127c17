use super::{diagnostics_panel, parse_settings, section_title, Widget, WidgetEnv, WidgetEvent};
use crate::dashboard::dashboard::DashboardContext;
use crate::profile::defaults::default_record;
use crate::profile::effective::{overall_source, ServicesEffective};
use crate::profile::record::{ProfileRecord, ServiceItem};
use crate::sync::{ProfileFeed, Sources};
use eframe::egui;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServicesConditionsConfig {
    #[serde(alias = "services", skip_serializing_if = "Option::is_none")]
    pub specialized_services: Option<Vec<ServiceItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
    pub class_name: String,
}

impl ServicesConditionsConfig {
    pub fn explicit(&self) -> ProfileRecord {
        ProfileRecord {
            services: self.specialized_services.clone(),
            conditions: self.conditions.clone(),
            ..Default::default()
        }
    }
}

pub struct ServicesConditionsWidget {
    cfg: ServicesConditionsConfig,
    explicit: ProfileRecord,
    feed: ProfileFeed,
}

impl ServicesConditionsWidget {
    pub fn new(cfg: ServicesConditionsConfig, env: &WidgetEnv) -> Self {
        Self {
            explicit: cfg.explicit(),
            cfg,
            feed: env.mount_feed(),
        }
    }

    pub fn effective(&self) -> ServicesEffective {
        let shared = self.feed.snapshot();
        ServicesEffective::resolve(&Sources::new(
            shared.as_deref(),
            &self.explicit,
            default_record(),
        ))
    }
}

impl Widget for ServicesConditionsWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext) -> Option<WidgetEvent> {
        self.feed.refresh();
        let eff = self.effective();
        let mut event = None;

        section_title(ui, "Specialized Services");
        for service in &eff.services.value {
            ui.horizontal(|ui| {
                ui.label("🩺").on_hover_text(&service.icon);
                ui.label(&service.name);
            });
        }

        ui.add_space(8.0);
        section_title(ui, "Conditions I Treat");
        ui.horizontal_wrapped(|ui| {
            let chip = ui.visuals().faint_bg_color;
            for condition in &eff.conditions.value {
                ui.label(egui::RichText::new(condition).background_color(chip));
            }
        });

        ui.add_space(8.0);
        if ui.button("Ask About My Condition").clicked() {
            tracing::debug!("ask about condition pressed");
            event = Some(WidgetEvent::AskAboutCondition);
        }

        if ctx.show_diagnostics {
            let source = overall_source(&[eff.services.source, eff.conditions.source]);
            diagnostics_panel(
                ui,
                &self.feed,
                source,
                &[
                    ("Services", eff.services.value.len().to_string()),
                    ("Conditions", eff.conditions.value.len().to_string()),
                    ("Class", self.cfg.class_name.clone()),
                ],
            );
        }
        event
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

    fn widget(shared: Option<&str>, settings: Value) -> ServicesConditionsWidget {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(raw) = shared {
            storage.set_item("doctorData", raw).unwrap();
        }
        let env = WidgetEnv::new(ProfileStore::new(storage, "doctorData"))
            .with_bridge(BridgeOptions::disabled());
        ServicesConditionsWidget::new(parse_settings(&settings), &env)
    }

    #[test]
    fn conditions_follow_precedence() {
        let props = json!({"conditions": ["Diabetes"]});
        let w = widget(Some(r#"{"conditions":["Asthma"]}"#), props.clone());
        assert_eq!(w.effective().conditions.value, vec!["Asthma".to_string()]);

        let w = widget(Some("{}"), props);
        assert_eq!(w.effective().conditions.value, vec!["Diabetes".to_string()]);

        let w = widget(None, json!({}));
        let eff = w.effective();
        assert_eq!(eff.conditions.value.len(), 6);
        assert_eq!(eff.conditions.source, DataSource::Default);
    }

    #[test]
    fn specialized_services_setting_is_explicit() {
        let w = widget(
            None,
            json!({"specializedServices": [{"name": "Telehealth", "icon": "tele.svg"}]}),
        );
        let eff = w.effective();
        assert_eq!(eff.services.value, vec![ServiceItem::new("Telehealth", "tele.svg")]);
        assert_eq!(eff.services.source, DataSource::Explicit);
    }
}
