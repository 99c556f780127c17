use super::{diagnostics_panel, parse_settings, stars, Widget, WidgetEnv, WidgetEvent};
use crate::dashboard::dashboard::DashboardContext;
use crate::profile::defaults::default_card_testimonial;
use crate::profile::record::Testimonial;
use crate::sync::{resolve_card, PartialTestimonial, ProfileFeed, Resolved};
use eframe::egui;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialCardConfig {
    #[serde(flatten)]
    pub testimonial: PartialTestimonial,
    /// Position in the shared testimonial list this card mirrors.
    pub testimonial_index: usize,
    pub class_name: String,
}

/// A single testimonial. Shows the shared entry at its index when one
/// exists, otherwise its own settings over the default card.
pub struct TestimonialCardWidget {
    cfg: TestimonialCardConfig,
    feed: ProfileFeed,
}

impl TestimonialCardWidget {
    pub fn new(cfg: TestimonialCardConfig, env: &WidgetEnv) -> Self {
        Self {
            cfg,
            feed: env.mount_feed(),
        }
    }

    pub fn effective(&self) -> Resolved<Testimonial> {
        resolve_card(
            self.feed.record(),
            &self.cfg.testimonial,
            default_card_testimonial(),
            self.cfg.testimonial_index,
        )
    }
}

pub(crate) fn card_ui(ui: &mut egui::Ui, t: &Testimonial) {
    stars(ui, t.rating as usize);
    ui.label(egui::RichText::new(format!("\u{201c}{}\u{201d}", t.quote)).italics());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(&t.author).strong());
        if t.age > 0 {
            ui.label(egui::RichText::new(format!("Age {}", t.age)).weak());
        }
    });
    if !t.condition.is_empty() {
        ui.label(egui::RichText::new(&t.condition).small());
    }
}

impl Widget for TestimonialCardWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext) -> Option<WidgetEvent> {
        self.feed.refresh();
        let card = self.effective();
        card_ui(ui, &card.value);

        if ctx.show_diagnostics {
            diagnostics_panel(
                ui,
                &self.feed,
                card.source,
                &[
                    ("Index", self.cfg.testimonial_index.to_string()),
                    ("Class", self.cfg.class_name.clone()),
                ],
            );
        }
        None
    }

    fn on_config_updated(&mut self, settings: &Value) {
        self.cfg = parse_settings(settings);
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
    fn flattened_settings_parse() {
        let cfg: TestimonialCardConfig = parse_settings(&json!({
            "author": "Pat Doe",
            "rating": 4,
            "testimonialIndex": 2,
            "className": "card"
        }));
        assert_eq!(cfg.testimonial.author.as_deref(), Some("Pat Doe"));
        assert_eq!(cfg.testimonial.rating, Some(4));
        assert_eq!(cfg.testimonial_index, 2);
    }

    #[test]
    fn card_follows_shared_entry_at_its_index() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = storage.sibling();
        let env = WidgetEnv::new(ProfileStore::new(storage, "doctorData"))
            .with_bridge(BridgeOptions::events_only());
        let cfg = TestimonialCardConfig {
            testimonial: PartialTestimonial {
                author: Some("Props".into()),
                ..Default::default()
            },
            testimonial_index: 1,
            ..Default::default()
        };
        let mut widget = TestimonialCardWidget::new(cfg, &env);
        assert_eq!(widget.effective().value.author, "Props");

        writer
            .set_item(
                "doctorData",
                r#"{"testimonials":[{"author":"A"},{"author":"B","quote":"Great"}]}"#,
            )
            .unwrap();
        widget.feed.refresh();
        let card = widget.effective();
        assert_eq!(card.source, DataSource::Shared);
        assert_eq!(card.value.author, "B");
        assert_eq!(card.value.condition, "");
    }
}
