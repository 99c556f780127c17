use super::testimonial_card::card_ui;
use super::{diagnostics_panel, parse_settings, section_title, Widget, WidgetEnv, WidgetEvent};
use crate::dashboard::dashboard::DashboardContext;
use crate::profile::defaults::default_record;
use crate::profile::effective::{overall_source, CarouselEffective};
use crate::profile::record::{ProfileRecord, Testimonial};
use crate::sync::{ProfileFeed, SelectionState, Sources};
use eframe::egui;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialCarouselConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_reviews: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_rate: Option<u32>,
    pub class_name: String,
}

impl TestimonialCarouselConfig {
    pub fn explicit(&self) -> ProfileRecord {
        ProfileRecord {
            testimonials: self.testimonials.clone(),
            overall_rating: self.overall_rating,
            total_reviews: self.total_reviews,
            recommended_rate: self.recommended_rate,
            ..Default::default()
        }
    }
}

/// Pages through testimonials and shows the aggregate statistics.
pub struct TestimonialCarouselWidget {
    cfg: TestimonialCarouselConfig,
    explicit: ProfileRecord,
    feed: ProfileFeed,
    selection: SelectionState,
}

impl TestimonialCarouselWidget {
    pub fn new(cfg: TestimonialCarouselConfig, env: &WidgetEnv) -> Self {
        Self {
            explicit: cfg.explicit(),
            cfg,
            feed: env.mount_feed(),
            selection: SelectionState::new(),
        }
    }

    /// Resolve and pull the selection back into range.
    pub fn effective(&mut self) -> CarouselEffective {
        let shared = self.feed.snapshot();
        let eff = CarouselEffective::resolve(&Sources::new(
            shared.as_deref(),
            &self.explicit,
            default_record(),
        ));
        self.selection.reconcile(eff.len());
        eff
    }

    pub fn selected(&self) -> usize {
        self.selection.index()
    }

    pub fn select(&mut self, index: usize) {
        self.selection.select(index);
    }
}

fn stat_column(ui: &mut egui::Ui, value: String, label: &str) {
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(value).strong().size(20.0));
        ui.label(egui::RichText::new(label).small().weak());
    });
}

impl Widget for TestimonialCarouselWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext) -> Option<WidgetEvent> {
        self.feed.refresh();
        let eff = self.effective();

        section_title(ui, "What My Patients Say");
        match eff.slide(self.selection.index()) {
            Some(slide) => card_ui(ui, slide.value),
            None => {
                ui.label(egui::RichText::new("No testimonials yet.").weak());
            }
        }

        if eff.len() > 1 {
            ui.horizontal(|ui| {
                if ui.small_button("‹").clicked() {
                    let prev = (self.selection.index() + eff.len() - 1) % eff.len();
                    self.selection.select(prev);
                }
                for i in 0..eff.len() {
                    let current = i == self.selection.index();
                    if ui.selectable_label(current, "●").clicked() {
                        self.selection.select(i);
                    }
                }
                if ui.small_button("›").clicked() {
                    let next = (self.selection.index() + 1) % eff.len();
                    self.selection.select(next);
                }
            });
        }

        ui.separator();
        ui.columns(3, |cols| {
            stat_column(
                &mut cols[0],
                format!("{:.1}", eff.overall_rating.value),
                "Overall Rating",
            );
            stat_column(
                &mut cols[1],
                eff.total_reviews.value.to_string(),
                "Total Reviews",
            );
            stat_column(
                &mut cols[2],
                format!("{}%", eff.recommended_rate.value),
                "Recommend",
            );
        });

        if ctx.show_diagnostics {
            let slide_source = eff
                .slide(self.selection.index())
                .map(|s| s.source.as_str())
                .unwrap_or("none");
            let source = overall_source(&[
                eff.testimonials.source,
                eff.overall_rating.source,
                eff.total_reviews.source,
                eff.recommended_rate.source,
            ]);
            diagnostics_panel(
                ui,
                &self.feed,
                source,
                &[
                    ("Testimonials", eff.len().to_string()),
                    ("Current index", self.selection.index().to_string()),
                    ("Slide from", slide_source.to_string()),
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
