use crate::dashboard::config::DashboardConfig;
use crate::dashboard::{Dashboard, DashboardContext, DashboardEvent, WidgetEnv, WidgetEvent, WidgetRegistry};
use crate::settings::Settings;
use crate::sync::ProfileStore;
use eframe::egui;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Host window: a toolbar and the widget dashboard.
pub struct ProfileApp {
    dashboard: Dashboard,
    ctx: DashboardContext,
    reload_requested: Arc<AtomicBool>,
    status: Option<String>,
}

impl ProfileApp {
    pub fn new(egui_ctx: &egui::Context, settings: &Settings, store: ProfileStore) -> Self {
        let repaint_ctx = egui_ctx.clone();
        let env = WidgetEnv::new(store)
            .with_bridge(settings.bridge_options())
            .with_waker(Arc::new(move || repaint_ctx.request_repaint()));

        let reload_requested = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&reload_requested);
        let repaint_ctx = egui_ctx.clone();
        let mut dashboard = Dashboard::new(
            DashboardConfig::path_for(&settings.dashboard_path),
            WidgetRegistry::with_defaults(),
            env,
            Some(Arc::new(move |event: DashboardEvent| {
                if event == DashboardEvent::Reloaded {
                    flag.store(true, Ordering::SeqCst);
                    repaint_ctx.request_repaint();
                }
            })),
        );
        dashboard.attach_watcher();

        Self {
            dashboard,
            ctx: DashboardContext {
                show_diagnostics: settings.diagnostics_enabled(),
            },
            reload_requested,
            status: None,
        }
    }

    fn reload(&mut self) {
        self.dashboard.reload();
        self.status = Some(format!("Loaded {} widgets", self.dashboard.widget_count()));
        tracing::info!(widgets = self.dashboard.widget_count(), "dashboard reloaded");
    }
}

impl eframe::App for ProfileApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.reload_requested.swap(false, Ordering::SeqCst) {
            self.reload();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Reload layout").clicked() {
                    self.reload();
                }
                ui.checkbox(&mut self.ctx.show_diagnostics, "Diagnostics");
                if let Some(status) = &self.status {
                    ui.label(egui::RichText::new(status).weak());
                }
            });
            for warning in &self.dashboard.warnings {
                ui.colored_label(egui::Color32::from_rgb(200, 120, 0), warning);
            }
        });

        let mut event = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            event = self.dashboard.ui(ui, &self.ctx);
        });
        if let Some(WidgetEvent::AskAboutCondition) = event {
            tracing::info!("patient asked about a condition");
            self.status = Some("Your question was passed on to the practice.".into());
        }
    }
}
