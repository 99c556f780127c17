use profile_widgets::gui::ProfileApp;
use profile_widgets::logging;
use profile_widgets::settings::Settings;
use profile_widgets::storage::FileStorage;
use profile_widgets::sync::ProfileStore;

use eframe::egui;
use std::path::Path;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "settings.json".to_string());
    let settings = Settings::load(&settings_path)?;
    let _log_guard = logging::init(settings.debug_logging, settings.log_dir.as_deref().map(Path::new));

    let storage_dir = settings.storage_dir();
    let storage = FileStorage::open(&storage_dir)?;
    tracing::info!(
        dir = %storage_dir.display(),
        key = %settings.profile_key,
        "using shared profile storage"
    );
    let store = ProfileStore::new(Arc::new(storage), settings.profile_key.clone());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 760.0])
            .with_min_inner_size([360.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Doctor Profile",
        native_options,
        Box::new(move |cc| Box::new(ProfileApp::new(&cc.egui_ctx, &settings, store))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run window: {e}"))
}
