use eframe::egui;
use profile_widgets::dashboard::{
    Dashboard, DashboardContext, WidgetEnv, WidgetRegistry,
};
use profile_widgets::storage::{KeyValueStore, MemoryStorage};
use profile_widgets::sync::{BridgeOptions, ProfileStore};
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

fn render_all(raw: Option<&str>, show_diagnostics: bool) {
    let storage = Arc::new(MemoryStorage::new());
    if let Some(raw) = raw {
        storage.set_item("doctorData", raw).unwrap();
    }
    let env = WidgetEnv::new(ProfileStore::new(storage, "doctorData"))
        .with_bridge(BridgeOptions::disabled());
    let dir = tempdir().unwrap();
    let mut dashboard = Dashboard::new(
        dir.path().join("dashboard.json"),
        WidgetRegistry::with_defaults(),
        env,
        None,
    );
    let ctx = DashboardContext { show_diagnostics };
    egui::__run_test_ui(|ui| {
        assert_eq!(dashboard.ui(ui, &ctx), None);
    });
}

#[test]
fn renders_with_defaults_only() {
    render_all(None, false);
    render_all(None, true);
}

#[test]
fn renders_with_malformed_slot() {
    render_all(Some("{not json"), true);
    render_all(Some("[1,2]"), true);
}

#[test]
fn renders_with_odd_shapes() {
    let raw = json!({
        "testimonials": [{"author": 7, "rating": "9"}, "junk"],
        "overallRating": "4.7",
        "totalReviews": -3,
        "conditions": [],
        "education": {"college": "not a list"},
        "doctorName": null
    })
    .to_string();
    render_all(Some(&raw), true);
}

#[test]
fn renders_partial_shared_record() {
    let raw = json!({
        "conditions": ["Asthma"],
        "testimonials": [{
            "quote": "Great care",
            "author": "Sam",
            "age": 52,
            "condition": "Asthma",
            "rating": 5
        }]
    })
    .to_string();
    render_all(Some(&raw), true);
}
