pub mod config;
pub mod dashboard;
pub mod widgets;

pub use dashboard::{Dashboard, DashboardContext, DashboardEvent};
pub use widgets::{WidgetEnv, WidgetEvent, WidgetFactory, WidgetRegistry};
