pub mod common;
pub mod dashboard;
pub mod gui;
pub mod logging;
pub mod profile;
pub mod settings;
pub mod storage;
pub mod sync;
