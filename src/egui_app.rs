//! egui front end: controller, UI state, and renderer.
pub mod controller;
pub mod state;
pub mod ui;

pub use controller::TtsController;
