//! Library exports for reuse in the binary and integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// Atomic file replacement.
pub mod atomic_file;
/// Audio clip handles and playback.
pub mod audio;
/// Backend REST client.
pub mod backend;
/// Model catalog and derived option lists.
pub mod catalog;
/// Persisted settings.
pub mod config;
/// Saving synthesized audio to disk.
pub mod download;
/// Shared egui UI modules.
pub mod egui_app;
/// Shared HTTP agent and bounded response helpers.
pub mod http_client;
/// Tracing setup.
pub mod logging;
/// Cascading model selection.
pub mod selection;
/// Synthesis request lifecycle.
pub mod synthesis;
