//! Session controller: owns the form, catalog, synthesis state and player.
//!
//! All transitions run on the UI thread. Network work is handed to worker
//! threads through [`jobs::ControllerJobs`] and applied in
//! `poll_background_jobs` once per frame.

mod background_jobs;
mod generation;
mod jobs;
mod playback;
mod session;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::audio::AudioPlayer;
use crate::backend::BackendClient;
use crate::catalog::Catalog;
use crate::config::{self, AppSettings};
use crate::egui_app::state::*;
use crate::egui_app::ui::style;
use crate::selection::Selection;
use crate::synthesis::{SynthesisState, VoiceSample};

use jobs::ControllerJobs;

/// Maintains session state and bridges backend calls to the egui UI.
pub struct TtsController {
    pub ui: UiState,
    /// Settings as stored on disk, without environment overrides.
    stored_settings: AppSettings,
    /// Settings in effect for this run.
    settings: AppSettings,
    config_path: Option<PathBuf>,
    backend: Result<BackendClient, String>,
    catalog: Catalog,
    selection: Selection,
    voice_sample: Option<VoiceSample>,
    synthesis: SynthesisState,
    player: Option<Rc<RefCell<AudioPlayer>>>,
    jobs: ControllerJobs,
}

impl TtsController {
    /// Build a controller from stored settings.
    ///
    /// `config_path` is where changes are persisted; `None` keeps them in memory.
    pub fn new(stored_settings: AppSettings, config_path: Option<PathBuf>) -> Self {
        let settings = config::apply_env_overrides(stored_settings.clone());
        Self::with_effective_settings(stored_settings, settings, config_path)
    }

    /// Like [`TtsController::new`] but without reading the process environment.
    pub fn with_effective_settings(
        stored_settings: AppSettings,
        settings: AppSettings,
        config_path: Option<PathBuf>,
    ) -> Self {
        let backend = BackendClient::new(
            &settings.backend.api_base_url,
            settings.backend.timeouts(),
            settings.backend.limits(),
        )
        .map_err(|err| err.to_string());
        let mut ui = UiState::default();
        ui.result.volume = settings.playback.volume;
        Self {
            ui,
            stored_settings,
            settings,
            config_path,
            backend,
            catalog: Catalog::default(),
            selection: Selection::default(),
            voice_sample: None,
            synthesis: SynthesisState::default(),
            player: None,
            jobs: ControllerJobs::new(),
        }
    }

    /// Load settings from the app directory and build a controller.
    ///
    /// A broken config file falls back to defaults and reports a warning.
    pub fn from_config() -> Self {
        let config_path = match config::config_path() {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!("Config path unavailable: {err}");
                None
            }
        };
        let (stored, load_error) = match config_path.as_deref().map(config::load_from) {
            Some(Ok(settings)) => (settings, None),
            Some(Err(err)) => (AppSettings::default(), Some(err.to_string())),
            None => (AppSettings::default(), None),
        };
        let mut controller = Self::new(stored, config_path);
        if let Some(err) = load_error {
            tracing::warn!("Using default settings: {err}");
            controller.set_status(
                format!("Config could not be loaded, using defaults: {err}"),
                StatusTone::Warning,
            );
        }
        controller
    }

    /// Let worker threads wake the UI when they finish.
    pub fn attach_repaint(&mut self, ctx: egui::Context) {
        self.jobs.set_repaint(ctx);
    }

    /// Advance background work and refresh playback state; call once per frame.
    pub fn tick(&mut self) {
        self.poll_background_jobs();
        self.refresh_playback_ui();
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn synthesis(&self) -> &SynthesisState {
        &self.synthesis
    }

    pub fn voice_sample(&self) -> Option<&VoiceSample> {
        self.voice_sample.as_ref()
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = style::status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = label.to_string();
        self.ui.status.badge_color = color;
        self.ui.status.tone = tone;
        self.ui.status.open_folder = None;
    }

    /// Apply a settings change to both views and write the stored copy.
    fn update_settings(&mut self, change: impl Fn(&mut AppSettings)) {
        change(&mut self.settings);
        change(&mut self.stored_settings);
        let Some(path) = self.config_path.clone() else {
            return;
        };
        if let Err(err) = config::save_to_path(&self.stored_settings, &path) {
            tracing::warn!("Failed to save config: {err}");
            self.set_status(format!("Failed to save settings: {err}"), StatusTone::Warning);
        }
    }
}

impl Drop for TtsController {
    fn drop(&mut self) {
        self.jobs.cancel_all();
    }
}
