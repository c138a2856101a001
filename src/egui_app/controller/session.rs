use super::*;
use crate::selection::SelectionField;

impl TtsController {
    /// Begin the session: load the catalog, or ask for a user id when none is known.
    pub fn start_session(&mut self) {
        match self.settings.backend.user.clone() {
            Some(user) => {
                self.ui.login.signed_in_as = Some(user.clone());
                self.load_catalog(user);
            }
            None => self.require_login(),
        }
    }

    /// Reload the catalog for the signed-in user.
    pub fn retry_catalog(&mut self) {
        match self.settings.backend.user.clone() {
            Some(user) => self.load_catalog(user),
            None => self.require_login(),
        }
    }

    fn load_catalog(&mut self, user: String) {
        let client = match &self.backend {
            Ok(client) => client.clone(),
            Err(err) => {
                let message = format!("Backend not configured: {err}");
                self.ui.catalog = CatalogPhase::Failed {
                    message: message.clone(),
                };
                self.set_status(message, StatusTone::Error);
                return;
            }
        };
        tracing::info!(%user, url = %client.catalog_url(&user), "Loading model catalog");
        self.ui.catalog = CatalogPhase::Loading;
        self.set_status("Loading models…", StatusTone::Busy);
        self.jobs.begin_catalog_load(client, user);
    }

    fn require_login(&mut self) {
        self.ui.catalog = CatalogPhase::LoginRequired;
        self.ui.login.open = true;
        self.ui.login.focus_requested = true;
        self.ui.login.signed_in_as = None;
        self.set_status("Sign in to load your models", StatusTone::Warning);
    }

    /// Open the configured login page in the system browser.
    pub fn open_login_page(&mut self) {
        let url = self.settings.backend.login_url.clone();
        match open::that(&url) {
            Ok(()) => self.ui.login.last_error = None,
            Err(err) => {
                self.ui.login.last_error = Some(format!("Could not open {url}: {err}"));
            }
        }
    }

    /// Accept a user id from the login prompt, persist it, and load the catalog.
    pub fn submit_login(&mut self, user: &str) {
        let user = user.trim().to_string();
        if user.is_empty() {
            self.ui.login.last_error = Some("Enter your user id.".to_string());
            self.ui.login.focus_requested = true;
            return;
        }
        let stored = user.clone();
        self.update_settings(move |settings| settings.backend.user = Some(stored.clone()));
        self.ui.login = LoginPromptState {
            signed_in_as: Some(user.clone()),
            ..LoginPromptState::default()
        };
        tracing::info!(%user, "Signed in");
        self.load_catalog(user);
    }

    /// Forget the user id and reset the session back to the login prompt.
    pub fn sign_out(&mut self) {
        self.jobs.cancel_all();
        self.update_settings(|settings| settings.backend.user = None);
        self.catalog = Catalog::default();
        self.selection.clear();
        self.voice_sample = None;
        self.synthesis.reset();
        self.release_clip();
        self.ui.result.failure = None;
        self.ui.generator.submitting = false;
        self.refresh_generator_ui();
        tracing::info!("Signed out");
        self.require_login();
    }

    pub fn set_language(&mut self, value: &str) {
        self.set_selection_field(SelectionField::Language, value);
    }

    pub fn set_dataset(&mut self, value: &str) {
        self.set_selection_field(SelectionField::Dataset, value);
    }

    pub fn set_model_name(&mut self, value: &str) {
        self.set_selection_field(SelectionField::ModelName, value);
    }

    /// Apply one dropdown change; re-picking the same value still resets descendants.
    fn set_selection_field(&mut self, field: SelectionField, value: &str) {
        self.selection.set(field, value);
        if !self.selection.is_personalized()
            && let Some(sample) = self.voice_sample.take()
        {
            tracing::info!(file = %sample.file_name, "Voice sample detached");
            self.set_status(
                format!("Voice sample {} removed", sample.file_name),
                StatusTone::Info,
            );
        }
        self.refresh_generator_ui();
    }

    /// Recompute dropdown options and upload visibility from the selection.
    pub(super) fn refresh_generator_ui(&mut self) {
        let generator = &mut self.ui.generator;
        generator.options = self.catalog.options_for(&self.selection);
        generator.selection = self.selection.clone();
        generator.show_upload = self.selection.is_personalized();
        generator.voice_sample = self.voice_sample.as_ref().map(|sample| VoiceSampleInfo {
            file_name: sample.file_name.clone(),
            bytes: sample.len(),
        });
    }
}
