use std::path::Path;

use rfd::FileDialog;

use super::*;
use crate::synthesis::{RequestId, SubmitError};

/// Extensions offered by the voice sample picker.
pub const VOICE_SAMPLE_EXTENSIONS: [&str; 4] = ["wav", "mp3", "flac", "ogg"];

impl TtsController {
    /// Validate the form and send a synthesis request.
    ///
    /// A validation failure opens the blocking dialog and sends nothing.
    pub fn submit(&mut self) -> Result<RequestId, SubmitError> {
        if self.synthesis.is_pending() {
            return Err(SubmitError::AlreadyPending);
        }
        if let Err(err) = self.selection.validate() {
            tracing::info!(missing = ?err.missing, "Rejected incomplete submit");
            self.ui.validation_message = Some(err.to_string());
            return Err(err.into());
        }
        let client = match &self.backend {
            Ok(client) => client.clone(),
            Err(err) => {
                let err = SubmitError::BackendUnavailable(err.clone());
                self.set_status(err.to_string(), StatusTone::Error);
                return Err(err);
            }
        };
        let (request_id, request) = self.synthesis.submit(
            &self.selection,
            &self.ui.generator.text,
            self.voice_sample.as_ref(),
        )?;
        self.release_clip();
        self.ui.result.failure = None;
        self.ui.generator.submitting = true;
        self.set_status("Generating speech…", StatusTone::Busy);
        self.jobs.begin_synthesis(client, request_id, request);
        Ok(request_id)
    }

    /// Resend the request that last failed.
    pub fn retry(&mut self) -> Result<RequestId, SubmitError> {
        let client = match &self.backend {
            Ok(client) => client.clone(),
            Err(err) => return Err(SubmitError::BackendUnavailable(err.clone())),
        };
        let (request_id, request) = self.synthesis.retry()?;
        self.ui.result.failure = None;
        self.ui.generator.submitting = true;
        self.set_status("Retrying…", StatusTone::Busy);
        self.jobs.begin_synthesis(client, request_id, request);
        Ok(request_id)
    }

    pub fn dismiss_validation(&mut self) {
        self.ui.validation_message = None;
    }

    pub fn clear_text(&mut self) {
        self.ui.generator.text.clear();
    }

    /// Ask for a voice sample with the native file picker.
    pub fn pick_voice_sample(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Audio", &VOICE_SAMPLE_EXTENSIONS[..])
            .pick_file()
        else {
            return;
        };
        self.load_voice_sample(&path);
    }

    /// Read a voice sample from disk and attach it.
    pub fn load_voice_sample(&mut self, path: &Path) {
        match VoiceSample::from_path(path) {
            Ok(sample) => self.attach_voice_sample(sample),
            Err(err) => self.set_status(
                format!("Failed to read {}: {err}", path.display()),
                StatusTone::Error,
            ),
        }
    }

    pub fn attach_voice_sample(&mut self, sample: VoiceSample) {
        if sample.is_empty() {
            self.set_status(
                format!("{} is empty", sample.file_name),
                StatusTone::Warning,
            );
            return;
        }
        self.set_status(
            format!("Voice sample attached: {}", sample.file_name),
            StatusTone::Info,
        );
        self.voice_sample = Some(sample);
        self.refresh_generator_ui();
    }

    pub fn clear_voice_sample(&mut self) {
        self.voice_sample = None;
        self.refresh_generator_ui();
    }

    /// Attach the first usable file dropped on the window.
    ///
    /// Drops are ignored unless the personalized model is selected.
    pub fn handle_dropped_files(&mut self, files: Vec<egui::DroppedFile>) {
        if files.is_empty() {
            return;
        }
        if !self.selection.is_personalized() {
            self.set_status(
                format!(
                    "Select the {} model to upload a voice sample",
                    crate::selection::PERSONALIZED_MODEL_NAME
                ),
                StatusTone::Info,
            );
            return;
        }
        for file in files {
            if let Some(path) = file.path {
                if is_supported_sample(&path) {
                    self.load_voice_sample(&path);
                    return;
                }
            } else if let Some(bytes) = file.bytes {
                let name = if file.name.is_empty() {
                    "voice.wav".to_string()
                } else {
                    file.name
                };
                self.attach_voice_sample(VoiceSample::new(name, bytes));
                return;
            }
        }
        self.set_status("Drop a WAV, MP3, FLAC or OGG file", StatusTone::Warning);
    }
}

fn is_supported_sample(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VOICE_SAMPLE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
