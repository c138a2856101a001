use super::jobs::{CatalogLoadResult, JobMessage, SynthesisJobResult};
use super::*;
use crate::synthesis::{Completion, SynthesisPhase};

impl TtsController {
    pub(in crate::egui_app::controller) fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(
                    std::sync::mpsc::TryRecvError::Empty
                    | std::sync::mpsc::TryRecvError::Disconnected,
                ) => {
                    break;
                }
            };
            match message {
                JobMessage::CatalogLoaded(message) => self.apply_catalog_loaded(message),
                JobMessage::SynthesisFinished(message) => self.apply_synthesis_finished(message),
            }
        }
    }

    fn apply_catalog_loaded(&mut self, message: CatalogLoadResult) {
        if self.jobs.pending_catalog() != Some(message.request_id) {
            tracing::debug!(request = %message.request_id, "Dropping stale catalog result");
            return;
        }
        self.jobs.clear_catalog_pending();
        match message.result {
            Ok(entries) => {
                self.catalog = Catalog::new(entries);
                let count = self.catalog.len();
                self.ui.catalog = CatalogPhase::Ready { count };
                self.refresh_generator_ui();
                tracing::info!(user = %message.user, count, "Model catalog loaded");
                if count == 0 {
                    self.set_status(
                        format!("No models available for {}", message.user),
                        StatusTone::Warning,
                    );
                } else {
                    self.set_status(format!("{count} models available"), StatusTone::Info);
                }
            }
            Err(err) => {
                tracing::error!(user = %message.user, "Model catalog failed: {err}");
                self.ui.catalog = CatalogPhase::Failed {
                    message: err.to_string(),
                };
                self.set_status(format!("Failed to load models: {err}"), StatusTone::Error);
            }
        }
    }

    fn apply_synthesis_finished(&mut self, message: SynthesisJobResult) {
        let request_id = message.request_id;
        if self.synthesis.complete(request_id, message.result) == Completion::Stale {
            tracing::debug!(request = %request_id, "Dropping stale synthesis result");
            return;
        }
        self.jobs.clear_synthesis();
        self.ui.generator.submitting = false;
        match self.synthesis.phase() {
            SynthesisPhase::Ready(clip) => {
                let info = ClipInfo::from(clip);
                let text = match info.duration {
                    Some(duration) => format!(
                        "Speech ready ({})",
                        crate::egui_app::ui::format_duration(duration)
                    ),
                    None => "Speech ready".to_string(),
                };
                tracing::info!(request = %request_id, bytes = info.bytes, "Synthesis finished");
                self.ui.result.clip = Some(info);
                self.ui.result.failure = None;
                self.set_status(text, StatusTone::Info);
                if self.settings.playback.autoplay {
                    self.play();
                }
            }
            SynthesisPhase::Failed { message, .. } => {
                let message = message.clone();
                tracing::error!(request = %request_id, "Synthesis failed: {message}");
                self.ui.result.failure = Some(message.clone());
                self.set_status(format!("Synthesis failed: {message}"), StatusTone::Error);
            }
            SynthesisPhase::Idle | SynthesisPhase::Pending { .. } => {}
        }
    }
}
