use super::EguiApp;
use super::style;
use crate::download::DOWNLOAD_FILE_NAME;
use eframe::egui::{self, RichText};

impl EguiApp {
    /// Player, download and retry controls for the latest synthesis.
    pub(super) fn render_result_panel(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let result = self.controller.ui.result.clone();

        if let Some(failure) = result.failure.as_ref() {
            egui::Frame::new()
                .stroke(style::outer_border())
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.label(RichText::new(failure).color(palette.warning));
                    if ui
                        .add_enabled(
                            !self.controller.ui.generator.submitting,
                            egui::Button::new("Retry"),
                        )
                        .clicked()
                        && let Err(err) = self.controller.retry()
                    {
                        tracing::debug!("Retry refused: {err}");
                    }
                });
            return;
        }

        let Some(clip) = result.clip.as_ref() else {
            return;
        };
        egui::Frame::new()
            .stroke(style::outer_border())
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let label = if result.playing { "Stop" } else { "Play" };
                    if ui.button(label).clicked() {
                        if result.playing {
                            self.controller.stop();
                        } else {
                            self.controller.play();
                        }
                    }
                    let elapsed = result.position.unwrap_or_default();
                    let timing = match clip.duration {
                        Some(total) => format!(
                            "{} / {}",
                            super::format_duration(elapsed),
                            super::format_duration(total)
                        ),
                        None => super::format_duration(elapsed),
                    };
                    ui.label(RichText::new(timing).monospace());
                });
                ui.add(
                    egui::ProgressBar::new(result.progress.unwrap_or(0.0))
                        .desired_height(6.0)
                        .fill(palette.accent_mint),
                );
                ui.horizontal(|ui| {
                    let mut volume = result.volume;
                    let response = ui.add(
                        egui::Slider::new(&mut volume, 0.0..=1.0)
                            .text("Volume")
                            .show_value(false),
                    );
                    if response.changed() {
                        self.controller.set_volume(volume);
                    }
                    if response.drag_stopped() || (response.changed() && !response.dragged()) {
                        self.controller.commit_volume();
                    }
                });
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui
                        .button("Download")
                        .on_hover_text(format!("Save as {DOWNLOAD_FILE_NAME}"))
                        .clicked()
                    {
                        self.controller.download_result();
                    }
                    let mut details = super::format_bytes(clip.bytes);
                    if let Some(kind) = clip.content_type.as_ref() {
                        details.push_str(&format!(" · {kind}"));
                    }
                    ui.label(RichText::new(details).small().color(palette.text_muted));
                });
            });
    }
}
