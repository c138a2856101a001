//! egui renderer for the generator window.
mod generator_panel;
mod login_prompt;
mod result_panel;
mod status_bar;
pub mod style;
mod validation_prompt;

use std::time::Duration;

use crate::egui_app::controller::TtsController;
use eframe::egui::{self, Frame, Margin, RichText};

/// Smallest window size that keeps the form usable.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(520.0, 560.0);

const PLAYBACK_REPAINT: Duration = Duration::from_millis(50);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: TtsController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app and start the session (catalog load or login prompt).
    pub fn new(mut controller: TtsController, ctx: &egui::Context) -> Self {
        controller.attach_repaint(ctx.clone());
        controller.start_session();
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("header")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Text to speech")
                            .heading()
                            .color(palette.accent_mint),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        match self.controller.ui.login.signed_in_as.clone() {
                            Some(user) => {
                                if ui.button("Sign out").clicked() {
                                    self.controller.sign_out();
                                }
                                ui.label(
                                    RichText::new(format!("Signed in as {user}"))
                                        .color(palette.text_muted),
                                );
                            }
                            None => {
                                if ui.button("Sign in").clicked() {
                                    self.controller.ui.login.open = true;
                                    self.controller.ui.login.focus_requested = true;
                                }
                            }
                        }
                    });
                });
            });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        self.controller.handle_dropped_files(dropped);
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.tick();
        self.handle_dropped_files(ctx);
        self.render_header(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default()
            .frame(Frame::new().inner_margin(Margin::same(16)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_generator_panel(ui);
                    ui.add_space(16.0);
                    self.render_result_panel(ui);
                });
            });
        self.render_login_prompt(ctx);
        self.render_validation_prompt(ctx);
        if self.controller.ui.result.playing {
            ctx.request_repaint_after(PLAYBACK_REPAINT);
        }
    }
}

/// Format a duration as `m:ss`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a byte count with a binary unit.
pub fn format_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::from_millis(500)), "0:00");
        assert_eq!(format_duration(Duration::from_secs(65)), "1:05");
    }

    #[test]
    fn byte_counts_pick_a_unit() {
        assert_eq!(format_bytes(12), "12 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }
}
