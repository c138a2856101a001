use super::EguiApp;
use super::style;
use eframe::egui::{self, Align2, RichText};

impl EguiApp {
    /// Blocking dialog shown when submit is pressed with an incomplete selection.
    pub(super) fn render_validation_prompt(&mut self, ctx: &egui::Context) {
        let Some(message) = self.controller.ui.validation_message.clone() else {
            return;
        };
        let mut open = true;
        let mut dismissed = false;
        egui::Window::new("Missing selection")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(message)
                        .color(style::status_badge_color(crate::egui_app::state::StatusTone::Warning)),
                );
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if !open || dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.dismiss_validation();
        }
    }
}
