use super::EguiApp;
use super::style;
use crate::egui_app::state::StatusTone;
use eframe::egui::{self, Align2, RichText};

impl EguiApp {
    /// Modal asking for a user id, with a shortcut to the login page.
    pub(super) fn render_login_prompt(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.login.open {
            return;
        }
        let palette = style::palette();
        let mut open = true;
        let mut open_page = false;
        let mut submitted = None;
        egui::Window::new("Sign in")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Sign in on the web page, then enter your user id here.")
                        .color(palette.text_primary),
                );
                ui.add_space(6.0);
                if ui.button("Open login page").clicked() {
                    open_page = true;
                }
                ui.add_space(8.0);
                let state = &mut self.controller.ui.login;
                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.user_input)
                        .hint_text("User id")
                        .desired_width(380.0),
                );
                if state.focus_requested && !response.has_focus() {
                    response.request_focus();
                    state.focus_requested = false;
                }
                let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if let Some(err) = state.last_error.as_ref() {
                    ui.add_space(6.0);
                    ui.label(RichText::new(err).color(style::status_badge_color(StatusTone::Error)));
                }
                ui.add_space(8.0);
                let can_submit = !state.user_input.trim().is_empty();
                let clicked = ui
                    .add_enabled(can_submit, egui::Button::new("Continue"))
                    .clicked();
                if clicked || (enter && can_submit) {
                    submitted = Some(state.user_input.clone());
                }
            });
        if open_page {
            self.controller.open_login_page();
        }
        if let Some(user) = submitted {
            self.controller.submit_login(&user);
        } else if !open {
            self.controller.ui.login.open = false;
        }
    }
}
