use super::EguiApp;
use super::style;
use crate::egui_app::state::CatalogPhase;
use crate::selection::{PERSONALIZED_MODEL_NAME, SelectionField};
use eframe::egui::{self, RichText};

const PERSONALIZED_HINT: &str = "For a voice of your own, choose multilingual / multi-dataset / \
your_tts and upload a short recording of yourself.";

impl EguiApp {
    /// Model dropdowns, the voice sample upload, the text box and the submit row.
    pub(super) fn render_generator_panel(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        self.render_catalog_phase(ui);
        ui.add_space(8.0);

        let generator = self.controller.ui.generator.clone();
        let enabled = matches!(self.controller.ui.catalog, CatalogPhase::Ready { .. });
        egui::Grid::new("model_selection")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                let lists = [
                    (SelectionField::Language, &generator.options.languages),
                    (SelectionField::Dataset, &generator.options.datasets),
                    (SelectionField::ModelName, &generator.options.model_names),
                ];
                for (field, options) in lists {
                    ui.label(field.label());
                    let current = generator.selection.get(field);
                    if let Some(choice) = selection_combo(ui, enabled, field, current, options) {
                        match field {
                            SelectionField::Language => self.controller.set_language(&choice),
                            SelectionField::Dataset => self.controller.set_dataset(&choice),
                            SelectionField::ModelName => self.controller.set_model_name(&choice),
                        }
                    }
                    ui.end_row();
                }
            });

        ui.add_space(6.0);
        ui.label(RichText::new(PERSONALIZED_HINT).small().color(palette.text_muted));

        if generator.show_upload {
            ui.add_space(8.0);
            self.render_voice_sample_row(ui);
        }

        ui.add_space(12.0);
        ui.label("Text");
        ui.add(
            egui::TextEdit::multiline(&mut self.controller.ui.generator.text)
                .hint_text("Type the text to speak…")
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let submitting = self.controller.ui.generator.submitting;
            if ui
                .add_enabled(!submitting, egui::Button::new("Generate speech"))
                .clicked()
                && let Err(err) = self.controller.submit()
            {
                tracing::debug!("Submit refused: {err}");
            }
            if ui.button("Clear text").clicked() {
                self.controller.clear_text();
            }
            if submitting {
                ui.spinner();
                ui.label(RichText::new("Generating…").color(palette.text_muted));
            }
        });
    }

    fn render_catalog_phase(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        match self.controller.ui.catalog.clone() {
            CatalogPhase::Idle | CatalogPhase::Ready { .. } => {}
            CatalogPhase::LoginRequired => {
                ui.label(RichText::new("Sign in to see your models.").color(palette.text_muted));
            }
            CatalogPhase::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading models…").color(palette.text_muted));
                });
            }
            CatalogPhase::Failed { message } => {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("Models unavailable: {message}"))
                            .color(palette.warning),
                    );
                    if ui.button("Retry").clicked() {
                        self.controller.retry_catalog();
                    }
                });
            }
        }
    }

    fn render_voice_sample_row(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.label(format!("Voice sample for {PERSONALIZED_MODEL_NAME}"));
            if ui.button("Choose file…").clicked() {
                self.controller.pick_voice_sample();
            }
            match self.controller.ui.generator.voice_sample.clone() {
                Some(sample) => {
                    ui.label(
                        RichText::new(format!(
                            "{} ({})",
                            sample.file_name,
                            super::format_bytes(sample.bytes)
                        ))
                        .color(palette.accent_ice),
                    );
                    if ui.small_button("Remove").clicked() {
                        self.controller.clear_voice_sample();
                    }
                }
                None => {
                    ui.label(RichText::new("or drop a file here").color(palette.text_muted));
                }
            }
        });
    }
}

/// Render one dropdown; returns the newly picked value.
fn selection_combo(
    ui: &mut egui::Ui,
    enabled: bool,
    field: SelectionField,
    current: &str,
    options: &[String],
) -> Option<String> {
    let mut picked = None;
    let text = if current.is_empty() {
        format!("Select {}", field.label().to_lowercase())
    } else {
        current.to_string()
    };
    ui.add_enabled_ui(enabled && !options.is_empty(), |ui| {
        egui::ComboBox::from_id_salt(field.form_name())
            .selected_text(text)
            .width(260.0)
            .show_ui(ui, |ui| {
                for option in options {
                    if ui
                        .selectable_label(option == current, option.as_str())
                        .clicked()
                        && option != current
                    {
                        picked = Some(option.clone());
                    }
                }
            });
    });
    picked
}
