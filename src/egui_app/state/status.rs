use crate::egui_app::ui::style;
use egui::Color32;

/// Severity of the footer status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
    pub tone: StatusTone,
    /// Folder offered by the "Open folder" action after a download.
    pub open_folder: Option<std::path::PathBuf>,
}

impl StatusBarState {
    /// Default status shown before the session starts.
    pub fn idle() -> Self {
        Self::new("Pick a model to get started", StatusTone::Idle)
    }

    pub fn new(text: impl Into<String>, tone: StatusTone) -> Self {
        let (label, color) = style::status_badge(tone);
        Self {
            text: text.into(),
            badge_label: label.to_string(),
            badge_color: color,
            tone,
            open_folder: None,
        }
    }
}
