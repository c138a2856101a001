//! UI state mirrored from the controller and read by the renderer.

mod generator;
mod login;
mod result;
mod status;

pub use generator::{CatalogPhase, GeneratorState, VoiceSampleInfo};
pub use login::LoginPromptState;
pub use result::{ClipInfo, ResultState};
pub use status::{StatusBarState, StatusTone};

/// Top-level UI state for the generator window.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    pub catalog: CatalogPhase,
    pub generator: GeneratorState,
    pub result: ResultState,
    pub login: LoginPromptState,
    /// Message of the blocking validation dialog, when shown.
    pub validation_message: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            catalog: CatalogPhase::Idle,
            generator: GeneratorState::default(),
            result: ResultState::default(),
            login: LoginPromptState::default(),
            validation_message: None,
        }
    }
}
