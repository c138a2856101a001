use crate::catalog::ModelOptions;
use crate::selection::Selection;

/// Progress of the model catalog for the current session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogPhase {
    #[default]
    Idle,
    /// No user id is known; the login prompt is shown instead of loading.
    LoginRequired,
    Loading,
    Ready {
        count: usize,
    },
    Failed {
        message: String,
    },
}

impl CatalogPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Name and size of the attached voice sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceSampleInfo {
    pub file_name: String,
    pub bytes: usize,
}

/// Form contents for the generator panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratorState {
    /// Copy of the controller's selection, for the dropdowns.
    pub selection: Selection,
    pub options: ModelOptions,
    /// Text to synthesize; edited in place by the text box.
    pub text: String,
    /// True while the personalized model is selected.
    pub show_upload: bool,
    pub voice_sample: Option<VoiceSampleInfo>,
    /// True while a synthesis request is in flight.
    pub submitting: bool,
}
