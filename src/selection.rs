//! Cascading language → dataset → model selection.
//!
//! Each field is only meaningful under its ancestors, so setting an ancestor
//! clears everything below it.

use std::fmt;

use thiserror::Error;

/// Model name of the personalized-voice variant that accepts a voice sample.
pub const PERSONALIZED_MODEL_NAME: &str = "your_tts";

/// One of the three cascading dropdowns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionField {
    Language,
    Dataset,
    ModelName,
}

impl SelectionField {
    pub const ALL: [SelectionField; 3] = [Self::Language, Self::Dataset, Self::ModelName];

    pub fn label(self) -> &'static str {
        match self {
            Self::Language => "Language",
            Self::Dataset => "Dataset",
            Self::ModelName => "Model name",
        }
    }

    /// Multipart/form field name used by the backend.
    pub fn form_name(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Dataset => "dataset",
            Self::ModelName => "model_name",
        }
    }
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How far the user has progressed through the cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStage {
    Empty,
    LanguageOnly,
    LanguageAndDataset,
    Complete,
}

/// Raised when a request is built from a partial selection.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Language, Dataset and Model name are required to generate the output speech.")]
pub struct ValidationError {
    /// Fields that were still empty.
    pub missing: Vec<SelectionField>,
}

/// The user's current, possibly partial, model choice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub language: String,
    pub dataset: String,
    pub model_name: String,
}

impl Selection {
    /// Choose a language; dataset and model name are cleared.
    pub fn set_language(&mut self, value: impl Into<String>) {
        *self = Self {
            language: value.into(),
            dataset: String::new(),
            model_name: String::new(),
        };
    }

    /// Choose a dataset under the current language; model name is cleared.
    pub fn set_dataset(&mut self, value: impl Into<String>) {
        self.dataset = value.into();
        self.model_name.clear();
    }

    /// Choose a model name; nothing else changes.
    pub fn set_model_name(&mut self, value: impl Into<String>) {
        self.model_name = value.into();
    }

    /// Apply a change to one field with the matching cascade reset.
    pub fn set(&mut self, field: SelectionField, value: impl Into<String>) {
        match field {
            SelectionField::Language => self.set_language(value),
            SelectionField::Dataset => self.set_dataset(value),
            SelectionField::ModelName => self.set_model_name(value),
        }
    }

    pub fn get(&self, field: SelectionField) -> &str {
        match field {
            SelectionField::Language => &self.language,
            SelectionField::Dataset => &self.dataset,
            SelectionField::ModelName => &self.model_name,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn stage(&self) -> SelectionStage {
        match (
            self.language.is_empty(),
            self.dataset.is_empty(),
            self.model_name.is_empty(),
        ) {
            (true, _, _) => SelectionStage::Empty,
            (false, true, _) => SelectionStage::LanguageOnly,
            (false, false, true) => SelectionStage::LanguageAndDataset,
            (false, false, false) => SelectionStage::Complete,
        }
    }

    /// Whether the voice-sample upload should be offered.
    pub fn is_personalized(&self) -> bool {
        self.model_name == PERSONALIZED_MODEL_NAME
    }

    pub fn missing_fields(&self) -> Vec<SelectionField> {
        SelectionField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    /// Ensure all three fields are chosen.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.language, self.dataset, self.model_name)
    }
}
