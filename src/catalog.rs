//! Backend model catalog and the option lists derived from it.
//!
//! The backend neither de-duplicates entries nor sorts them, so every derived
//! list is distinct and keeps the order in which values first appear. Empty
//! strings are skipped since they stand for "unselected".

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::selection::Selection;

/// One available model as reported by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelEntry {
    pub language: String,
    pub dataset: String,
    pub model_name: String,
}

impl ModelEntry {
    pub fn new(
        language: impl Into<String>,
        dataset: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            dataset: dataset.into(),
            model_name: model_name.into(),
        }
    }
}

/// The list of models available to the current user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<ModelEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<ModelEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Distinct languages across the whole catalog.
    pub fn languages(&self) -> Vec<String> {
        distinct(self.entries.iter().map(|entry| entry.language.as_str()))
    }

    /// Distinct datasets among entries for `language`.
    pub fn datasets(&self, language: &str) -> Vec<String> {
        distinct(
            self.entries
                .iter()
                .filter(|entry| entry.language == language)
                .map(|entry| entry.dataset.as_str()),
        )
    }

    /// Distinct model names among entries for `language` and `dataset`.
    pub fn model_names(&self, language: &str, dataset: &str) -> Vec<String> {
        distinct(
            self.entries
                .iter()
                .filter(|entry| entry.language == language && entry.dataset == dataset)
                .map(|entry| entry.model_name.as_str()),
        )
    }

    /// Option lists for the three dropdowns given the current selection.
    ///
    /// Descendant lists stay empty until their ancestor is chosen.
    pub fn options_for(&self, selection: &Selection) -> ModelOptions {
        let languages = self.languages();
        let datasets = if selection.language.is_empty() {
            Vec::new()
        } else {
            self.datasets(&selection.language)
        };
        let model_names = if selection.language.is_empty() || selection.dataset.is_empty() {
            Vec::new()
        } else {
            self.model_names(&selection.language, &selection.dataset)
        };
        ModelOptions {
            languages,
            datasets,
            model_names,
        }
    }
}

/// Dropdown contents derived from the catalog and the selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelOptions {
    pub languages: Vec<String>,
    pub datasets: Vec<String>,
    pub model_names: Vec<String>,
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
