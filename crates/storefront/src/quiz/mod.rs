//! Skin quiz: recommendation filter, result history, and step-by-step state.
//!
//! The filter is a pure function of three answers. A product is recommended
//! when the shopper's skin type is one it suits AND it either treats their
//! concern OR is gentle enough for their sensitivity level:
//!
//! ```text
//! include = skin_type in suitable_for
//!           && (concern in concerns || sensitivity in sensitivity_level)
//! ```
//!
//! Skin type is mandatory while concern and sensitivity are alternatives.

mod history;
mod wizard;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dewdrop_core::{Sensitivity, SkinConcern, SkinType};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{Product, question_ids};
use crate::storage::StorageError;

pub use history::{MAX_QUIZ_HISTORY, QuizHistory};
pub use wizard::{QuizWizard, WizardView};

/// Raw quiz answers: question ID to chosen tag.
///
/// Tags are kept as submitted. Anything that is not a known tag simply
/// matches no product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizAnswers(BTreeMap<u8, String>);

impl QuizAnswers {
    /// Create an empty answer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build answers from the three tags, in question order.
    #[must_use]
    pub fn from_tags(skin_type: &str, concern: &str, sensitivity: &str) -> Self {
        let mut answers = Self::new();
        answers.set(question_ids::SKIN_TYPE, skin_type);
        answers.set(question_ids::SKIN_CONCERN, concern);
        answers.set(question_ids::SENSITIVITY, sensitivity);
        answers
    }

    /// Record the answer to a question, replacing any earlier answer.
    pub fn set(&mut self, question_id: u8, tag: impl Into<String>) {
        self.0.insert(question_id, tag.into());
    }

    /// The raw tag chosen for a question.
    #[must_use]
    pub fn get(&self, question_id: u8) -> Option<&str> {
        self.0.get(&question_id).map(String::as_str)
    }

    /// Returns `true` if the question has been answered.
    #[must_use]
    pub fn contains(&self, question_id: u8) -> bool {
        self.0.contains_key(&question_id)
    }

    /// Number of answered questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing has been answered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The skin type answer, if it is a known tag.
    #[must_use]
    pub fn skin_type(&self) -> Option<SkinType> {
        self.get(question_ids::SKIN_TYPE)?.parse().ok()
    }

    /// The concern answer, if it is a known tag.
    #[must_use]
    pub fn concern(&self) -> Option<SkinConcern> {
        self.get(question_ids::SKIN_CONCERN)?.parse().ok()
    }

    /// The sensitivity answer, if it is a known tag.
    #[must_use]
    pub fn sensitivity(&self) -> Option<Sensitivity> {
        self.get(question_ids::SENSITIVITY)?.parse().ok()
    }
}

/// Select the catalog products that fit a shopper, in catalog order.
///
/// A missing or unrecognized answer (`None`) matches nothing, so an absent
/// skin type always yields an empty result.
#[must_use]
pub fn recommend(
    catalog: &[Product],
    skin_type: Option<SkinType>,
    concern: Option<SkinConcern>,
    sensitivity: Option<Sensitivity>,
) -> Vec<Product> {
    catalog
        .iter()
        .filter(|product| {
            let matches_skin_type = skin_type.is_some_and(|t| product.suitable_for.contains(&t));
            let matches_concern = concern.is_some_and(|c| product.concerns.contains(&c));
            let matches_sensitivity =
                sensitivity.is_some_and(|s| product.sensitivity_level.contains(&s));

            matches_skin_type && (matches_concern || matches_sensitivity)
        })
        .cloned()
        .collect()
}

/// Run [`recommend`] over parsed answers.
#[must_use]
pub fn recommend_for(catalog: &[Product], answers: &QuizAnswers) -> Vec<Product> {
    recommend(
        catalog,
        answers.skin_type(),
        answers.concern(),
        answers.sensitivity(),
    )
}

/// A completed quiz, as kept in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    /// When the quiz was submitted.
    pub date: DateTime<Utc>,
    pub answers: QuizAnswers,
    /// Recommendations as computed at submission time.
    pub recommendations: Vec<Product>,
}

/// Compute recommendations for `answers` and record the result in `history`.
///
/// The result is returned even when persisting the history fails; the
/// storage error is returned alongside so the caller can report it.
#[instrument(skip_all, fields(answered = answers.len()))]
pub fn submit(
    history: &mut QuizHistory,
    catalog: &[Product],
    answers: QuizAnswers,
    date: DateTime<Utc>,
) -> (QuizResult, Result<(), StorageError>) {
    let recommendations = recommend_for(catalog, &answers);
    tracing::info!(matches = recommendations.len(), "Quiz submitted");

    let result = QuizResult {
        date,
        answers,
        recommendations,
    };
    let persisted = history.record(result.clone());
    (result, persisted)
}
