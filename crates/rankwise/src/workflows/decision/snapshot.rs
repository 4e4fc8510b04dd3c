//! The immutable input bundle the HTTP and CLI adapters hand to the engine.

use super::coverage::{diagnose, DecisionDiagnostics};
use super::desirability::accept_rating_value;
use super::domain::{
    parse_cell_key, Criterion, CriterionType, CriterionWeights, DecisionOption, RatingCell,
    RatingInputMode, RatingsMatrix,
};
use super::fill::{missing_rating_review_items, FillMissingReviewItem};
use super::ranking::results_projection;
use super::ranking::views::ResultsProjection;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("option id '{0}' appears more than once")]
    DuplicateOption(String),
    #[error("criterion id '{0}' appears more than once")]
    DuplicateCriterion(String),
    #[error("ratings key '{0}' is not of the form optionId::criterionId")]
    MalformedCellKey(String),
    #[error("ratings key '{key}' references unknown option '{option_id}'")]
    UnknownOption { key: String, option_id: String },
    #[error("ratings key '{key}' references unknown criterion '{criterion_id}'")]
    UnknownCriterion { key: String, criterion_id: String },
    #[error("ratings key '{key}' holds a {found} cell but the criterion is {expected}")]
    CellKindMismatch {
        key: String,
        expected: CriterionType,
        found: CriterionType,
    },
    #[error("ratings key '{key}' has numeric rating {value} outside 1-20")]
    RatingOutOfRange { key: String, value: f64 },
}

/// Options, criteria, ratings, and weights as of one computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    pub options: Vec<DecisionOption>,
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub ratings: RatingsMatrix,
    #[serde(default)]
    pub weights: CriterionWeights,
}

impl DecisionSnapshot {
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut option_ids = HashSet::new();
        for option in &self.options {
            if !option_ids.insert(option.id.as_str()) {
                return Err(SnapshotError::DuplicateOption(option.id.clone()));
            }
        }

        let mut criterion_types = HashMap::new();
        for criterion in &self.criteria {
            if criterion_types
                .insert(criterion.id.as_str(), criterion.criterion_type())
                .is_some()
            {
                return Err(SnapshotError::DuplicateCriterion(criterion.id.clone()));
            }
        }

        for (key, cell) in self.ratings.iter() {
            let (option_id, criterion_id) =
                parse_cell_key(key).ok_or_else(|| SnapshotError::MalformedCellKey(key.to_string()))?;

            if !option_ids.contains(option_id) {
                return Err(SnapshotError::UnknownOption {
                    key: key.to_string(),
                    option_id: option_id.to_string(),
                });
            }

            let expected = criterion_types.get(criterion_id).copied().ok_or_else(|| {
                SnapshotError::UnknownCriterion {
                    key: key.to_string(),
                    criterion_id: criterion_id.to_string(),
                }
            })?;

            if cell.criterion_type() != expected {
                return Err(SnapshotError::CellKindMismatch {
                    key: key.to_string(),
                    expected,
                    found: cell.criterion_type(),
                });
            }

            if let RatingCell::Rating120(rating) = cell {
                if let Some(value) = rating.numeric_value {
                    if accept_rating_value(Some(value)).is_none() {
                        return Err(SnapshotError::RatingOutOfRange {
                            key: key.to_string(),
                            value,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn results(&self, mode: RatingInputMode) -> ResultsProjection {
        results_projection(&self.options, &self.criteria, &self.ratings, &self.weights, mode)
    }

    pub fn diagnostics(&self, mode: RatingInputMode) -> DecisionDiagnostics {
        diagnose(&self.options, &self.criteria, &self.ratings, &self.weights, mode)
    }

    pub fn review_items(&self) -> Vec<FillMissingReviewItem> {
        missing_rating_review_items(&self.options, &self.criteria, &self.ratings)
    }

    pub fn fill_missing_with_neutral(&mut self, mode: RatingInputMode) -> usize {
        self.ratings
            .fill_missing_with_neutral(&self.options, &self.criteria, mode)
    }
}
