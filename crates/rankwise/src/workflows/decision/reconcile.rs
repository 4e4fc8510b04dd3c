//! Edit-time reconciliation of the two representations of a rating cell.
//!
//! A rating cell carries both a 1-20 number and a seven-level label. Editing one side only
//! fills the other side when it is empty, so an explicit choice the user made in the other
//! input mode is never overwritten.

use super::desirability::accept_rating_value;
use super::domain::{
    NumericMeasuredCell, Rating120Cell, RatingCell, RatingInputMode, RatingsMatrix, SevenLevel,
};
use serde::{Deserialize, Serialize};

impl Rating120Cell {
    /// Applies a numeric edit. Out-of-range or non-finite input clears the numeric side.
    pub fn with_numeric(self, value: Option<f64>) -> Self {
        let numeric_value = accept_rating_value(value);
        let seven_level_value = match numeric_value {
            Some(numeric) => self
                .seven_level_value
                .or_else(|| Some(SevenLevel::nearest(numeric))),
            None => self.seven_level_value,
        };

        Self {
            numeric_value,
            seven_level_value,
            last_edited_mode: Some(RatingInputMode::Numeric),
        }
    }

    pub fn with_seven_level(self, value: Option<SevenLevel>) -> Self {
        let numeric_value = match value {
            Some(level) => self.numeric_value.or(Some(level.desirability())),
            None => self.numeric_value,
        };

        Self {
            numeric_value,
            seven_level_value: value,
            last_edited_mode: Some(RatingInputMode::SevenLevel),
        }
    }
}

/// A single user edit against the ratings matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellEdit {
    RatingNumeric {
        option_id: String,
        criterion_id: String,
        value: Option<f64>,
    },
    RatingSevenLevel {
        option_id: String,
        criterion_id: String,
        value: Option<SevenLevel>,
    },
    MeasuredRaw {
        option_id: String,
        criterion_id: String,
        value: Option<f64>,
    },
}

impl RatingsMatrix {
    fn rating_cell_or_default(&self, option_id: &str, criterion_id: &str) -> Rating120Cell {
        self.rating_cell(option_id, criterion_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_rating_numeric(&mut self, option_id: &str, criterion_id: &str, value: Option<f64>) {
        let cell = self
            .rating_cell_or_default(option_id, criterion_id)
            .with_numeric(value);
        self.insert(option_id, criterion_id, RatingCell::Rating120(cell));
    }

    pub fn set_rating_seven_level(
        &mut self,
        option_id: &str,
        criterion_id: &str,
        value: Option<SevenLevel>,
    ) {
        let cell = self
            .rating_cell_or_default(option_id, criterion_id)
            .with_seven_level(value);
        self.insert(option_id, criterion_id, RatingCell::Rating120(cell));
    }

    /// Stores a measured raw value. Non-finite input is treated as a cleared cell.
    pub fn set_measured_raw(&mut self, option_id: &str, criterion_id: &str, value: Option<f64>) {
        let cell = NumericMeasuredCell {
            raw_value: value.filter(|raw| raw.is_finite()),
        };
        self.insert(option_id, criterion_id, RatingCell::NumericMeasured(cell));
    }

    pub fn apply_edit(&mut self, edit: &CellEdit) {
        match edit {
            CellEdit::RatingNumeric {
                option_id,
                criterion_id,
                value,
            } => self.set_rating_numeric(option_id, criterion_id, *value),
            CellEdit::RatingSevenLevel {
                option_id,
                criterion_id,
                value,
            } => self.set_rating_seven_level(option_id, criterion_id, *value),
            CellEdit::MeasuredRaw {
                option_id,
                criterion_id,
                value,
            } => self.set_measured_raw(option_id, criterion_id, *value),
        }
    }
}
