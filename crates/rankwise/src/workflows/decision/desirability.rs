//! Conversion of raw rating cells into the shared 1-20 desirability scale.
//!
//! Rating criteria read their stored value directly (the display mode decides which
//! sub-value wins when both exist). Measured criteria are min-max scaled against the raw
//! values every option reports for that same criterion.

use super::constants::{
    DESIRABILITY_MAX, DESIRABILITY_MIN, DESIRABILITY_RANGE, MEASURED_EQUAL_RAW_NEUTRAL_DESIRABILITY,
};
use super::domain::{
    Criterion, CriterionKind, DecisionOption, Rating120Cell, RatingInputMode, RatingsMatrix,
    RawDirection,
};
use std::collections::HashMap;

pub fn clamp_desirability(value: f64) -> f64 {
    value.clamp(DESIRABILITY_MIN, DESIRABILITY_MAX)
}

/// A stored rating value is usable only when finite and on the 1-20 scale.
pub fn accept_rating_value(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && (DESIRABILITY_MIN..=DESIRABILITY_MAX).contains(v))
}

/// Observed raw bounds for one measured criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredRange {
    pub min_raw: f64,
    pub max_raw: f64,
}

impl MeasuredRange {
    fn observe(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, raw| {
            Some(match range {
                None => Self {
                    min_raw: raw,
                    max_raw: raw,
                },
                Some(Self { min_raw, max_raw }) => Self {
                    min_raw: min_raw.min(raw),
                    max_raw: max_raw.max(raw),
                },
            })
        })
    }

    pub fn is_degenerate(&self) -> bool {
        self.min_raw == self.max_raw
    }
}

pub fn derive_measured_desirability(raw: f64, range: MeasuredRange, direction: RawDirection) -> f64 {
    if range.is_degenerate() {
        return MEASURED_EQUAL_RAW_NEUTRAL_DESIRABILITY;
    }

    let span = range.max_raw - range.min_raw;
    let position = match direction {
        RawDirection::HigherBetter => (raw - range.min_raw) / span,
        RawDirection::LowerBetter => (range.max_raw - raw) / span,
    };

    clamp_desirability(DESIRABILITY_MIN + DESIRABILITY_RANGE * position)
}

pub fn rating_desirability(cell: &Rating120Cell, mode: RatingInputMode) -> Option<f64> {
    let numeric = accept_rating_value(cell.numeric_value);
    let seven_level = cell.seven_level_value.map(|level| level.desirability());

    match mode {
        RatingInputMode::Numeric => numeric.or(seven_level),
        RatingInputMode::SevenLevel => seven_level.or(numeric),
    }
}

/// Resolves desirability for any cell of one snapshot.
///
/// Measured ranges are computed once on construction, so resolving every cell of a matrix
/// stays linear in the number of cells.
pub struct DesirabilityResolver<'a> {
    criteria: &'a [Criterion],
    matrix: &'a RatingsMatrix,
    mode: RatingInputMode,
    measured_ranges: HashMap<&'a str, MeasuredRange>,
}

impl<'a> DesirabilityResolver<'a> {
    pub fn new(
        options: &'a [DecisionOption],
        criteria: &'a [Criterion],
        matrix: &'a RatingsMatrix,
        mode: RatingInputMode,
    ) -> Self {
        let measured_ranges = criteria
            .iter()
            .filter(|criterion| matches!(criterion.kind, CriterionKind::NumericMeasured { .. }))
            .filter_map(|criterion| {
                let observed = options
                    .iter()
                    .filter_map(|option| matrix.raw_value(&option.id, &criterion.id));
                MeasuredRange::observe(observed).map(|range| (criterion.id.as_str(), range))
            })
            .collect();

        Self {
            criteria,
            matrix,
            mode,
            measured_ranges,
        }
    }

    pub fn measured_range(&self, criterion_id: &str) -> Option<MeasuredRange> {
        self.measured_ranges.get(criterion_id).copied()
    }

    pub fn resolve(&self, option_id: &str, criterion_id: &str) -> Option<f64> {
        let criterion = self
            .criteria
            .iter()
            .find(|criterion| criterion.id == criterion_id)?;
        self.resolve_for(option_id, criterion)
    }

    pub fn resolve_for(&self, option_id: &str, criterion: &Criterion) -> Option<f64> {
        match &criterion.kind {
            CriterionKind::Rating120 => {
                let cell = self.matrix.rating_cell(option_id, &criterion.id)?;
                rating_desirability(cell, self.mode)
            }
            CriterionKind::NumericMeasured { raw_direction, .. } => {
                let raw = self.matrix.raw_value(option_id, &criterion.id)?;
                let range = self.measured_range(&criterion.id)?;
                Some(derive_measured_desirability(raw, range, *raw_direction))
            }
        }
    }
}

/// Desirability of a single cell, or `None` when the cell is missing.
pub fn desirability(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    option_id: &str,
    criterion_id: &str,
    mode: RatingInputMode,
) -> Option<f64> {
    DesirabilityResolver::new(options, criteria, matrix, mode).resolve(option_id, criterion_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::decision::domain::{
        NumericMeasuredCell, RatingCell, SevenLevel,
    };

    fn range(min_raw: f64, max_raw: f64) -> MeasuredRange {
        MeasuredRange { min_raw, max_raw }
    }

    #[test]
    fn measured_desirability_never_leaks_zero() {
        let samples = [
            derive_measured_desirability(3.0, range(3.0, 9.0), RawDirection::HigherBetter),
            derive_measured_desirability(3.0, range(3.0, 9.0), RawDirection::LowerBetter),
            derive_measured_desirability(9.0, range(3.0, 9.0), RawDirection::HigherBetter),
            derive_measured_desirability(9.0, range(3.0, 9.0), RawDirection::LowerBetter),
        ];
        assert_eq!(samples, [1.0, 20.0, 20.0, 1.0]);
    }

    #[test]
    fn degenerate_range_resolves_to_mid_scale() {
        let value = derive_measured_desirability(12.0, range(12.0, 12.0), RawDirection::HigherBetter);
        assert_eq!(value, MEASURED_EQUAL_RAW_NEUTRAL_DESIRABILITY);
    }

    #[test]
    fn out_of_range_raw_values_are_clamped() {
        let value = derive_measured_desirability(100.0, range(0.0, 10.0), RawDirection::HigherBetter);
        assert_eq!(value, DESIRABILITY_MAX);
        let value = derive_measured_desirability(100.0, range(0.0, 10.0), RawDirection::LowerBetter);
        assert_eq!(value, DESIRABILITY_MIN);
    }

    #[test]
    fn display_mode_picks_authoritative_sub_value() {
        let cell = Rating120Cell {
            numeric_value: Some(12.0),
            seven_level_value: Some(SevenLevel::Excellent),
            last_edited_mode: None,
        };
        assert_eq!(rating_desirability(&cell, RatingInputMode::Numeric), Some(12.0));
        assert_eq!(rating_desirability(&cell, RatingInputMode::SevenLevel), Some(20.0));

        let label_only = Rating120Cell {
            numeric_value: None,
            seven_level_value: Some(SevenLevel::Poor),
            last_edited_mode: None,
        };
        assert_eq!(rating_desirability(&label_only, RatingInputMode::Numeric), Some(7.3));

        let numeric_only = Rating120Cell {
            numeric_value: Some(3.0),
            ..Rating120Cell::default()
        };
        assert_eq!(rating_desirability(&numeric_only, RatingInputMode::SevenLevel), Some(3.0));
        assert_eq!(rating_desirability(&Rating120Cell::default(), RatingInputMode::Numeric), None);
    }

    #[test]
    fn resolver_scopes_ranges_to_each_criterion() {
        let options = vec![
            DecisionOption::new("a", "A", 0),
            DecisionOption::new("b", "B", 1),
            DecisionOption::new("c", "C", 2),
        ];
        let criteria = vec![
            Criterion::measured("price", "Price", 0, RawDirection::LowerBetter, Some("USD")),
            Criterion::measured("size", "Size", 1, RawDirection::HigherBetter, None),
        ];
        let mut matrix = RatingsMatrix::new();
        for (option, price, size) in [("a", 100.0, 50.0), ("b", 200.0, 50.0)] {
            matrix.insert(
                option,
                "price",
                RatingCell::NumericMeasured(NumericMeasuredCell { raw_value: Some(price) }),
            );
            matrix.insert(
                option,
                "size",
                RatingCell::NumericMeasured(NumericMeasuredCell { raw_value: Some(size) }),
            );
        }

        let resolver = DesirabilityResolver::new(&options, &criteria, &matrix, RatingInputMode::Numeric);
        assert_eq!(resolver.resolve("a", "price"), Some(20.0));
        assert_eq!(resolver.resolve("b", "price"), Some(1.0));
        assert_eq!(resolver.resolve("a", "size"), Some(10.5));
        assert_eq!(resolver.resolve("b", "size"), Some(10.5));
        assert_eq!(resolver.resolve("c", "price"), None);
        assert_eq!(resolver.resolve("a", "unknown"), None);
    }

    #[test]
    fn measured_criterion_without_any_data_is_null_everywhere() {
        let options = vec![DecisionOption::new("a", "A", 0)];
        let criteria = vec![Criterion::measured("w", "Weight", 0, RawDirection::LowerBetter, None)];
        let matrix = RatingsMatrix::new();
        assert_eq!(
            desirability(&options, &criteria, &matrix, "a", "w", RatingInputMode::Numeric),
            None
        );
    }

    #[test]
    fn mismatched_cell_kind_reads_as_missing() {
        let options = vec![DecisionOption::new("a", "A", 0)];
        let criteria = vec![Criterion::rating("comfort", "Comfort", 0)];
        let mut matrix = RatingsMatrix::new();
        matrix.insert(
            "a",
            "comfort",
            RatingCell::NumericMeasured(NumericMeasuredCell { raw_value: Some(4.0) }),
        );
        assert_eq!(
            desirability(&options, &criteria, &matrix, "a", "comfort", RatingInputMode::Numeric),
            None
        );
    }
}
