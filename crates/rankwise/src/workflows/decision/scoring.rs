//! Weighted Sum (WSM) and Weighted Product (WPM) aggregation.
//!
//! Missing cells are skipped per option: they leave both the numerator and the observed
//! weight, so an option is scored only on the evidence it actually has. An option with no
//! observed weight has no score under either method.

use super::constants::{DESIRABILITY_MIN, DESIRABILITY_RANGE, SCORE_PRECISION, WPM_DIVISOR};
use super::desirability::DesirabilityResolver;
use super::domain::{
    Criterion, CriterionType, CriterionWeights, DecisionOption, RatingInputMode, RatingsMatrix,
};
use super::weights::normalize_weights;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-criterion explanation of how one option was scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionRow {
    pub criterion_id: String,
    pub criterion_title: String,
    pub criterion_type: CriterionType,
    pub criterion_weight: u32,
    pub normalized_weight: f64,
    pub desirability: Option<f64>,
    pub raw_value: Option<f64>,
    pub wsm_contribution: f64,
    pub wpm_factor: f64,
    pub is_missing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionScore {
    pub option_id: String,
    pub option_title: String,
    pub option_order: u32,
    pub wsm_score: Option<f64>,
    pub wpm_score: Option<f64>,
    pub observed_weight: f64,
    pub contributions: Vec<ContributionRow>,
    pub missing_criterion_ids: Vec<String>,
}

/// Rounds to the score precision from the decimal form of `value`.
pub fn round_score(value: f64) -> f64 {
    format!("{:.*}", SCORE_PRECISION, value)
        .parse()
        .unwrap_or(value)
}

pub fn wsm_normalized(desirability: f64) -> f64 {
    (desirability - DESIRABILITY_MIN) / DESIRABILITY_RANGE
}

pub fn wpm_normalized(desirability: f64) -> f64 {
    desirability / WPM_DIVISOR
}

pub fn score_options(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    weights: &CriterionWeights,
    mode: RatingInputMode,
) -> Vec<OptionScore> {
    let resolver = DesirabilityResolver::new(options, criteria, matrix, mode);
    let normalized = normalize_weights(criteria, weights);
    score_with(&resolver, options, criteria, matrix, weights, &normalized)
}

pub(crate) fn score_with(
    resolver: &DesirabilityResolver<'_>,
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    weights: &CriterionWeights,
    normalized: &BTreeMap<String, f64>,
) -> Vec<OptionScore> {
    options
        .iter()
        .map(|option| score_option(resolver, option, criteria, matrix, weights, normalized))
        .collect()
}

fn score_option(
    resolver: &DesirabilityResolver<'_>,
    option: &DecisionOption,
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    weights: &CriterionWeights,
    normalized: &BTreeMap<String, f64>,
) -> OptionScore {
    let mut contributions = Vec::with_capacity(criteria.len());
    let mut missing_criterion_ids = Vec::new();
    let mut observed_weight = 0.0;
    let mut wsm_total = 0.0;
    let mut wpm_product = 1.0;

    for criterion in criteria {
        let weight = normalized.get(&criterion.id).copied().unwrap_or(0.0);
        let desirability = resolver.resolve_for(&option.id, criterion);
        let raw_value = match criterion.criterion_type() {
            CriterionType::NumericMeasured => matrix.raw_value(&option.id, &criterion.id),
            CriterionType::Rating120 => None,
        };

        let (wsm_contribution, wpm_factor) = match desirability {
            Some(value) => {
                let wsm_term = weight * wsm_normalized(value);
                let wpm_term = wpm_normalized(value).powf(weight);
                observed_weight += weight;
                wsm_total += wsm_term;
                wpm_product *= wpm_term;
                (wsm_term, wpm_term)
            }
            None => {
                missing_criterion_ids.push(criterion.id.clone());
                (0.0, 1.0)
            }
        };

        contributions.push(ContributionRow {
            criterion_id: criterion.id.clone(),
            criterion_title: criterion.title.clone(),
            criterion_type: criterion.criterion_type(),
            criterion_weight: weights.get(&criterion.id).unwrap_or(0),
            normalized_weight: weight,
            desirability,
            raw_value,
            wsm_contribution,
            wpm_factor,
            is_missing: desirability.is_none(),
        });
    }

    let (wsm_score, wpm_score) = if observed_weight > 0.0 {
        (
            Some(round_score(wsm_total / observed_weight)),
            Some(round_score(wpm_product.powf(1.0 / observed_weight))),
        )
    } else {
        (None, None)
    };

    OptionScore {
        option_id: option.id.clone(),
        option_title: option.title.clone(),
        option_order: option.order,
        wsm_score,
        wpm_score,
        observed_weight,
        contributions,
        missing_criterion_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::decision::domain::RawDirection;

    #[test]
    fn rounding_keeps_six_decimals() {
        assert_eq!(round_score(0.123_456_789), 0.123457);
        assert_eq!(round_score(1.0), 1.0);
        assert_eq!(round_score(0.1234565), 0.123456);
        assert_eq!(round_score(0.8750005), 0.875);
        assert_eq!(round_score(0.0000005), 0.0);
    }

    #[test]
    fn missing_cells_shrink_the_observed_weight() {
        let options = vec![DecisionOption::new("a", "A", 0)];
        let criteria = vec![
            Criterion::rating("x", "X", 0),
            Criterion::rating("y", "Y", 1),
        ];
        let weights: CriterionWeights = [("x", 1), ("y", 3)].into_iter().collect();
        let mut matrix = RatingsMatrix::new();
        matrix.set_rating_numeric("a", "x", Some(20.0));

        let scores = score_options(&options, &criteria, &matrix, &weights, RatingInputMode::Numeric);
        let score = &scores[0];

        assert_eq!(score.wsm_score, Some(1.0));
        assert_eq!(score.wpm_score, Some(1.0));
        assert!((score.observed_weight - 0.25).abs() < 1e-12);
        assert_eq!(score.missing_criterion_ids, vec!["y".to_string()]);
        let missing = &score.contributions[1];
        assert!(missing.is_missing);
        assert_eq!(missing.wsm_contribution, 0.0);
        assert_eq!(missing.wpm_factor, 1.0);
        assert_eq!(missing.criterion_weight, 3);
    }

    #[test]
    fn wsm_and_wpm_follow_their_formulas() {
        let options = vec![DecisionOption::new("a", "A", 0)];
        let criteria = vec![
            Criterion::rating("x", "X", 0),
            Criterion::rating("y", "Y", 1),
        ];
        let weights: CriterionWeights = [("x", 1), ("y", 1)].into_iter().collect();
        let mut matrix = RatingsMatrix::new();
        matrix.set_rating_numeric("a", "x", Some(20.0));
        matrix.set_rating_numeric("a", "y", Some(10.5));

        let score = score_options(&options, &criteria, &matrix, &weights, RatingInputMode::Numeric)
            .remove(0);

        assert_eq!(score.wsm_score, Some(round_score((1.0 + 0.5) / 2.0)));
        let expected_wpm = (1.0f64.powf(0.5) * (10.5f64 / 20.0).powf(0.5)).powf(1.0);
        assert_eq!(score.wpm_score, Some(round_score(expected_wpm)));
    }

    #[test]
    fn no_observed_weight_means_no_score() {
        let options = vec![DecisionOption::new("a", "A", 0)];
        let criteria = vec![Criterion::rating("x", "X", 0)];
        let mut matrix = RatingsMatrix::new();
        matrix.set_rating_numeric("a", "x", Some(15.0));

        let unweighted = score_options(
            &options,
            &criteria,
            &matrix,
            &CriterionWeights::new(),
            RatingInputMode::Numeric,
        );
        assert_eq!(unweighted[0].wsm_score, None);
        assert_eq!(unweighted[0].wpm_score, None);
        assert!(unweighted[0].missing_criterion_ids.is_empty());
    }

    #[test]
    fn contribution_rows_expose_raw_values_for_measured_criteria() {
        let options = vec![DecisionOption::new("a", "A", 0), DecisionOption::new("b", "B", 1)];
        let criteria = vec![Criterion::measured(
            "price",
            "Price",
            0,
            RawDirection::LowerBetter,
            Some("USD"),
        )];
        let weights: CriterionWeights = [("price", 2)].into_iter().collect();
        let mut matrix = RatingsMatrix::new();
        matrix.set_measured_raw("a", "price", Some(250.0));
        matrix.set_measured_raw("b", "price", Some(500.0));

        let scores = score_options(&options, &criteria, &matrix, &weights, RatingInputMode::Numeric);
        let row = &scores[0].contributions[0];
        assert_eq!(row.raw_value, Some(250.0));
        assert_eq!(row.desirability, Some(20.0));
        assert_eq!(row.normalized_weight, 1.0);
        assert_eq!(scores[0].wsm_score, Some(1.0));
        assert_eq!(scores[1].wsm_score, Some(0.0));
        assert_eq!(scores[1].wpm_score, Some(0.05));
    }
}
