use super::constants::{
    CRITERION_BLANK_RATE_SOFT_WARNING_THRESHOLD, OPTION_COVERAGE_STRONG_WARNING_THRESHOLD,
    OPTION_COVERAGE_WARNING_THRESHOLD,
};
use super::desirability::DesirabilityResolver;
use super::domain::{Criterion, CriterionWeights, DecisionOption, RatingInputMode, RatingsMatrix};
use super::weights::{normalize_weights, weight_assignment_status, WeightAssignmentStatus};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageSeverity {
    Ok,
    Warning,
    StrongWarning,
}

impl CoverageSeverity {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < OPTION_COVERAGE_STRONG_WARNING_THRESHOLD {
            Self::StrongWarning
        } else if ratio < OPTION_COVERAGE_WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Ok
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::StrongWarning => "Strong warning",
        }
    }
}

/// Share of an option's possible weighted evidence that is actually present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCoverage {
    pub option_id: String,
    pub filled_weight: f64,
    pub total_weight: f64,
    pub coverage_ratio: f64,
    pub coverage_percent: u8,
    pub severity: CoverageSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionBlankRate {
    pub criterion_id: String,
    pub blanks: usize,
    pub total_options: usize,
    pub blank_rate: f64,
    pub is_soft_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingsCompletion {
    pub total_cells: usize,
    pub filled_count: usize,
    pub missing_count: usize,
    pub completion_percent: u8,
}

/// Every diagnostic the results view surfaces next to the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionDiagnostics {
    pub option_coverage: Vec<OptionCoverage>,
    pub criterion_blank_rates: Vec<CriterionBlankRate>,
    pub weight_status: WeightAssignmentStatus,
    pub ratings_completion: RatingsCompletion,
}

fn percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn option_weighted_coverage(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    weights: &CriterionWeights,
    mode: RatingInputMode,
) -> Vec<OptionCoverage> {
    let resolver = DesirabilityResolver::new(options, criteria, matrix, mode);
    let normalized = normalize_weights(criteria, weights);
    coverage_with(&resolver, options, criteria, &normalized)
}

pub(crate) fn coverage_with(
    resolver: &DesirabilityResolver<'_>,
    options: &[DecisionOption],
    criteria: &[Criterion],
    normalized: &BTreeMap<String, f64>,
) -> Vec<OptionCoverage> {
    let weight_of = |criterion: &Criterion| normalized.get(&criterion.id).copied().unwrap_or(0.0);
    let total_weight: f64 = criteria.iter().map(weight_of).sum();

    options
        .iter()
        .map(|option| {
            let filled_weight: f64 = criteria
                .iter()
                .filter(|criterion| resolver.resolve_for(&option.id, criterion).is_some())
                .map(weight_of)
                .sum();

            let coverage_ratio = if total_weight > 0.0 {
                filled_weight / total_weight
            } else {
                0.0
            };

            OptionCoverage {
                option_id: option.id.clone(),
                filled_weight,
                total_weight,
                coverage_ratio,
                coverage_percent: percent(coverage_ratio),
                severity: CoverageSeverity::from_ratio(coverage_ratio),
            }
        })
        .collect()
}

pub fn criterion_blank_rates(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    mode: RatingInputMode,
) -> Vec<CriterionBlankRate> {
    let resolver = DesirabilityResolver::new(options, criteria, matrix, mode);
    blank_rates_with(&resolver, options, criteria)
}

pub(crate) fn blank_rates_with(
    resolver: &DesirabilityResolver<'_>,
    options: &[DecisionOption],
    criteria: &[Criterion],
) -> Vec<CriterionBlankRate> {
    let total_options = options.len();

    criteria
        .iter()
        .map(|criterion| {
            let blanks = options
                .iter()
                .filter(|option| resolver.resolve_for(&option.id, criterion).is_none())
                .count();
            let blank_rate = if total_options == 0 {
                0.0
            } else {
                blanks as f64 / total_options as f64
            };

            CriterionBlankRate {
                criterion_id: criterion.id.clone(),
                blanks,
                total_options,
                blank_rate,
                is_soft_warning: blank_rate > CRITERION_BLANK_RATE_SOFT_WARNING_THRESHOLD,
            }
        })
        .collect()
}

pub fn ratings_completion(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    mode: RatingInputMode,
) -> RatingsCompletion {
    let resolver = DesirabilityResolver::new(options, criteria, matrix, mode);
    completion_with(&resolver, options, criteria)
}

pub(crate) fn completion_with(
    resolver: &DesirabilityResolver<'_>,
    options: &[DecisionOption],
    criteria: &[Criterion],
) -> RatingsCompletion {
    let total_cells = options.len() * criteria.len();
    let missing_count = options
        .iter()
        .flat_map(|option| criteria.iter().map(move |criterion| (option, criterion)))
        .filter(|(option, criterion)| resolver.resolve_for(&option.id, criterion).is_none())
        .count();
    let filled_count = total_cells - missing_count;
    let completion_percent = if total_cells == 0 {
        0
    } else {
        percent(filled_count as f64 / total_cells as f64)
    };

    RatingsCompletion {
        total_cells,
        filled_count,
        missing_count,
        completion_percent,
    }
}

pub fn diagnose(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    weights: &CriterionWeights,
    mode: RatingInputMode,
) -> DecisionDiagnostics {
    let resolver = DesirabilityResolver::new(options, criteria, matrix, mode);
    let normalized = normalize_weights(criteria, weights);

    DecisionDiagnostics {
        option_coverage: coverage_with(&resolver, options, criteria, &normalized),
        criterion_blank_rates: blank_rates_with(&resolver, options, criteria),
        weight_status: weight_assignment_status(criteria, weights),
        ratings_completion: completion_with(&resolver, options, criteria),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_thresholds_are_exclusive_upper_bounds() {
        assert_eq!(CoverageSeverity::from_ratio(0.49), CoverageSeverity::StrongWarning);
        assert_eq!(CoverageSeverity::from_ratio(0.5), CoverageSeverity::Warning);
        assert_eq!(CoverageSeverity::from_ratio(0.69), CoverageSeverity::Warning);
        assert_eq!(CoverageSeverity::from_ratio(0.7), CoverageSeverity::Ok);
        assert_eq!(CoverageSeverity::from_ratio(1.0), CoverageSeverity::Ok);
    }

    #[test]
    fn zero_total_weight_is_a_strong_warning() {
        let options = vec![DecisionOption::new("a", "A", 0)];
        let criteria = vec![Criterion::rating("x", "X", 0)];
        let mut matrix = RatingsMatrix::new();
        matrix.set_rating_numeric("a", "x", Some(12.0));

        let coverage = option_weighted_coverage(
            &options,
            &criteria,
            &matrix,
            &CriterionWeights::new(),
            RatingInputMode::Numeric,
        );
        assert_eq!(coverage[0].coverage_ratio, 0.0);
        assert_eq!(coverage[0].severity, CoverageSeverity::StrongWarning);
    }

    #[test]
    fn completion_counts_every_option_criterion_pair() {
        let options = vec![DecisionOption::new("a", "A", 0), DecisionOption::new("b", "B", 1)];
        let criteria = vec![Criterion::rating("x", "X", 0), Criterion::rating("y", "Y", 1)];
        let mut matrix = RatingsMatrix::new();
        matrix.set_rating_numeric("a", "x", Some(12.0));
        matrix.set_rating_numeric("b", "x", Some(2.0));
        matrix.set_rating_numeric("b", "y", Some(7.0));

        let completion = ratings_completion(&options, &criteria, &matrix, RatingInputMode::Numeric);
        assert_eq!(completion.total_cells, 4);
        assert_eq!(completion.filled_count, 3);
        assert_eq!(completion.missing_count, 1);
        assert_eq!(completion.completion_percent, 75);

        let empty = ratings_completion(&[], &criteria, &matrix, RatingInputMode::Numeric);
        assert_eq!(empty.completion_percent, 0);
    }

    #[test]
    fn blank_rate_with_no_options_is_zero() {
        let criteria = vec![Criterion::rating("x", "X", 0)];
        let rates = criterion_blank_rates(&[], &criteria, &RatingsMatrix::new(), RatingInputMode::Numeric);
        assert_eq!(rates[0].blank_rate, 0.0);
        assert!(!rates[0].is_soft_warning);
    }

    #[test]
    fn blank_rate_warns_only_above_thirty_percent() {
        let options: Vec<DecisionOption> = (0..10)
            .map(|index| DecisionOption::new(format!("o{index}"), format!("Option {index}"), index))
            .collect();
        let criteria = vec![Criterion::rating("x", "X", 0)];

        let rated = |blank: u32| {
            let mut matrix = RatingsMatrix::new();
            for option in options.iter().filter(|option| option.order >= blank) {
                matrix.set_rating_numeric(&option.id, "x", Some(12.0));
            }
            criterion_blank_rates(&options, &criteria, &matrix, RatingInputMode::Numeric)
        };

        let three_blank = rated(3);
        assert_eq!(three_blank[0].blanks, 3);
        assert_eq!(three_blank[0].blank_rate, 0.3);
        assert!(!three_blank[0].is_soft_warning);

        let four_blank = rated(4);
        assert_eq!(four_blank[0].blanks, 4);
        assert!(four_blank[0].is_soft_warning);
    }
}
