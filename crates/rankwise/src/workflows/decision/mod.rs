//! Multi-criteria decision scoring: desirability normalization, WSM/WPM aggregation,
//! coverage diagnostics, and ranking with a cross-method agreement check.
//!
//! Every function here is a pure computation over an immutable snapshot of options,
//! criteria, ratings, and weights. Only the edit operations on `RatingsMatrix` mutate.

pub mod constants;
pub mod coverage;
pub mod desirability;
pub mod domain;
pub mod fill;
mod reconcile;
pub mod ranking;
pub mod router;
pub mod scoring;
pub mod snapshot;
pub mod weights;

#[cfg(test)]
mod tests;

pub use coverage::{
    criterion_blank_rates, diagnose, option_weighted_coverage, ratings_completion,
    CoverageSeverity, CriterionBlankRate, DecisionDiagnostics, OptionCoverage, RatingsCompletion,
};
pub use desirability::{desirability, DesirabilityResolver, MeasuredRange};
pub use domain::{
    cell_key, parse_cell_key, Criterion, CriterionKind, CriterionType, CriterionWeights,
    DecisionOption, NumericMeasuredCell, Rating120Cell, RatingCell, RatingInputMode,
    RatingsMatrix, RawDirection, SevenLevel, UnknownSevenLevel,
};
pub use fill::{missing_rating_review_items, FillMissingReviewItem};
pub use ranking::views::{
    MethodAgreement, MethodCheck, MethodDifference, MethodRanking, RankingRow, ResultMethod,
    ResultsProjection,
};
pub use ranking::{method_check, results_projection};
pub use reconcile::CellEdit;
pub use router::decision_router;
pub use scoring::{score_options, ContributionRow, OptionScore};
pub use snapshot::{DecisionSnapshot, SnapshotError};
pub use weights::{
    normalize_weights, weight_assignment_status, weights_complete, WeightAssignmentStatus,
};
