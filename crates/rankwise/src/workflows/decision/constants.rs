//! Contract constants shared by the normalizer, scoring, diagnostics, and ranking.
//!
//! Every threshold here is part of the observable behavior of the engine. Changing one
//! changes rankings, so they are defined once and referenced everywhere else.

/// Separator between option id and criterion id in a ratings matrix key.
pub const CELL_KEY_SEPARATOR: &str = "::";

pub const DESIRABILITY_MIN: f64 = 1.0;
pub const DESIRABILITY_MAX: f64 = 20.0;
/// Width of the desirability scale, used by the WSM normalization `(d - 1) / 19`.
pub const DESIRABILITY_RANGE: f64 = DESIRABILITY_MAX - DESIRABILITY_MIN;
/// WPM normalization divisor `d / 20`, mapping desirability into (0, 1].
pub const WPM_DIVISOR: f64 = DESIRABILITY_MAX;

/// Value written by the explicit "fill missing with neutral" action.
pub const NEUTRAL_FILL_DESIRABILITY: f64 = 10.0;
/// Desirability for a measured criterion whose observed raw values are all equal.
pub const MEASURED_EQUAL_RAW_NEUTRAL_DESIRABILITY: f64 = 10.5;

pub const OPTION_COVERAGE_WARNING_THRESHOLD: f64 = 0.7;
pub const OPTION_COVERAGE_STRONG_WARNING_THRESHOLD: f64 = 0.5;
pub const CRITERION_BLANK_RATE_SOFT_WARNING_THRESHOLD: f64 = 0.3;

/// Absolute score difference at or below which two scores share a rank.
pub const TIE_EPSILON: f64 = 1e-9;
/// Decimal places kept on WSM and WPM scores.
pub const SCORE_PRECISION: usize = 6;
/// Decimal places shown in score labels.
pub const SCORE_LABEL_PRECISION: usize = 3;
/// Label shown for an option without a score.
pub const MISSING_SCORE_LABEL: &str = "--";
