use super::super::coverage::{coverage_with, OptionCoverage};
use super::super::desirability::DesirabilityResolver;
use super::super::domain::{
    Criterion, CriterionType, CriterionWeights, DecisionOption, RatingInputMode, RatingsMatrix,
};
use super::super::scoring::{score_with, OptionScore};
use super::super::weights::normalize_weights;
use super::views::{
    MethodAgreement, MethodCheck, MethodDifference, MethodRanking, RankingRow, ResultMethod,
    ResultsProjection,
};
use super::{rank_rows, top_ranked_option_id};
use tracing::debug;

fn method_ranking(
    method: ResultMethod,
    scores: &[OptionScore],
    coverage: &[OptionCoverage],
) -> MethodRanking {
    let rows = rank_rows(method, scores, coverage);
    let top_option_id = top_ranked_option_id(&rows).map(str::to_string);
    MethodRanking {
        method,
        rows,
        top_option_id,
    }
}

fn title_of(rows: &[RankingRow], option_id: Option<&str>) -> Option<String> {
    let option_id = option_id?;
    rows.iter()
        .find(|row| row.option_id == option_id)
        .map(|row| row.option_title.clone())
}

fn compare(wsm: MethodRanking, wpm: MethodRanking) -> MethodCheck {
    let state = match (&wsm.top_option_id, &wpm.top_option_id) {
        (Some(left), Some(right)) if left == right => MethodAgreement::Agree,
        (Some(_), Some(_)) => MethodAgreement::Differ,
        _ => MethodAgreement::InsufficientData,
    };

    let difference = MethodDifference {
        top_changed: state == MethodAgreement::Differ,
        wsm_top_option_title: title_of(&wsm.rows, wsm.top_option_id.as_deref()),
        wpm_top_option_title: title_of(&wpm.rows, wpm.top_option_id.as_deref()),
        wsm_top_option_id: wsm.top_option_id.clone(),
        wpm_top_option_id: wpm.top_option_id.clone(),
    };

    MethodCheck {
        state,
        summary: state.summary().to_string(),
        can_expand: state == MethodAgreement::Differ,
        wsm,
        wpm,
        difference,
    }
}

fn project_with(
    scores: &[OptionScore],
    coverage: &[OptionCoverage],
    has_measured_criteria: bool,
) -> ResultsProjection {
    let method_check = compare(
        method_ranking(ResultMethod::Wsm, scores, coverage),
        method_ranking(ResultMethod::Wpm, scores, coverage),
    );

    debug!(
        options = scores.len(),
        state = ?method_check.state,
        wsm_top = method_check.wsm.top_option_id.as_deref().unwrap_or("-"),
        wpm_top = method_check.wpm.top_option_id.as_deref().unwrap_or("-"),
        "projected decision results"
    );

    ResultsProjection {
        ranking_rows: method_check.wsm.rows.clone(),
        method_check,
        has_measured_criteria,
    }
}

/// Ranks every option under both methods and reports whether their top picks agree.
pub fn method_check(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    weights: &CriterionWeights,
    mode: RatingInputMode,
) -> MethodCheck {
    results_projection(options, criteria, matrix, weights, mode).method_check
}

/// The results view: WSM ranking rows plus the strict WPM cross-check.
pub fn results_projection(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
    weights: &CriterionWeights,
    mode: RatingInputMode,
) -> ResultsProjection {
    let resolver = DesirabilityResolver::new(options, criteria, matrix, mode);
    let normalized = normalize_weights(criteria, weights);
    let scores = score_with(&resolver, options, criteria, matrix, weights, &normalized);
    let coverage = coverage_with(&resolver, options, criteria, &normalized);
    let has_measured_criteria = criteria
        .iter()
        .any(|criterion| criterion.criterion_type() == CriterionType::NumericMeasured);

    project_with(&scores, &coverage, has_measured_criteria)
}
