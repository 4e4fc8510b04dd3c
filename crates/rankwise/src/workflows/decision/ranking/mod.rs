//! Ordering, shared ranks, and the WSM/WPM agreement check.

mod method_check;
pub mod views;

pub use method_check::{method_check, results_projection};

use super::constants::{MISSING_SCORE_LABEL, SCORE_LABEL_PRECISION, TIE_EPSILON};
use super::coverage::{CoverageSeverity, OptionCoverage};
use super::scoring::OptionScore;
use std::cmp::Ordering;
use std::collections::HashMap;
use views::{RankingRow, ResultMethod};

pub fn is_tie(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIE_EPSILON
}

pub fn score_label(score: Option<f64>) -> String {
    match score {
        Some(value) => format!("{:.*}", SCORE_LABEL_PRECISION, value),
        None => MISSING_SCORE_LABEL.to_string(),
    }
}

fn by_display_order(a: &RankingRow, b: &RankingRow) -> Ordering {
    a.option_order
        .cmp(&b.option_order)
        .then_with(|| a.option_id.cmp(&b.option_id))
}

fn by_score(a: &RankingRow, b: &RankingRow) -> Ordering {
    match (a.score, b.score) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| by_display_order(a, b))
}

fn tied(a: &RankingRow, b: &RankingRow) -> bool {
    matches!((a.score, b.score), (Some(left), Some(right)) if is_tie(left, right))
}

/// Sorts rows by descending score, unscored rows last.
///
/// A group starts at its highest score and takes every following row within the tie
/// epsilon of that score. Each group is ordered by option order then id, so the result
/// does not depend on the input permutation and never lifts a row above a higher score
/// it is not tied with.
pub fn sort_rows(rows: &mut [RankingRow]) {
    rows.sort_by(by_score);

    let mut start = 0;
    while start < rows.len() {
        let mut end = start + 1;
        while end < rows.len() && tied(&rows[start], &rows[end]) {
            end += 1;
        }
        rows[start..end].sort_by(by_display_order);
        start = end;
    }
}

/// Assigns competition ranks (1, 1, 3) to rows ordered by [`sort_rows`]; unscored rows
/// get none.
pub fn assign_shared_ranks(rows: &mut [RankingRow]) {
    let mut current_rank = 1;
    let mut group_top: Option<f64> = None;

    for index in 0..rows.len() {
        let Some(score) = rows[index].score else {
            rows[index].rank = None;
            group_top = None;
            continue;
        };

        match group_top {
            Some(top) if is_tie(top, score) => group_top = Some(top.max(score)),
            _ => {
                current_rank = index + 1;
                group_top = Some(score);
            }
        }
        rows[index].rank = Some(current_rank);
    }
}

pub fn rank_rows(
    method: ResultMethod,
    scores: &[OptionScore],
    coverage: &[OptionCoverage],
) -> Vec<RankingRow> {
    let coverage_by_option: HashMap<&str, &OptionCoverage> = coverage
        .iter()
        .map(|entry| (entry.option_id.as_str(), entry))
        .collect();

    let mut rows: Vec<RankingRow> = scores
        .iter()
        .map(|entry| {
            let score = match method {
                ResultMethod::Wsm => entry.wsm_score,
                ResultMethod::Wpm => entry.wpm_score,
            };
            let coverage = coverage_by_option.get(entry.option_id.as_str());

            RankingRow {
                option_id: entry.option_id.clone(),
                option_title: entry.option_title.clone(),
                option_order: entry.option_order,
                rank: None,
                score,
                score_label: score_label(score),
                method,
                coverage_percent: coverage.map_or(0, |c| c.coverage_percent),
                coverage_severity: coverage
                    .map_or(CoverageSeverity::StrongWarning, |c| c.severity),
                is_complete: entry.missing_criterion_ids.is_empty(),
                missing_criterion_ids: entry.missing_criterion_ids.clone(),
                contributions: entry.contributions.clone(),
            }
        })
        .collect();

    sort_rows(&mut rows);
    assign_shared_ranks(&mut rows);
    rows
}

/// Id of the first row holding rank 1, if any option is scored.
pub fn top_ranked_option_id(rows: &[RankingRow]) -> Option<&str> {
    rows.iter()
        .find(|row| row.rank == Some(1))
        .map(|row| row.option_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(option_id: &str, order: u32, score: Option<f64>) -> RankingRow {
        RankingRow {
            option_id: option_id.to_string(),
            option_title: option_id.to_uppercase(),
            option_order: order,
            rank: None,
            score,
            score_label: score_label(score),
            method: ResultMethod::Wsm,
            coverage_percent: 100,
            coverage_severity: CoverageSeverity::Ok,
            is_complete: score.is_some(),
            missing_criterion_ids: Vec::new(),
            contributions: Vec::new(),
        }
    }

    fn ranked(mut rows: Vec<RankingRow>) -> Vec<(String, Option<usize>)> {
        sort_rows(&mut rows);
        assign_shared_ranks(&mut rows);
        rows.into_iter().map(|row| (row.option_id, row.rank)).collect()
    }

    #[test]
    fn exact_ties_share_rank_and_next_rank_skips() {
        let result = ranked(vec![
            row("c", 2, Some(0.5)),
            row("a", 0, Some(0.75)),
            row("b", 1, Some(0.75)),
        ]);
        assert_eq!(
            result,
            vec![
                ("a".to_string(), Some(1)),
                ("b".to_string(), Some(1)),
                ("c".to_string(), Some(3)),
            ]
        );
    }

    #[test]
    fn differences_above_epsilon_are_not_ties() {
        let result = ranked(vec![row("x", 0, Some(0.7500003)), row("y", 1, Some(0.7500004))]);
        assert_eq!(
            result,
            vec![("y".to_string(), Some(1)), ("x".to_string(), Some(2))]
        );
    }

    #[test]
    fn near_ties_within_epsilon_are_ordered_by_display_order() {
        let result = ranked(vec![
            row("late", 5, Some(0.6 + 5e-10)),
            row("early", 1, Some(0.6)),
        ]);
        assert_eq!(
            result,
            vec![("early".to_string(), Some(1)), ("late".to_string(), Some(1))]
        );
    }

    #[test]
    fn chained_near_ties_group_from_the_highest_score() {
        let result = ranked(vec![
            row("a", 0, Some(0.0)),
            row("b", 2, Some(8e-10)),
            row("c", 1, Some(1.6e-9)),
        ]);
        assert_eq!(
            result,
            vec![
                ("c".to_string(), Some(1)),
                ("b".to_string(), Some(1)),
                ("a".to_string(), Some(3)),
            ]
        );
    }

    #[test]
    fn reordered_group_keeps_the_lower_neighbour_out() {
        let result = ranked(vec![
            row("a", 0, Some(0.0)),
            row("b", 1, Some(8e-10)),
            row("c", 2, Some(1.6e-9)),
        ]);
        assert_eq!(
            result,
            vec![
                ("b".to_string(), Some(1)),
                ("c".to_string(), Some(1)),
                ("a".to_string(), Some(3)),
            ]
        );
    }

    #[test]
    fn unscored_rows_sort_last_by_order_then_id() {
        let result = ranked(vec![
            row("z", 0, None),
            row("m", 3, Some(0.1)),
            row("b", 1, None),
            row("a", 1, None),
        ]);
        assert_eq!(
            result,
            vec![
                ("m".to_string(), Some(1)),
                ("z".to_string(), None),
                ("a".to_string(), None),
                ("b".to_string(), None),
            ]
        );
    }

    #[test]
    fn score_labels_use_three_decimals() {
        assert_eq!(score_label(Some(0.5)), "0.500");
        assert_eq!(score_label(Some(1.0)), "1.000");
        assert_eq!(score_label(None), "--");
    }
}
