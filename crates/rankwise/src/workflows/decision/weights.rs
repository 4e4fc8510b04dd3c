use super::domain::{Criterion, CriterionWeights};
use serde::Serialize;
use std::collections::BTreeMap;

impl CriterionWeights {
    /// Assigns a weight. `None`, zero, and negative values unassign the criterion.
    pub fn set(&mut self, criterion_id: &str, weight: Option<i64>) {
        match weight.and_then(|w| u32::try_from(w).ok()).filter(|w| *w >= 1) {
            Some(weight) => {
                self.entries_mut().insert(criterion_id.to_string(), weight);
            }
            None => {
                self.entries_mut().remove(criterion_id);
            }
        }
    }

    /// Sum of assigned weights over the given criteria.
    pub fn total_for(&self, criteria: &[Criterion]) -> u64 {
        criteria
            .iter()
            .filter_map(|criterion| self.get(&criterion.id))
            .map(u64::from)
            .sum()
    }
}

/// Proportion of the total weight held by each criterion, keyed by criterion id.
pub fn normalize_weights(criteria: &[Criterion], weights: &CriterionWeights) -> BTreeMap<String, f64> {
    let total = weights.total_for(criteria);

    criteria
        .iter()
        .map(|criterion| {
            let proportion = match (weights.get(&criterion.id), total) {
                (Some(weight), total) if total > 0 => f64::from(weight) / total as f64,
                _ => 0.0,
            };
            (criterion.id.clone(), proportion)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightAssignmentStatus {
    pub total_criteria: usize,
    pub assigned_count: usize,
    pub missing_criterion_ids: Vec<String>,
    pub is_complete: bool,
}

/// Gate used before results unlock: at least one criterion, every criterion weighted.
pub fn weight_assignment_status(
    criteria: &[Criterion],
    weights: &CriterionWeights,
) -> WeightAssignmentStatus {
    let missing_criterion_ids: Vec<String> = criteria
        .iter()
        .filter(|criterion| weights.get(&criterion.id).is_none())
        .map(|criterion| criterion.id.clone())
        .collect();

    let total_criteria = criteria.len();
    WeightAssignmentStatus {
        total_criteria,
        assigned_count: total_criteria - missing_criterion_ids.len(),
        is_complete: total_criteria > 0 && missing_criterion_ids.is_empty(),
        missing_criterion_ids,
    }
}

pub fn weights_complete(criteria: &[Criterion], weights: &CriterionWeights) -> bool {
    weight_assignment_status(criteria, weights).is_complete
}
