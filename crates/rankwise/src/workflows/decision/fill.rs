//! The explicit "fill missing with neutral" action and the review list that precedes it.

use super::constants::NEUTRAL_FILL_DESIRABILITY;
use super::domain::{
    Criterion, CriterionType, DecisionOption, Rating120Cell, RatingCell, RatingInputMode,
    RatingsMatrix, SevenLevel,
};
use serde::Serialize;

/// A blank rating cell the user is asked to review before neutral fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillMissingReviewItem {
    pub option_id: String,
    pub option_title: String,
    pub criterion_id: String,
    pub criterion_title: String,
    pub criterion_type: CriterionType,
}

fn rating_cell_is_blank(matrix: &RatingsMatrix, option_id: &str, criterion_id: &str) -> bool {
    matrix
        .rating_cell(option_id, criterion_id)
        .map_or(true, Rating120Cell::is_missing)
}

/// Blank rating_1_20 cells in display order. Measured criteria never appear here.
pub fn missing_rating_review_items(
    options: &[DecisionOption],
    criteria: &[Criterion],
    matrix: &RatingsMatrix,
) -> Vec<FillMissingReviewItem> {
    options
        .iter()
        .flat_map(|option| {
            criteria
                .iter()
                .filter(|criterion| criterion.criterion_type() == CriterionType::Rating120)
                .filter(move |criterion| rating_cell_is_blank(matrix, &option.id, &criterion.id))
                .map(move |criterion| FillMissingReviewItem {
                    option_id: option.id.clone(),
                    option_title: option.title.clone(),
                    criterion_id: criterion.id.clone(),
                    criterion_title: criterion.title.clone(),
                    criterion_type: criterion.criterion_type(),
                })
        })
        .collect()
}

impl RatingsMatrix {
    /// Writes the neutral rating into every blank rating_1_20 cell and returns how many
    /// cells were filled. Measured cells are left alone.
    pub fn fill_missing_with_neutral(
        &mut self,
        options: &[DecisionOption],
        criteria: &[Criterion],
        mode: RatingInputMode,
    ) -> usize {
        let items = missing_rating_review_items(options, criteria, self);

        for item in &items {
            let cell = Rating120Cell {
                numeric_value: Some(NEUTRAL_FILL_DESIRABILITY),
                seven_level_value: Some(SevenLevel::nearest(NEUTRAL_FILL_DESIRABILITY)),
                last_edited_mode: Some(mode),
            };
            self.insert(&item.option_id, &item.criterion_id, RatingCell::Rating120(cell));
        }

        items.len()
    }
}
