use axum::response::Response;
use serde_json::Value;

use crate::workflows::decision::domain::{
    Criterion, CriterionWeights, DecisionOption, RatingsMatrix, RawDirection, SevenLevel,
};
use crate::workflows::decision::snapshot::DecisionSnapshot;

pub(super) fn option(id: &str, order: u32) -> DecisionOption {
    DecisionOption::new(id, id.to_uppercase(), order)
}

/// Three apartments compared on comfort (rated), rent (lower is better), and size.
pub(super) fn apartment_snapshot() -> DecisionSnapshot {
    let options = vec![option("loft", 0), option("studio", 1), option("duplex", 2)];
    let criteria = vec![
        Criterion::rating("comfort", "Comfort", 0),
        Criterion::measured("rent", "Monthly rent", 1, RawDirection::LowerBetter, Some("USD")),
        Criterion::measured("size", "Floor area", 2, RawDirection::HigherBetter, Some("m2")),
    ];

    let mut ratings = RatingsMatrix::new();
    ratings.set_rating_numeric("loft", "comfort", Some(16.0));
    ratings.set_rating_seven_level("studio", "comfort", Some(SevenLevel::Poor));
    ratings.set_rating_numeric("duplex", "comfort", Some(12.0));
    ratings.set_measured_raw("loft", "rent", Some(1800.0));
    ratings.set_measured_raw("studio", "rent", Some(1100.0));
    ratings.set_measured_raw("duplex", "rent", Some(1500.0));
    ratings.set_measured_raw("loft", "size", Some(70.0));
    ratings.set_measured_raw("studio", "size", Some(32.0));

    let weights: CriterionWeights = [("comfort", 3), ("rent", 2), ("size", 1)]
        .into_iter()
        .collect();

    DecisionSnapshot {
        options,
        criteria,
        ratings,
        weights,
    }
}

/// Two options, one rating criterion: A rated 20, B rated 1.
pub(super) fn extremes_snapshot() -> DecisionSnapshot {
    let mut ratings = RatingsMatrix::new();
    ratings.set_rating_numeric("a", "quality", Some(20.0));
    ratings.set_rating_numeric("b", "quality", Some(1.0));

    DecisionSnapshot {
        options: vec![option("a", 0), option("b", 1)],
        criteria: vec![Criterion::rating("quality", "Quality", 0)],
        ratings,
        weights: [("quality", 1)].into_iter().collect(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
