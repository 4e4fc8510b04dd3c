use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::coverage::DecisionDiagnostics;
use super::domain::{RatingInputMode, RatingsMatrix};
use super::fill::FillMissingReviewItem;
use super::ranking::views::ResultsProjection;
use super::reconcile::CellEdit;
use super::snapshot::{DecisionSnapshot, SnapshotError};
use crate::config::DecisionConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    #[serde(flatten)]
    pub snapshot: DecisionSnapshot,
    #[serde(default)]
    pub rating_input_mode: Option<RatingInputMode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsResponse {
    pub generated_at: DateTime<Utc>,
    pub rating_input_mode: RatingInputMode,
    pub results: ResultsProjection,
    pub diagnostics: DecisionDiagnostics,
}

#[derive(Debug, Clone, Serialize)]
pub struct FillNeutralResponse {
    pub filled_count: usize,
    pub review_items: Vec<FillMissingReviewItem>,
    pub ratings: RatingsMatrix,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub ratings: RatingsMatrix,
    pub edit: CellEdit,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditResponse {
    pub ratings: RatingsMatrix,
}

/// Router exposing the scoring engine over HTTP. Nothing is persisted between calls.
pub fn decision_router(config: Arc<DecisionConfig>) -> Router {
    Router::new()
        .route("/api/v1/decisions/results", post(results_handler))
        .route(
            "/api/v1/decisions/ratings/fill-neutral",
            post(fill_neutral_handler),
        )
        .route("/api/v1/decisions/ratings/edit", post(edit_handler))
        .with_state(config)
}

fn invalid_snapshot(error: SnapshotError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) async fn results_handler(
    State(config): State<Arc<DecisionConfig>>,
    Json(request): Json<DecisionRequest>,
) -> Response {
    if let Err(error) = request.snapshot.validate() {
        return invalid_snapshot(error);
    }

    let mode = request
        .rating_input_mode
        .unwrap_or(config.rating_input_mode);
    let response = ResultsResponse {
        generated_at: Utc::now(),
        rating_input_mode: mode,
        results: request.snapshot.results(mode),
        diagnostics: request.snapshot.diagnostics(mode),
    };

    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn fill_neutral_handler(
    State(config): State<Arc<DecisionConfig>>,
    Json(request): Json<DecisionRequest>,
) -> Response {
    if let Err(error) = request.snapshot.validate() {
        return invalid_snapshot(error);
    }

    let mode = request
        .rating_input_mode
        .unwrap_or(config.rating_input_mode);
    let mut snapshot = request.snapshot;
    let review_items = snapshot.review_items();
    let filled_count = snapshot.fill_missing_with_neutral(mode);
    debug!(filled_count, "filled blank ratings with neutral value");

    let response = FillNeutralResponse {
        filled_count,
        review_items,
        ratings: snapshot.ratings,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn edit_handler(Json(request): Json<EditRequest>) -> Response {
    let mut ratings = request.ratings;
    ratings.apply_edit(&request.edit);

    (StatusCode::OK, Json(EditResponse { ratings })).into_response()
}
