use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use rankwise::config::DecisionConfig;
use rankwise::error::AppError;
use rankwise::workflows::decision::{
    decision_router, DecisionSnapshot, FillMissingReviewItem, RatingsMatrix,
};
use rankwise::workflows::import::RatingsCsvImporter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct RatingsImportRequest {
    #[serde(flatten)]
    pub(crate) snapshot: DecisionSnapshot,
    pub(crate) ratings_csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RatingsImportResponse {
    pub(crate) ratings: RatingsMatrix,
    pub(crate) review_items: Vec<FillMissingReviewItem>,
}

pub(crate) fn with_decision_routes(config: Arc<DecisionConfig>) -> axum::Router {
    decision_router(config)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/decisions/ratings/import",
            axum::routing::post(ratings_import_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn ratings_import_endpoint(
    Json(payload): Json<RatingsImportRequest>,
) -> Result<Json<RatingsImportResponse>, AppError> {
    let RatingsImportRequest {
        mut snapshot,
        ratings_csv,
    } = payload;
    snapshot.validate()?;

    let reader = Cursor::new(ratings_csv.into_bytes());
    let base = std::mem::take(&mut snapshot.ratings);
    snapshot.ratings =
        RatingsCsvImporter::from_reader(reader, &snapshot.options, &snapshot.criteria, base)?;

    Ok(Json(RatingsImportResponse {
        review_items: snapshot.review_items(),
        ratings: snapshot.ratings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::sample_snapshot;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn import_request(csv: &str) -> RatingsImportRequest {
        RatingsImportRequest {
            snapshot: sample_snapshot(),
            ratings_csv: csv.to_string(),
        }
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let response = readiness_endpoint(Extension(app_state(false)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = readiness_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_route_is_mounted_next_to_decision_routes() {
        let router = with_decision_routes(Arc::new(DecisionConfig::default()))
            .layer(Extension(app_state(true)));

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn import_endpoint_applies_csv_and_lists_remaining_blanks() {
        let Json(body) = ratings_import_endpoint(Json(import_request(
            "option,criterion,value\nduplex,commute,good\n",
        )))
        .await
        .expect("import succeeds");

        let cell = body
            .ratings
            .rating_cell("duplex", "commute")
            .expect("imported cell");
        assert_eq!(cell.numeric_value, Some(13.7));
        assert!(body.review_items.is_empty());
    }

    #[tokio::test]
    async fn import_endpoint_rejects_unknown_options() {
        let error = ratings_import_endpoint(Json(import_request(
            "option,criterion,value\ncastle,commute,good\n",
        )))
        .await
        .expect_err("unknown option");

        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
