use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/trends", get(trends))
}

const TEXTS_ERROR: &str = "Missing or invalid 'texts' array in request body";

/// Pull `texts` out of the body; every element must be a string.
fn texts_from_body(body: &serde_json::Value) -> Option<Vec<&str>> {
    body.get("texts")?
        .as_array()?
        .iter()
        .map(serde_json::Value::as_str)
        .collect()
}

pub async fn analyze(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let Some(texts) = texts_from_body(&body) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_texts", TEXTS_ERROR);
    };

    let results = services
        .scorer
        .score_batch(&texts)
        .await
        .iter()
        .map(dto::judgment_to_json)
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(serde_json::json!({ "results": results }))).into_response()
}

pub async fn trends(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::TrendsQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::query_rejection_to_response(e),
    };

    match services.store.trends_since(query.hours(), query.platform()).await {
        Ok(points) => {
            let trends = points.iter().map(dto::trend_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "trends": trends }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
