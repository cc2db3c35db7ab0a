use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use sentiscope_core::NewMention;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_mentions).post(create_mention))
}

/// `GET /api/mentions?limit&platform&region`, newest first.
///
/// `limit` (default 100) caps the unfiltered list and the platform and region
/// filters alike.
pub async fn list_mentions(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::MentionsQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::query_rejection_to_response(e),
    };
    let limit = query.limit();

    // Platform wins when both filters are given.
    let found = match (query.platform(), query.region()) {
        (Some(platform), _) => services.store.mentions_by_platform(platform, limit).await,
        (None, Some(region)) => services.store.mentions_by_region(region, limit).await,
        (None, None) => services.store.list_mentions(limit).await,
    };

    match found {
        Ok(mentions) => {
            let mentions = mentions.iter().map(dto::mention_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "mentions": mentions }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_mention(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewMention>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    match services.ingest_mention(body).await {
        Ok(mention) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "mention": dto::mention_to_json(&mention) })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
