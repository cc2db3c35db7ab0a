use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

const TOP_KEYWORDS: usize = 10;
const RECENT_MENTIONS: usize = 50;

pub fn router() -> Router {
    Router::new().route("/summary", get(summary))
}

pub async fn summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let store = &services.store;
    let (sentiment, keywords, regional, recent) = match tokio::try_join!(
        store.sentiment_summary(),
        store.top_keywords(TOP_KEYWORDS),
        store.regional_sentiment(),
        store.list_mentions(RECENT_MENTIONS),
    ) {
        Ok(parts) => parts,
        Err(e) => return errors::store_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "sentiment": dto::summary_to_json(&sentiment),
            "keywords": keywords.iter().map(dto::keyword_to_json).collect::<Vec<_>>(),
            "regional": regional.iter().map(dto::regional_to_json).collect::<Vec<_>>(),
            "recentMentions": recent.iter().map(dto::mention_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}
