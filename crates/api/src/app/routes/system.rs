use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::app::services::AppServices;

/// Liveness plus a coarse view of the backing services.
///
/// Always answers 200; a failed store ping shows up as `degraded`.
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let database = match services.store.ping().await {
        Ok(()) if services.store.backend() == "in_memory" => "in_memory",
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "health check: store ping failed");
            "unavailable"
        }
    };
    let status = if database == "unavailable" { "degraded" } else { "operational" };
    let ai = if services.scorer.has_oracle() { "configured" } else { "fallback" };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": status,
            "timestamp": Utc::now(),
            "services": {
                "database": database,
                "ai": ai,
            },
        })),
    )
        .into_response()
}
