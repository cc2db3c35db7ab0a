use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use sentiscope_core::{AlertId, AlertPatch, NewAlert};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_active_alerts).post(create_alert))
        .route("/:id", patch(update_alert))
}

pub async fn list_active_alerts(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.active_alerts().await {
        Ok(alerts) => {
            let alerts = alerts.iter().map(dto::alert_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "alerts": alerts }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_alert(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewAlert>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    match services.store.create_alert(body).await {
        Ok(alert) => {
            tracing::info!(alert_id = %alert.id, name = %alert.name, "alert created");
            (StatusCode::CREATED, Json(serde_json::json!({ "alert": dto::alert_to_json(&alert) })))
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_alert(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<AlertPatch>, JsonRejection>,
) -> axum::response::Response {
    let id: AlertId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid alert id"),
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    match services.store.update_alert(id, patch).await {
        Ok(Some(alert)) => {
            (StatusCode::OK, Json(serde_json::json!({ "alert": dto::alert_to_json(&alert) })))
                .into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "alert not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
