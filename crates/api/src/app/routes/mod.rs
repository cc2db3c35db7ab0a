use axum::{routing::get, Router};

pub mod alerts;
pub mod dashboard;
pub mod mentions;
pub mod sentiment;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/sentiment", sentiment::router())
        .nest("/dashboard", dashboard::router())
        .nest("/alerts", alerts::router())
        .nest("/mentions", mentions::router())
}
