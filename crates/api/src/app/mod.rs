//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage and scorer wiring, plus the mention ingestion flow
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use sentiscope_infra::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(router(Arc::new(services)))
}

/// Router over already-wired services.
pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .nest("/api", routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
