pub mod envelope;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;

use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::{Value, json};

use crate::application::bootstrap::AppServices;

pub use envelope::Envelope;
pub use error::{ApiError, ApiResult};

/// Complete HTTP surface of the three APIs.
pub fn create_router(services: AppServices) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/game/api", routes::game::router())
        .nest("/trading/api", routes::trading::router())
        .nest("/shop/api", routes::shop::router())
        .layer(middleware::from_fn(logging::log_request))
        .with_state(services)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}
