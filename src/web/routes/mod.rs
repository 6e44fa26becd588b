//! Contains all the routes that this application can handle.

mod subscribe;
mod subscribers;

pub use subscribe::subscribe;
pub use subscribers::list_subscribers;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::AppState;

/// Static liveness probe. Doesn't touch the database.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/subscribe", post(subscribe))
        .route("/subscribers", get(list_subscribers))
        .with_state(app_state)
        .route("/health", get(health_check))
}
