//! Liveness endpoint

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}

/// GET /ping
async fn ping() -> &'static str {
    "OK"
}
