pub mod calendar;
pub mod ping;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::state::AppState;

/// All routes, with state attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(calendar::router())
        .merge(ping::router())
        .with_state(state)
}

/// Convert errors to plain-text 500 responses
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
