//! iCalendar feed endpoint

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use ufpcal_core::ics::generate_ics;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/calendar/{id}", get(calendar))
}

/// GET /calendar/{id} - Render a portal calendar as ICS
async fn calendar(
    State(state): State<AppState>,
    Path(calendar_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.calendars.get_calendar(&calendar_id).await?;
    let body = generate_ics(&events, Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar"),
            (header::HeaderName::from_static("charset"), "utf-8"),
            (header::CONTENT_DISPOSITION, "inline"),
            (header::HeaderName::from_static("filename"), "calendar.ics"),
        ],
        body,
    ))
}
