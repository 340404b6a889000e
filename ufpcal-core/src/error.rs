//! Error types for calendar fetching.

use thiserror::Error;

/// Errors that can occur while producing a calendar.
///
/// Every variant is terminal for the request that raised it; nothing is
/// retried internally.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("request failed with status code {0}")]
    UpstreamStatus(u16),

    #[error("invalid calendar response: {0}")]
    Decode(#[source] serde_json::Error),

    /// `source` is `None` when chrono parsed the value but it was not in the
    /// fixed-width layout.
    #[error("invalid {field} date-time {value:?} in event #{index}, expected YYYY-MM-DDTHH:MM")]
    TimeParse {
        index: usize,
        field: &'static str,
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
