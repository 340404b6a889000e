//! Calendar event types.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A single event from a portal calendar.
///
/// Start and end are passed through as published; `start <= end` is not
/// checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Portal-assigned identifier, unique within one calendar
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
}

/// Immutable, cheaply cloned snapshot of a calendar's events, in upstream order.
pub type EventSet = Arc<[Event]>;
