//! Client for the UFP portal calendar endpoint.
//!
//! The portal publishes each calendar as a JSON array at
//! `<base>/Calendario/Eventos/<id>.txt`, with local date-times such as
//! `2024-01-10T09:00` that carry no timezone. They are read as UTC.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CalendarError, CalendarResult};
use crate::event::Event;

pub const DEFAULT_BASE_URL: &str = "https://portal.ufp.pt";

const CALENDAR_PATH: &str = "/Calendario/Eventos";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce the events of a calendar by ID.
pub trait FetchCalendar: Send + Sync {
    fn fetch(&self, calendar_id: &str) -> impl Future<Output = CalendarResult<Vec<Event>>> + Send;
}

/// One record of the portal's JSON response.
#[derive(Debug, Deserialize)]
struct UpstreamEvent {
    id: i64,
    start: String,
    end: String,
    /// Missing or null titles are served as empty
    #[serde(default)]
    title: Option<String>,
}

impl UpstreamEvent {
    fn into_event(self, index: usize) -> CalendarResult<Event> {
        let start = parse_date_time(&self.start, "start", index)?;
        let end = parse_date_time(&self.end, "end", index)?;

        Ok(Event {
            id: self.id,
            start,
            end,
            title: self.title.unwrap_or_default(),
        })
    }
}

/// Parse a fixed-width `YYYY-MM-DDTHH:MM` value.
///
/// chrono accepts unpadded fields, signs and stray spaces for this format, so
/// the parsed value must also format back to exactly the input.
fn parse_date_time(value: &str, field: &'static str, index: usize) -> CalendarResult<DateTime<Utc>> {
    let error = |source| CalendarError::TimeParse {
        index,
        field,
        value: value.to_string(),
        source,
    };

    let dt = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map_err(|e| error(Some(e)))?;
    if dt.format(DATE_TIME_FORMAT).to_string() != value {
        return Err(error(None));
    }

    Ok(dt.and_utc())
}

/// Decode a portal response body into events, preserving order.
///
/// Any bad record fails the whole body.
pub fn parse_events(body: &[u8]) -> CalendarResult<Vec<Event>> {
    let records: Vec<UpstreamEvent> = serde_json::from_slice(body).map_err(CalendarError::Decode)?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_event(index))
        .collect()
}

/// HTTP client for the portal.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> CalendarResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(CalendarError::Upstream)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of a calendar. The ID is inserted as-is, without any escaping.
    pub fn calendar_url(&self, calendar_id: &str) -> String {
        format!("{}{}/{}.txt", self.base_url, CALENDAR_PATH, calendar_id)
    }
}

impl FetchCalendar for UpstreamClient {
    async fn fetch(&self, calendar_id: &str) -> CalendarResult<Vec<Event>> {
        let url = self.calendar_url(calendar_id);
        debug!(calendar_id, %url, "fetching calendar from upstream");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(CalendarError::Upstream)?;

        let status = response.status();
        if status != StatusCode::OK {
            // Drain the body so the connection goes back to the pool
            let _ = response.bytes().await;
            return Err(CalendarError::UpstreamStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(CalendarError::Upstream)?;
        parse_events(&body)
    }
}
