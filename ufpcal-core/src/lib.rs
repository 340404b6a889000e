//! Core of the UFP calendar bridge.
//!
//! This crate turns the JSON calendars published by the UFP portal into
//! RFC 5545 iCalendar feeds:
//! - `upstream` fetches and parses the portal's event lists
//! - `cache` keeps fetched calendars around for a few hours
//! - `service` ties the two together behind a single lookup
//! - `ics` renders events as a VCALENDAR document

pub mod cache;
pub mod clock;
pub mod error;
pub mod event;
pub mod ics;
pub mod service;
pub mod upstream;

pub use cache::TimedCache;
pub use clock::{Clock, SystemClock};
pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventSet};
pub use service::CalendarService;
pub use upstream::{FetchCalendar, UpstreamClient};
