//! ICS generation.
//!
//! This module renders events as an RFC 5545 iCalendar document.

mod generate;
mod writer;

pub use generate::{CALENDAR_NAME, PRODID, generate_ics};
