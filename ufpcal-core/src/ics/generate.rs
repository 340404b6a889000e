//! VCALENDAR generation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::writer::IcsWriter;
use crate::event::Event;

pub const PRODID: &str = "-//UFP//NONSGML Event Calendar//PT";
pub const CALENDAR_NAME: &str = "UFP";

/// Render events as a single VCALENDAR document.
///
/// Every VEVENT shares the same DTSTAMP (`now`) and gets a fresh random UID,
/// so encoding the same events twice yields different UIDs.
pub fn generate_ics(events: &[Event], now: DateTime<Utc>) -> String {
    let mut ics = IcsWriter::new();

    ics.begin("VCALENDAR");
    ics.property("CALSCAL", "GREGORIAN");
    ics.property("PRODID", PRODID);
    ics.text("NAME", CALENDAR_NAME);
    ics.text("X-WR-CALNAME", CALENDAR_NAME);
    ics.property("X-WR-TIMEZONE", "UTC");
    ics.property("VERSION", "2.0");

    for event in events {
        ics.begin("VEVENT");
        ics.date_time("DTEND", &event.end);
        ics.date_time("DTSTART", &event.start);
        ics.date_time("DTSTAMP", &now);
        ics.text("SUMMARY", &event.title);
        ics.property("UID", &Uuid::new_v4().to_string());
        ics.end("VEVENT");
    }

    ics.end("VCALENDAR");
    ics.finish()
}
