//! Wall-clock date/time anchoring.
//!
//! The organizer stores instants without a timezone: a due date entered
//! as `2024-03-10` means end of that day on the user's wall clock,
//! wherever they are. [`chrono::NaiveDateTime`] captures exactly that,
//! so no timezone conversion happens anywhere in the engine.
//!
//! Anchoring rules:
//! - start dates anchor to start of day (00:00:00.000)
//! - due dates without a time anchor to end of day (23:59:59.999)
//! - a due date with a time anchors to exactly that time

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Instant format used inside remote documents.
const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Anchors a start date to the start of its day.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Anchors a due date without a time to the end of its day.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// Combines a due date with an explicit due time.
#[must_use]
pub fn at_time(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Serializes an instant for a remote document field.
#[must_use]
pub fn instant_to_string(instant: NaiveDateTime) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// Parses a remote document instant; returns `None` on malformed input
/// (flattening is tolerant, never fatal).
#[must_use]
pub fn instant_from_str(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, INSTANT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Parses a plain `YYYY-MM-DD` date string.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parses a plain `HH:MM` time string.
#[must_use]
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}
