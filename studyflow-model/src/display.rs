//! Display formatting preferences for dates and times.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Clock format preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self::TwelveHour
    }
}

/// Date ordering preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::MonthDayYear
    }
}

/// Formats a date for display according to the user's preference.
#[must_use]
pub fn format_date_display(date: NaiveDate, format: DateFormat) -> String {
    match format {
        DateFormat::MonthDayYear => date.format("%m/%d/%Y").to_string(),
        DateFormat::DayMonthYear => date.format("%d/%m/%Y").to_string(),
    }
}

/// Formats a time for display according to the user's preference.
#[must_use]
pub fn format_time_display(time: NaiveTime, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwelveHour => time.format("%I:%M %p").to_string(),
        TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
    }
}
