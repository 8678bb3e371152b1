//! Time formatting and range helpers.
//!
//! Layouts are chrono strftime strings.

use chrono::{DateTime, Local, TimeDelta, TimeZone};
use serde::Deserialize;
use std::fmt::Write;

use crate::UtilError;

/// `2006-01-02 15:04:05`
pub const LAYOUT_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// `2006-01-02`
pub const LAYOUT_DATE: &str = "%Y-%m-%d";

/// Formats used for "now" strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeLayouts {
    pub datetime: String,
    pub date: String,
}

impl Default for TimeLayouts {
    fn default() -> Self {
        Self {
            datetime: LAYOUT_DATETIME.to_string(),
            date: LAYOUT_DATE.to_string(),
        }
    }
}

impl TimeLayouts {
    pub fn datetime_now(&self) -> Result<String, UtilError> {
        datetime_layout_now(&self.datetime)
    }

    pub fn date_now(&self) -> Result<String, UtilError> {
        datetime_layout_now(&self.date)
    }
}

/// Current local time as `YYYY-MM-DD HH:MM:SS`.
pub fn datetime_now() -> String {
    Local::now().format(LAYOUT_DATETIME).to_string()
}

/// Current local date as `YYYY-MM-DD`.
pub fn date_now() -> String {
    Local::now().format(LAYOUT_DATE).to_string()
}

/// Current local time in a caller-supplied layout.
pub fn datetime_layout_now(layout: &str) -> Result<String, UtilError> {
    format_layout(&Local::now(), layout)
}

/// Formats `t` with `layout`, rejecting layouts chrono cannot render.
pub fn format_layout<Tz>(t: &DateTime<Tz>, layout: &str) -> Result<String, UtilError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", t.format(layout))
        .map_err(|_| UtilError::InvalidLayout(layout.to_string()))?;
    Ok(out)
}

/// Adds `days` whole 24 hour periods to `t`.
///
/// Returns `None` if the result is out of chrono's range.
pub fn add_day_increment_time<Tz: TimeZone>(t: DateTime<Tz>, days: i64) -> Option<DateTime<Tz>> {
    let delta = TimeDelta::try_days(days)?;
    t.checked_add_signed(delta)
}

/// Inclusive range check.
///
/// When `start` is after `end` the range wraps: `check` matches if it is at or
/// after `start`, or at or before `end`. When they are equal only that exact
/// instant matches.
pub fn time_between<Tz: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz>, check: DateTime<Tz>) -> bool {
    if start < end {
        return check >= start && check <= end;
    }
    if start == end {
        return check == start;
    }
    check >= start || check <= end
}
