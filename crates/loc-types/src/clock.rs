use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::error::TypeError;

/// Offset used by the original deployment (UTC+05:30).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

const STATUS_FORMAT: &str = "%b %-d, %Y at %-I:%M %p";
const COMPACT_FORMAT: &str = "%Y%m%d%H%M%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats audit timestamps in an explicit UTC offset.
///
/// The clock holds no notion of "now": callers pass the instant, normally
/// the transaction timestamp, so every endorsing peer renders the same
/// string for the same transaction.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StatusClock {
    offset_minutes: i32,
}

impl StatusClock {
    /// Create a clock for the given offset east of UTC, in minutes.
    pub fn new(offset_minutes: i32) -> Result<Self, TypeError> {
        if offset_minutes.abs() >= 24 * 60 {
            return Err(TypeError::InvalidOffset(offset_minutes));
        }
        Ok(Self { offset_minutes })
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    fn offset(&self) -> FixedOffset {
        // Range is checked in `new`.
        FixedOffset::east_opt(self.offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// The instant in this clock's offset.
    pub fn local(&self, at: &DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset())
    }

    /// Human-readable form used in status log entries: `Apr 11, 2022 at 11:46 AM`.
    pub fn status_stamp(&self, at: &DateTime<Utc>) -> String {
        self.local(at).format(STATUS_FORMAT).to_string()
    }

    /// Compact sortable form: `20220411114600`.
    pub fn compact_stamp(&self, at: &DateTime<Utc>) -> String {
        self.local(at).format(COMPACT_FORMAT).to_string()
    }

    /// Calendar date: `2022-04-11`.
    pub fn date(&self, at: &DateTime<Utc>) -> String {
        self.local(at).format(DATE_FORMAT).to_string()
    }

    /// Date and time: `2022-04-11 11:46:00`.
    pub fn date_time(&self, at: &DateTime<Utc>) -> String {
        self.local(at).format(DATE_TIME_FORMAT).to_string()
    }
}

impl Default for StatusClock {
    fn default() -> Self {
        Self {
            offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl fmt::Debug for StatusClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusClock({})", self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 4, 11, 6, 16, 0).unwrap()
    }

    #[test]
    fn status_stamp_in_default_offset() {
        let clock = StatusClock::default();
        assert_eq!(clock.status_stamp(&instant()), "Apr 11, 2022 at 11:46 AM");
    }

    #[test]
    fn status_stamp_in_utc() {
        let clock = StatusClock::new(0).unwrap();
        assert_eq!(clock.status_stamp(&instant()), "Apr 11, 2022 at 6:16 AM");
    }

    #[test]
    fn afternoon_and_single_digit_day() {
        let clock = StatusClock::new(0).unwrap();
        let at = Utc.with_ymd_and_hms(2022, 1, 5, 15, 4, 5).unwrap();
        assert_eq!(clock.status_stamp(&at), "Jan 5, 2022 at 3:04 PM");
    }

    #[test]
    fn negative_offset_crosses_midnight() {
        let clock = StatusClock::new(-300).unwrap();
        let at = Utc.with_ymd_and_hms(2022, 1, 5, 2, 0, 0).unwrap();
        assert_eq!(clock.date(&at), "2022-01-04");
    }

    #[test]
    fn auxiliary_formats() {
        let clock = StatusClock::default();
        assert_eq!(clock.compact_stamp(&instant()), "20220411114600");
        assert_eq!(clock.date(&instant()), "2022-04-11");
        assert_eq!(clock.date_time(&instant()), "2022-04-11 11:46:00");
    }

    #[test]
    fn rejects_out_of_range_offset() {
        assert_eq!(
            StatusClock::new(24 * 60),
            Err(TypeError::InvalidOffset(1440))
        );
        assert!(StatusClock::new(-(23 * 60 + 59)).is_ok());
    }
}
