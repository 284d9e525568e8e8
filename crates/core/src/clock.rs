//! Civil time in a fixed, configured timezone.
//!
//! Timestamps end up in prompts and in the `/health` payload, so they are
//! always rendered with the zone abbreviation attached.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::{AppError, AppResult};

/// Default civil timezone.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kuala_Lumpur";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";
const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S %Z";

/// Wall clock pinned to a single timezone.
#[derive(Debug, Clone, Copy)]
pub struct CivilClock {
    tz: Tz,
}

impl CivilClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a clock from an IANA timezone name such as `"Europe/Paris"`.
    pub fn from_name(name: &str) -> AppResult<Self> {
        let tz = name
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("Unknown timezone '{}': {}", name, e)))?;
        Ok(Self::new(tz))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// Current time as `YYYY-MM-DD HH:MM:SS TZ`.
    pub fn timestamp(&self) -> String {
        format_timestamp(&self.now())
    }

    /// Current time as `HH:MM:SS TZ`.
    pub fn time_of_day(&self) -> String {
        format_time_of_day(&self.now())
    }
}

impl Default for CivilClock {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Kuala_Lumpur)
    }
}

pub fn format_timestamp(at: &DateTime<Tz>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_time_of_day(at: &DateTime<Tz>) -> String {
    at.format(TIME_OF_DAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};

    #[test]
    fn test_format_timestamp() {
        let at = chrono_tz::UTC
            .with_ymd_and_hms(2025, 3, 7, 9, 5, 1)
            .unwrap();
        assert_eq!(format_timestamp(&at), "2025-03-07 09:05:01 UTC");
        assert_eq!(format_time_of_day(&at), "09:05:01 UTC");
    }

    #[test]
    fn test_default_clock_is_utc_plus_eight() {
        let clock = CivilClock::default();
        let offset = clock.now().offset().fix().local_minus_utc();
        assert_eq!(offset, 8 * 3600);
    }

    #[test]
    fn test_from_name() {
        let clock = CivilClock::from_name("Europe/Paris").unwrap();
        assert_eq!(clock.timezone(), chrono_tz::Europe::Paris);

        let err = CivilClock::from_name("Mars/Olympus_Mons").unwrap_err();
        assert!(err.to_string().contains("Unknown timezone"));
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = CivilClock::from_name("UTC").unwrap().timestamp();
        // "YYYY-MM-DD HH:MM:SS UTC"
        assert_eq!(ts.len(), 23);
        assert!(ts.ends_with(" UTC"));
    }
}
