//! Time-of-day rules: business hours and happy hour.
//!
//! Windows are half-open `[start, end)` over the local hour of an injected
//! instant. Windows that wrap past midnight are not supported; a window whose
//! start is not before its end never opens.

use crate::config::HoursConfig;
use chrono::{DateTime, FixedOffset, Local, TimeZone, Timelike};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }

    pub fn contains<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.contains_hour(now.hour())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub open: HourWindow,
    pub happy_hour: HourWindow,
    pub happy_hour_discount_percent: Option<u32>,
}

impl BusinessHours {
    pub fn is_business_hours<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.open.contains(now)
    }

    pub fn is_happy_hour<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.happy_hour.contains(now)
    }
}

impl From<&HoursConfig> for BusinessHours {
    fn from(cfg: &HoursConfig) -> Self {
        Self {
            open: HourWindow::new(cfg.opening_hour, cfg.closing_hour),
            happy_hour: HourWindow::new(cfg.happy_hour_start, cfg.happy_hour_end),
            happy_hour_discount_percent: cfg.happy_hour_discount_percent,
        }
    }
}

/// Local instant at `hour:minute` on a fixed day, for tests and fixtures.
pub fn local_time(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .and_then(|tz| tz.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).single())
        .unwrap_or_else(|| Local::now().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_hours() -> BusinessHours {
        BusinessHours::from(&HoursConfig::default())
    }

    #[test]
    fn test_window_is_half_open() {
        let window = HourWindow::new(11, 13);
        assert!(!window.contains_hour(10));
        assert!(window.contains_hour(11));
        assert!(window.contains_hour(12));
        assert!(!window.contains_hour(13));
    }

    #[test]
    fn test_inverted_window_never_opens() {
        let window = HourWindow::new(22, 2);
        assert!((0..24).all(|h| !window.contains_hour(h)));
        let empty = HourWindow::new(9, 9);
        assert!((0..24).all(|h| !empty.contains_hour(h)));
    }

    #[test]
    fn test_business_hours_defaults() {
        let hours = default_hours();
        assert!(!hours.is_business_hours(&local_time(7, 59)));
        assert!(hours.is_business_hours(&local_time(8, 0)));
        assert!(hours.is_business_hours(&local_time(14, 59)));
        assert!(!hours.is_business_hours(&local_time(15, 0)));
    }

    #[test]
    fn test_happy_hour_defaults() {
        let hours = default_hours();
        assert!(!hours.is_happy_hour(&local_time(10, 30)));
        assert!(hours.is_happy_hour(&local_time(11, 0)));
        assert!(hours.is_happy_hour(&local_time(12, 45)));
        assert!(!hours.is_happy_hour(&local_time(13, 0)));
    }

    #[test]
    fn test_evaluates_local_hour_of_instant() {
        let hours = default_hours();
        // 09:00 UTC is 02:00 at UTC-7
        let tz = FixedOffset::west_opt(7 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2025, 6, 2, 2, 0, 0).unwrap();
        assert!(!hours.is_business_hours(&now));
        assert!(hours.is_business_hours(&now.with_timezone(&FixedOffset::east_opt(0).unwrap())));
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(local_time(12, 0));
        assert_eq!(clock.now().hour(), 12);
    }
}
