//! Wall-clock access for the miner.
//!
//! Accrual uses milliseconds since the epoch; the daily check-in uses the
//! device-local calendar date, so check-in boundaries follow local midnight.

#[cfg(test)]
use std::cell::Cell;

use chrono::NaiveDate;

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Today's date in the device's local timezone.
    fn today(&self) -> NaiveDate;
}

/// Browser clock backed by `js_sys::Date`.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct BrowserClock;

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }

    fn today(&self) -> NaiveDate {
        let d = js_sys::Date::new_0();
        NaiveDate::from_ymd_opt(d.get_full_year() as i32, d.get_month() + 1, d.get_date())
            .unwrap_or_default()
    }
}

/// Native fallback. Without a timezone database the calendar date is UTC.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    fn today(&self) -> NaiveDate {
        date_of_ms(self.now_ms())
    }
}

#[cfg(target_arch = "wasm32")]
pub type HostClock = BrowserClock;
#[cfg(not(target_arch = "wasm32"))]
pub type HostClock = SystemClock;

/// UTC calendar date of an epoch-millisecond timestamp.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub fn date_of_ms(ms: i64) -> NaiveDate {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// A clock that only moves when told to. Dates are the UTC date of `now_ms`.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<i64>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        date_of_ms(self.now.get())
    }
}

#[cfg(test)]
impl<C: Clock> Clock for std::rc::Rc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
