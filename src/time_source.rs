//! Time sources feeding the timestamp tag.
//!
//! The engine only asks for two things: a calendar date-time and a
//! monotonic run time in whole seconds. Either read may fail; the engine
//! then drops the line instead of printing a made-up time.

use time::PrimitiveDateTime;

/// Time read failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("time source unavailable")]
pub struct TimeSourceError;

/// External wall-clock / monotonic counter.
pub trait TimeSource {
    /// One-time setup, called from `LogEngine::initialize`.
    fn init(&mut self) -> Result<(), TimeSourceError> {
        Ok(())
    }

    /// Current wall-clock date and time.
    fn calendar(&mut self) -> Result<PrimitiveDateTime, TimeSourceError>;

    /// Seconds since boot.
    fn uptime_secs(&mut self) -> Result<u64, TimeSourceError>;
}

impl<T: TimeSource + ?Sized> TimeSource for &mut T {
    fn init(&mut self) -> Result<(), TimeSourceError> {
        (**self).init()
    }

    fn calendar(&mut self) -> Result<PrimitiveDateTime, TimeSourceError> {
        (**self).calendar()
    }

    fn uptime_secs(&mut self) -> Result<u64, TimeSourceError> {
        (**self).uptime_secs()
    }
}

/// No clock at all. Pair with `TimeMode::Off`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClock;

impl TimeSource for NoClock {
    fn calendar(&mut self) -> Result<PrimitiveDateTime, TimeSourceError> {
        Err(TimeSourceError)
    }

    fn uptime_secs(&mut self) -> Result<u64, TimeSourceError> {
        Err(TimeSourceError)
    }
}

/// Hand-driven clock for host builds and tests.
///
/// `None` in either field makes the matching read fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    pub calendar: Option<PrimitiveDateTime>,
    pub uptime_secs: Option<u64>,
    /// Makes `init` fail when set.
    pub init_fails: bool,
}

impl ManualClock {
    /// Clock reporting only a run time.
    pub const fn running(uptime_secs: u64) -> Self {
        Self {
            calendar: None,
            uptime_secs: Some(uptime_secs),
            init_fails: false,
        }
    }

    /// Clock reporting only a calendar time.
    pub const fn at(calendar: PrimitiveDateTime) -> Self {
        Self {
            calendar: Some(calendar),
            uptime_secs: None,
            init_fails: false,
        }
    }

    /// Advance the run time.
    pub fn tick(&mut self, secs: u64) {
        if let Some(t) = self.uptime_secs.as_mut() {
            *t += secs;
        }
    }
}

impl TimeSource for ManualClock {
    fn init(&mut self) -> Result<(), TimeSourceError> {
        if self.init_fails {
            Err(TimeSourceError)
        } else {
            Ok(())
        }
    }

    fn calendar(&mut self) -> Result<PrimitiveDateTime, TimeSourceError> {
        self.calendar.ok_or(TimeSourceError)
    }

    fn uptime_secs(&mut self) -> Result<u64, TimeSourceError> {
        self.uptime_secs.ok_or(TimeSourceError)
    }
}

/// ESP-IDF clock: high-resolution timer for run time, newlib for calendar.
#[cfg(target_os = "espidf")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EspClock;

#[cfg(target_os = "espidf")]
impl TimeSource for EspClock {
    fn uptime_secs(&mut self) -> Result<u64, TimeSourceError> {
        // SAFETY: esp_timer_get_time is always safe to call after boot
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        u64::try_from(us / 1_000_000).map_err(|_| TimeSourceError)
    }

    fn calendar(&mut self) -> Result<PrimitiveDateTime, TimeSourceError> {
        let mut tv = esp_idf_svc::sys::timeval { tv_sec: 0, tv_usec: 0 };
        // SAFETY: tv is a valid out-pointer, timezone argument is unused
        let ret = unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) };
        if ret != 0 {
            return Err(TimeSourceError);
        }
        let now = time::OffsetDateTime::from_unix_timestamp(tv.tv_sec as i64)
            .map_err(|_| TimeSourceError)?;
        Ok(PrimitiveDateTime::new(now.date(), now.time()))
    }
}
