//! Severity filter.
//!
//! A message goes through iff `level <= threshold` (Fatal = 0). Fatal
//! always goes through, whatever the threshold.

use crate::level::SeverityLevel;

/// Clamp a raw threshold to the least severe defined level.
#[inline]
pub const fn clamp_threshold(raw: u8) -> SeverityLevel {
    let max = SeverityLevel::LEAST_SEVERE as u8;
    SeverityLevel::from_u8(if raw > max { max } else { raw })
}

/// Decide whether a message at `level` passes `threshold`.
#[inline]
pub const fn should_emit(level: SeverityLevel, threshold: SeverityLevel) -> bool {
    matches!(level, SeverityLevel::Fatal) || level.as_u8() <= threshold.as_u8()
}

/// Runtime-settable threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelFilter {
    threshold: SeverityLevel,
}

impl LevelFilter {
    pub const fn new(threshold: SeverityLevel) -> Self {
        Self { threshold }
    }

    /// Current threshold.
    #[inline]
    pub fn threshold(&self) -> SeverityLevel {
        self.threshold
    }

    /// Set from a raw value, clamped to `Verbose`.
    pub fn set_raw(&mut self, raw: u8) -> SeverityLevel {
        self.threshold = clamp_threshold(raw);
        self.threshold
    }

    pub fn set(&mut self, level: SeverityLevel) {
        self.threshold = level;
    }

    #[inline]
    pub fn allows(&self, level: SeverityLevel) -> bool {
        should_emit(level, self.threshold)
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(SeverityLevel::LEAST_SEVERE)
    }
}
