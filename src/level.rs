//! Severity scale.
//!
//! Seven levels ordered from most to least severe. `Fatal` is index 0,
//! so "more severe" always means "numerically smaller".

/// Log severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SeverityLevel {
    /// Line is always emitted, then the process is terminated.
    Fatal = 0,
    Error = 1,
    Warning = 2,
    ImportantInfo = 3,
    DebugHighlight = 4,
    Debug = 5,
    /// Least severe level, also the widest threshold.
    Verbose = 6,
}

impl SeverityLevel {
    /// All levels, most severe first.
    pub const ALL: [SeverityLevel; 7] = [
        SeverityLevel::Fatal,
        SeverityLevel::Error,
        SeverityLevel::Warning,
        SeverityLevel::ImportantInfo,
        SeverityLevel::DebugHighlight,
        SeverityLevel::Debug,
        SeverityLevel::Verbose,
    ];

    /// Least severe defined level.
    pub const LEAST_SEVERE: SeverityLevel = SeverityLevel::Verbose;

    /// Convert from raw u8 value.
    ///
    /// Out-of-range values resolve to `Verbose`.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => SeverityLevel::Fatal,
            1 => SeverityLevel::Error,
            2 => SeverityLevel::Warning,
            3 => SeverityLevel::ImportantInfo,
            4 => SeverityLevel::DebugHighlight,
            5 => SeverityLevel::Debug,
            _ => SeverityLevel::Verbose,
        }
    }

    /// Raw index (Fatal = 0).
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Fixed tag label.
    pub const fn label(self) -> &'static str {
        match self {
            SeverityLevel::Fatal => "FTL",
            SeverityLevel::Error => "ERR",
            SeverityLevel::Warning => "WRN",
            SeverityLevel::ImportantInfo => "IPM",
            SeverityLevel::DebugHighlight => "DHL",
            SeverityLevel::Debug => "DBG",
            SeverityLevel::Verbose => "VER",
        }
    }

    /// Label for a raw level index; anything unknown gets the verbose label.
    pub const fn label_for_raw(value: u8) -> &'static str {
        Self::from_u8(value).label()
    }
}

impl core::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<SeverityLevel> for u8 {
    fn from(level: SeverityLevel) -> Self {
        level as u8
    }
}

impl From<log::Level> for SeverityLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => SeverityLevel::Error,
            log::Level::Warn => SeverityLevel::Warning,
            log::Level::Info => SeverityLevel::ImportantInfo,
            log::Level::Debug => SeverityLevel::Debug,
            log::Level::Trace => SeverityLevel::Verbose,
        }
    }
}

impl From<SeverityLevel> for log::LevelFilter {
    /// Widest `log` filter that still lets everything at `level` through.
    fn from(level: SeverityLevel) -> Self {
        match level {
            SeverityLevel::Fatal | SeverityLevel::Error => log::LevelFilter::Error,
            SeverityLevel::Warning => log::LevelFilter::Warn,
            SeverityLevel::ImportantInfo | SeverityLevel::DebugHighlight => log::LevelFilter::Info,
            SeverityLevel::Debug => log::LevelFilter::Debug,
            SeverityLevel::Verbose => log::LevelFilter::Trace,
        }
    }
}
