//! Module: config
//!
//! Purpose: Engine configuration, resolved once at startup.
//!
//! Everything except `min_level` is fixed for the lifetime of the engine.
//! The threshold can be changed at runtime through
//! `LogEngine::set_threshold`.

use crate::color::ColorScheme;
use crate::filter::clamp_threshold;
use crate::level::SeverityLevel;
use crate::sink::SinkSet;

/// Default width of the file-stem field in the location tag.
pub const DEFAULT_STEM_WIDTH: usize = 10;

/// Default width of the line-number field in the location tag.
pub const DEFAULT_LINE_WIDTH: usize = 5;

/// Which time representation the timestamp tag uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeMode {
    /// No timestamp tag.
    Off,
    /// `[YYYY-MM-DD HH:MM:SS]` from the wall clock.
    Calendar,
    /// `[RT-<days>:<hh>:<mm>:<ss>]` from the monotonic counter.
    RunTime,
}

/// How fragments reach the sinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposeMode {
    /// Assemble the whole line, then dispatch once.
    Accumulate,
    /// Dispatch every fragment as soon as it is formatted.
    Stream,
}

/// What happens after an Error line has been dispatched.
///
/// A Fatal line always terminates; that is not configurable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AbortPolicy {
    /// Terminate after an Error line as well.
    pub on_error: bool,
}

/// Engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Least severe level that still gets through.
    pub min_level: SeverityLevel,
    pub time_mode: TimeMode,
    /// Include the `[file:line]` tag.
    pub location: bool,
    pub stem_width: usize,
    pub line_width: usize,
    pub sinks: SinkSet,
    pub compose: ComposeMode,
    pub abort: AbortPolicy,
    pub colors: ColorScheme,
}

impl EngineConfig {
    /// Full-featured defaults: run-time stamp, location on, serial sink.
    pub const fn new() -> Self {
        Self {
            min_level: SeverityLevel::Verbose,
            time_mode: TimeMode::RunTime,
            location: true,
            stem_width: DEFAULT_STEM_WIDTH,
            line_width: DEFAULT_LINE_WIDTH,
            sinks: SinkSet::SERIAL,
            compose: ComposeMode::Accumulate,
            abort: AbortPolicy { on_error: false },
            colors: ColorScheme::RTT,
        }
    }

    pub const fn with_min_level(mut self, level: SeverityLevel) -> Self {
        self.min_level = clamp_threshold(level.as_u8());
        self
    }

    pub const fn with_time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }

    pub const fn with_location(mut self, on: bool) -> Self {
        self.location = on;
        self
    }

    pub const fn with_stem_width(mut self, width: usize) -> Self {
        self.stem_width = width;
        self
    }

    pub const fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    pub const fn with_sinks(mut self, sinks: SinkSet) -> Self {
        self.sinks = sinks;
        self
    }

    pub const fn with_compose(mut self, mode: ComposeMode) -> Self {
        self.compose = mode;
        self
    }

    /// Fatal always aborts; only the error half is configurable.
    pub const fn with_abort_on_error(mut self, on: bool) -> Self {
        self.abort.on_error = on;
        self
    }

    pub const fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.colors = colors;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
