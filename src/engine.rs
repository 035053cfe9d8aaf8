//! Log-line assembly and dispatch.
//!
//! # Per-call state machine
//!
//! ```text
//! Idle ──▶ Filtering ──reject──▶ Idle            (Ok(FilteredOut))
//!              │
//!            accept
//!              ▼
//!          Composing ──fragment error──▶ Idle     (Err, nothing dispatched)
//!              │
//!              ▼
//!         Dispatching ──▶ Idle                   (Fatal: terminate)
//! ```
//!
//! Composition order is fixed: timestamp, location, severity, `": "`,
//! then the user message, which is cut silently if it runs out of room.
//!
//! # Compose modes
//!
//! - `Accumulate`: the whole line is built in the [`LineBuffer`], then
//!   written once. Either a full line reaches the sinks or nothing does.
//! - `Stream`: the header tags are still assembled whole and written
//!   together, so a header that does not fit sends nothing. The message
//!   then goes out as its own write with the full capacity to itself,
//!   and a hex dump is written byte by byte with no length limit.
//!
//! # Execution context
//!
//! All methods take `&mut self` and run to completion on the caller's
//! context. The engine holds no lock of its own; see [`crate::global`]
//! for the shared instance and its busy guard.

use core::fmt::{self, Write};

use crate::config::{ComposeMode, EngineConfig, TimeMode};
use crate::error::LogError;
use crate::filter::{clamp_threshold, LevelFilter};
use crate::hex_dump::{append_hex_byte, format_hex_dump, traversal};
use crate::level::SeverityLevel;
use crate::line_buffer::{LineBuffer, LINE_CAPACITY};
use crate::sink::{AbortHandler, SinkDispatcher};
use crate::tags::{fill_level, fill_location, fill_separator, fill_time, Location};
use crate::time_source::TimeSource;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Cargo profile the crate was built with.
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

/// Result of a log call that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The line was dispatched.
    Emitted,
    /// Below threshold, nothing done.
    FilteredOut,
}

/// Object-safe surface of an engine, used by the process-wide instance.
pub trait Logger {
    fn log(
        &mut self,
        level: SeverityLevel,
        location: &Location<'_>,
        args: fmt::Arguments<'_>,
    ) -> Result<Outcome, LogError>;

    fn log_plain(&mut self, args: fmt::Arguments<'_>);

    fn newline(&mut self);

    fn hex_dump(&mut self, bytes: &[u8], align: usize, reverse: bool) -> Result<(), LogError>;

    fn set_threshold(&mut self, level: SeverityLevel);

    fn threshold(&self) -> SeverityLevel;
}

/// The logging engine.
///
/// `P` and `S` back the debug-probe and serial channels, `T` is the time
/// source, `A` the abort hook, `N` the line capacity in bytes.
pub struct LogEngine<P, S, T, A, const N: usize = LINE_CAPACITY> {
    config: EngineConfig,
    filter: LevelFilter,
    line: LineBuffer<N>,
    clock: T,
    sinks: SinkDispatcher<P, S, A>,
}

impl<P, S, T, A, const N: usize> LogEngine<P, S, T, A, N>
where
    P: Write,
    S: Write,
    T: TimeSource,
    A: AbortHandler,
{
    /// Build an engine. Channels are expected to be ready for writing.
    pub fn new(config: EngineConfig, probe: P, serial: S, clock: T, abort: A) -> Self {
        Self {
            filter: LevelFilter::new(clamp_threshold(config.min_level.as_u8())),
            line: LineBuffer::new(),
            clock,
            sinks: SinkDispatcher::new(probe, serial, abort, config.sinks, config.abort),
            config,
        }
    }

    /// One-time setup: clamp and set the threshold, start the clock, print
    /// the boot banner.
    ///
    /// If the clock fails to start, the banner is skipped and
    /// `TimeSourceUnavailable` is returned. The threshold is set either way.
    pub fn initialize(&mut self, threshold: u8) -> Result<(), LogError> {
        self.set_threshold_raw(threshold);
        if self.config.time_mode != TimeMode::Off {
            self.clock.init()?;
        }
        self.banner();
        Ok(())
    }

    /// Fixed startup line.
    pub fn banner(&mut self) {
        let pair = self.config.colors.banner;
        self.line.reset();
        self.line.append_truncating(format_args!(
            "{}{} boot, threshold {}{}\n",
            pair.open,
            VERSION,
            self.filter.threshold(),
            pair.close
        ));
        self.flush();
    }

    /// Runtime threshold update.
    pub fn set_threshold(&mut self, level: SeverityLevel) {
        self.filter.set(level);
    }

    /// Runtime threshold update from a raw value, clamped to `Verbose`.
    pub fn set_threshold_raw(&mut self, raw: u8) -> SeverityLevel {
        self.filter.set_raw(raw)
    }

    #[inline]
    pub fn threshold(&self) -> SeverityLevel {
        self.filter.threshold()
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assembly buffer. Empty between calls.
    pub fn line(&self) -> &LineBuffer<N> {
        &self.line
    }

    pub fn sinks(&self) -> &SinkDispatcher<P, S, A> {
        &self.sinks
    }

    /// Tear down, giving back the probe and serial channels.
    pub fn into_sinks(self) -> (P, S) {
        self.sinks.into_parts()
    }

    /// Filter, compose and dispatch one line.
    ///
    /// A Fatal line is never filtered and never returns: the abort hook
    /// runs right after it is dispatched, or right after composition
    /// failed if it could not be.
    pub fn log(
        &mut self,
        level: SeverityLevel,
        location: &Location<'_>,
        args: fmt::Arguments<'_>,
    ) -> Result<Outcome, LogError> {
        if !self.filter.allows(level) {
            return Ok(Outcome::FilteredOut);
        }

        if let Err(e) = self.compose(level, location, args) {
            self.line.reset();
            if level == SeverityLevel::Fatal {
                self.sinks.on_fatal();
            }
            return Err(e);
        }
        self.flush();

        self.sinks.after_dispatch(level);
        Ok(Outcome::Emitted)
    }

    /// Message only, no tags, no filtering.
    pub fn log_plain(&mut self, args: fmt::Arguments<'_>) {
        self.line.reset();
        self.line.append_truncating(args);
        self.flush();
    }

    /// Single line terminator, straight to the sinks.
    pub fn newline(&mut self) {
        self.sinks.emit("\n");
    }

    /// Hex dump of `bytes`, followed by a newline.
    ///
    /// `align == 0` means 16. In accumulate mode a dump that does not fit
    /// is dropped whole with `CompositionTruncated`.
    pub fn hex_dump(&mut self, bytes: &[u8], align: usize, reverse: bool) -> Result<(), LogError> {
        self.line.reset();
        let dumped = match self.config.compose {
            ComposeMode::Accumulate => format_hex_dump(&mut self.line, bytes, align, reverse)
                .map(|_| ())
                .map_err(LogError::from),
            ComposeMode::Stream => traversal(bytes, reverse)
                .enumerate()
                .try_for_each(|(i, byte)| {
                    self.fragment(|line| Ok(append_hex_byte(line, i, byte, align)?))
                }),
        };
        if let Err(e) = dumped {
            self.line.reset();
            return Err(e);
        }
        self.flush();
        self.newline();
        Ok(())
    }

    /// Dump with 8 bytes per row.
    pub fn hex_dump_8(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        self.hex_dump(bytes, 8, false)
    }

    /// Dump with 16 bytes per row.
    pub fn hex_dump_16(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        self.hex_dump(bytes, 16, false)
    }

    /// Dump with 32 bytes per row.
    pub fn hex_dump_32(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        self.hex_dump(bytes, 32, false)
    }

    /// One line per non-fatal level, then hex dumps of a byte ramp at
    /// alignments 8, 16 and 32.
    pub fn demo(&mut self) {
        const MESSAGES: [(SeverityLevel, &str); 6] = [
            (SeverityLevel::Error, "This is an error message"),
            (SeverityLevel::Warning, "This is a  warning message"),
            (SeverityLevel::ImportantInfo, "This is an important info message"),
            (SeverityLevel::DebugHighlight, "This is a  debug highlight message"),
            (SeverityLevel::Debug, "This is a  debug message"),
            (SeverityLevel::Verbose, "This is a  verbose message"),
        ];
        const RAMP_LEN: usize = 32 * 4 + 11;

        let here = Location::new(file!(), line!());
        for (level, msg) in MESSAGES {
            let _ = self.log(level, &here, format_args!("{}\n", msg));
        }

        let mut ramp = [0u8; RAMP_LEN];
        for (i, b) in ramp.iter_mut().enumerate() {
            *b = i as u8;
        }

        for (level, align) in [
            (SeverityLevel::DebugHighlight, 8),
            (SeverityLevel::ImportantInfo, 16),
            (SeverityLevel::Warning, 32),
        ] {
            let _ = self.log(level, &here, format_args!("Hex Dump with {}-byte alignment\n", align));
            let _ = self.hex_dump(&ramp, align, false);
        }
    }

    fn compose(
        &mut self,
        level: SeverityLevel,
        location: &Location<'_>,
        args: fmt::Arguments<'_>,
    ) -> Result<(), LogError> {
        let cfg = &self.config;
        let line = &mut self.line;
        line.reset();
        fill_time(line, cfg.time_mode, &mut self.clock)?;
        if cfg.location {
            fill_location(line, location, cfg.stem_width, cfg.line_width)?;
        }
        fill_level(line, level, &cfg.colors)?;
        fill_separator(line)?;

        // Header is complete; only now may anything reach the sinks.
        if self.config.compose == ComposeMode::Stream {
            self.flush();
        }
        self.fragment(|line| Ok(line.append_truncating(args)))
    }

    /// Run one fragment formatter; in stream mode write it out at once.
    fn fragment<F>(&mut self, format: F) -> Result<(), LogError>
    where
        F: FnOnce(&mut LineBuffer<N>) -> Result<usize, LogError>,
    {
        format(&mut self.line)?;
        if self.config.compose == ComposeMode::Stream {
            self.flush();
        }
        Ok(())
    }

    fn flush(&mut self) {
        self.sinks.emit(self.line.as_str());
        self.line.reset();
    }
}

impl<P, S, T, A, const N: usize> Logger for LogEngine<P, S, T, A, N>
where
    P: Write,
    S: Write,
    T: TimeSource,
    A: AbortHandler,
{
    fn log(
        &mut self,
        level: SeverityLevel,
        location: &Location<'_>,
        args: fmt::Arguments<'_>,
    ) -> Result<Outcome, LogError> {
        LogEngine::log(self, level, location, args)
    }

    fn log_plain(&mut self, args: fmt::Arguments<'_>) {
        LogEngine::log_plain(self, args)
    }

    fn newline(&mut self) {
        LogEngine::newline(self)
    }

    fn hex_dump(&mut self, bytes: &[u8], align: usize, reverse: bool) -> Result<(), LogError> {
        LogEngine::hex_dump(self, bytes, align, reverse)
    }

    fn set_threshold(&mut self, level: SeverityLevel) {
        LogEngine::set_threshold(self, level)
    }

    fn threshold(&self) -> SeverityLevel {
        LogEngine::threshold(self)
    }
}
