//! Process-wide logger instance and logging macros.
//!
//! # Execution-context contract
//!
//! One engine is installed per process. Every entry point here, including
//! [`install`] and [`uninstall`], takes the guard with `try_lock` and
//! never spins: if another context already holds it (an interrupt fired
//! while main code was composing a line), the call returns
//! [`LogError::Busy`] and the line is lost. This keeps the shared
//! line buffer from being corrupted or interleaved. It does not make the
//! channels themselves re-entrant, and it is not a thread-safety claim for
//! anything the engine writes to.
//!
//! ```ignore
//! static mut ENGINE: Option<MyEngine> = None;
//!
//! let engine = unsafe { ENGINE.insert(MyEngine::new(cfg, probe, serial, clock, abort)) };
//! engine.initialize(SeverityLevel::Debug.into())?;
//! embedded_logging::global::install(engine)?;
//!
//! log_warn!("battery at {}%\n", pct);
//! ```

use core::fmt;

use spin::Mutex;

use crate::engine::{Logger, Outcome};
use crate::error::LogError;
use crate::filter::should_emit;
use crate::level::SeverityLevel;
use crate::tags::Location;

type Slot = Option<&'static mut (dyn Logger + Send)>;

static LOGGER: Mutex<Slot> = Mutex::new(None);

/// Install the process-wide engine, returning the one it replaces.
pub fn install(logger: &'static mut (dyn Logger + Send)) -> Result<Slot, LogError> {
    let threshold = logger.threshold();
    let previous = LOGGER.try_lock().ok_or(LogError::Busy)?.replace(logger);
    log::set_max_level(threshold.into());
    Ok(previous)
}

/// Remove the process-wide engine.
pub fn uninstall() -> Result<Slot, LogError> {
    Ok(LOGGER.try_lock().ok_or(LogError::Busy)?.take())
}

fn with_logger<R>(f: impl FnOnce(&mut (dyn Logger + Send)) -> R) -> Result<R, LogError> {
    let mut guard = LOGGER.try_lock().ok_or(LogError::Busy)?;
    let logger = guard.as_mut().ok_or(LogError::NotInstalled)?;
    Ok(f(&mut **logger))
}

pub fn log(
    level: SeverityLevel,
    location: &Location<'_>,
    args: fmt::Arguments<'_>,
) -> Result<Outcome, LogError> {
    with_logger(|l| l.log(level, location, args))?
}

pub fn log_plain(args: fmt::Arguments<'_>) -> Result<(), LogError> {
    with_logger(|l| l.log_plain(args))
}

pub fn newline() -> Result<(), LogError> {
    with_logger(|l| l.newline())
}

pub fn hex_dump(bytes: &[u8], align: usize, reverse: bool) -> Result<(), LogError> {
    with_logger(|l| l.hex_dump(bytes, align, reverse))?
}

/// Runtime threshold update; the `log` facade follows along.
pub fn set_threshold(level: SeverityLevel) -> Result<(), LogError> {
    with_logger(|l| l.set_threshold(level))?;
    log::set_max_level(level.into());
    Ok(())
}

pub fn threshold() -> Result<SeverityLevel, LogError> {
    with_logger(|l| l.threshold())
}

/// Terminate after a Fatal line that did not reach the abort hook.
#[doc(hidden)]
pub fn fatal_fallback(result: Result<Outcome, LogError>) -> ! {
    match result {
        Ok(_) => panic!("FTL line returned without terminating"),
        Err(e) => panic!("FTL line not dispatched: {}", e),
    }
}

/// Bridge from the `log` crate facade into the installed engine.
struct FacadeBridge;

static FACADE: FacadeBridge = FacadeBridge;

impl log::Log for FacadeBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        threshold()
            .map(|t| should_emit(metadata.level().into(), t))
            .unwrap_or(false)
    }

    fn log(&self, record: &log::Record<'_>) {
        let location = Location {
            file: record.file(),
            line: record.line().unwrap_or(0),
        };
        let _ = crate::global::log(
            record.level().into(),
            &location,
            format_args!("{}\n", record.args()),
        );
    }

    fn flush(&self) {}
}

/// Route `log::error!`, `log::info!`, ... into the installed engine.
pub fn init_log_facade() -> Result<(), log::SetLoggerError> {
    log::set_logger(&FACADE)?;
    log::set_max_level(threshold().map(Into::into).unwrap_or(log::LevelFilter::Trace));
    Ok(())
}

/// Log at an explicit level through the installed engine.
///
/// Evaluates to `Result<Outcome, LogError>`.
#[macro_export]
macro_rules! log_at {
    ($level:expr, $($arg:tt)*) => {
        $crate::global::log(
            $level,
            &$crate::tags::Location::new(file!(), line!()),
            format_args!($($arg)*),
        )
    };
}

/// Fatal line, then terminate. Never returns.
#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)*) => {
        $crate::global::fatal_fallback($crate::log_at!($crate::level::SeverityLevel::Fatal, $($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let _ = $crate::log_at!($crate::level::SeverityLevel::Error, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let _ = $crate::log_at!($crate::level::SeverityLevel::Warning, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let _ = $crate::log_at!($crate::level::SeverityLevel::ImportantInfo, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_highlight {
    ($($arg:tt)*) => {{
        let _ = $crate::log_at!($crate::level::SeverityLevel::DebugHighlight, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        let _ = $crate::log_at!($crate::level::SeverityLevel::Debug, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_verbose {
    ($($arg:tt)*) => {{
        let _ = $crate::log_at!($crate::level::SeverityLevel::Verbose, $($arg)*);
    }};
}

/// `"<what> returns Error[0x%04x]"` at Error level.
#[macro_export]
macro_rules! log_call_error {
    ($what:literal, $err:expr) => {
        $crate::log_error!(concat!($what, " returns Error[0x{:04x}]\n"), $err)
    };
}

/// Untagged, unfiltered message.
#[macro_export]
macro_rules! log_plain {
    ($($arg:tt)*) => {{
        let _ = $crate::global::log_plain(format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! log_newline {
    () => {{
        let _ = $crate::global::newline();
    }};
}

/// `log_hex!(bytes)`, `log_hex!(bytes, align)` or `log_hex!(bytes, align, reverse)`.
#[macro_export]
macro_rules! log_hex {
    ($bytes:expr) => {
        $crate::log_hex!($bytes, 0, false)
    };
    ($bytes:expr, $align:expr) => {
        $crate::log_hex!($bytes, $align, false)
    };
    ($bytes:expr, $align:expr, $reverse:expr) => {{
        let _ = $crate::global::hex_dump($bytes, $align, $reverse);
    }};
}
