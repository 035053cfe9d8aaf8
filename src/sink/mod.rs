//! Output channels and the dispatcher that fans lines out to them.
//!
//! Two fixed channels exist: the debug-probe console and the serial
//! (VCOM/UART) stream. Which of them receive lines is chosen once, in
//! [`EngineConfig::sinks`](crate::config::EngineConfig). Any
//! `core::fmt::Write` implementor can back a channel.

use core::fmt::Write;

use crate::config::AbortPolicy;
use crate::level::SeverityLevel;

#[cfg(target_os = "espidf")]
pub mod probe;
pub mod uart;

bitflags::bitflags! {
    /// Active output channels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SinkSet: u8 {
        /// Debug-probe console (RTT / USB-Serial-JTAG).
        const DEBUG_PROBE = 1;
        /// Serial / virtual COM stream.
        const SERIAL = 1 << 1;
        const BOTH = Self::DEBUG_PROBE.bits() | Self::SERIAL.bits();
    }
}

/// Channel that swallows everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl Write for NullSink {
    fn write_str(&mut self, _s: &str) -> core::fmt::Result {
        Ok(())
    }
}

/// Process termination hook for Fatal (and optionally Error) lines.
pub trait AbortHandler {
    /// Never returns.
    fn abort(&mut self, level: SeverityLevel) -> !;
}

impl<A: AbortHandler + ?Sized> AbortHandler for &mut A {
    fn abort(&mut self, level: SeverityLevel) -> ! {
        (**self).abort(level)
    }
}

/// Terminates by panicking. Default on the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanicAbort;

impl AbortHandler for PanicAbort {
    fn abort(&mut self, level: SeverityLevel) -> ! {
        panic!("{} line dispatched, terminating", level.label())
    }
}

/// Terminates through the IDF `abort()`, which prints a backtrace and
/// resets the chip.
#[cfg(target_os = "espidf")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EspAbort;

#[cfg(target_os = "espidf")]
impl AbortHandler for EspAbort {
    fn abort(&mut self, _level: SeverityLevel) -> ! {
        // SAFETY: abort has no preconditions
        unsafe { esp_idf_svc::sys::abort() }
    }
}

/// Writes finished text to the selected channels and runs the abort policy.
pub struct SinkDispatcher<P, S, A> {
    probe: P,
    serial: S,
    selected: SinkSet,
    policy: AbortPolicy,
    abort: A,
}

impl<P: Write, S: Write, A: AbortHandler> SinkDispatcher<P, S, A> {
    pub fn new(probe: P, serial: S, abort: A, selected: SinkSet, policy: AbortPolicy) -> Self {
        Self {
            probe,
            serial,
            selected,
            policy,
            abort,
        }
    }

    /// Write `text` verbatim to every selected channel.
    ///
    /// Channel errors are dropped: a log line has nowhere else to go.
    pub fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.selected.contains(SinkSet::DEBUG_PROBE) {
            let _ = self.probe.write_str(text);
        }
        if self.selected.contains(SinkSet::SERIAL) {
            let _ = self.serial.write_str(text);
        }
    }

    /// Called after a Fatal line went out.
    pub fn on_fatal(&mut self) -> ! {
        self.abort.abort(SeverityLevel::Fatal)
    }

    /// Called after an Error line went out; aborts only if enabled.
    pub fn on_error(&mut self) {
        if self.policy.on_error {
            self.abort.abort(SeverityLevel::Error);
        }
    }

    /// Run the abort policy for a line that was just dispatched.
    pub fn after_dispatch(&mut self, level: SeverityLevel) {
        match level {
            SeverityLevel::Fatal => self.on_fatal(),
            SeverityLevel::Error => self.on_error(),
            _ => {}
        }
    }

    /// Selected channels.
    #[inline]
    pub fn selected(&self) -> SinkSet {
        self.selected
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// Give the channels back.
    pub fn into_parts(self) -> (P, S) {
        (self.probe, self.serial)
    }
}
