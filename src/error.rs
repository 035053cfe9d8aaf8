//! Logger error types

use crate::line_buffer::LineBufferError;
use crate::time_source::TimeSourceError;

/// Why a line was not dispatched.
///
/// A filtered-out message is not an error, see [`crate::engine::Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// A fragment did not fit; the line was abandoned.
    #[error("E-1: line truncated, nothing dispatched")]
    CompositionTruncated,
    /// Timestamp read failed; the line was abandoned.
    #[error("E-2: time source unavailable")]
    TimeSourceUnavailable,
    /// Another execution context holds the global logger.
    #[error("E-3: logger busy")]
    Busy,
    /// Global entry point used before `install`.
    #[error("E-4: logger not installed")]
    NotInstalled,
}

impl LogError {
    /// Negative result code, as reported to C-style callers.
    pub fn code(&self) -> i32 {
        match self {
            Self::CompositionTruncated => -1,
            Self::TimeSourceUnavailable => -2,
            Self::Busy => -3,
            Self::NotInstalled => -4,
        }
    }
}

impl From<LineBufferError> for LogError {
    fn from(_: LineBufferError) -> Self {
        LogError::CompositionTruncated
    }
}

impl From<TimeSourceError> for LogError {
    fn from(_: TimeSourceError) -> Self {
        LogError::TimeSourceUnavailable
    }
}
