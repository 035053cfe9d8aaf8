//! Header tag formatters.
//!
//! Each formatter appends one bracketed fragment at the buffer cursor and
//! reports how many bytes it wrote. They run in a fixed order per line:
//!
//! ```text
//! [RT-0:00:01:05][    driver:42   ][ERR]: message
//! └─ timestamp ─┘└── location ───┘└lvl┘
//! ```

use crate::color::ColorScheme;
use crate::config::TimeMode;
use crate::error::LogError;
use crate::level::SeverityLevel;
use crate::line_buffer::{LineBuffer, LineBufferError};
use crate::time_source::TimeSource;
use time::PrimitiveDateTime;

/// Literal written between the header tags and the user message.
pub const SEPARATOR: &str = ": ";

const SECS_PER_DAY: u64 = 24 * 60 * 60;
const SECS_PER_HOUR: u64 = 60 * 60;

/// Source location of a log call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location<'a> {
    /// Source path; `None` skips the location tag.
    pub file: Option<&'a str>,
    pub line: u32,
}

impl<'a> Location<'a> {
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self { file: Some(file), line }
    }

    /// No location; the tag is skipped.
    pub const fn none() -> Self {
        Self { file: None, line: 0 }
    }
}

impl Location<'static> {
    /// Location of the caller.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = core::panic::Location::caller();
        Self::new(loc.file(), loc.line())
    }
}

/// `[RT-<days>:<hh>:<mm>:<ss>]`
pub fn fill_run_time<const N: usize>(
    line: &mut LineBuffer<N>,
    secs: u64,
) -> Result<usize, LineBufferError> {
    line.append_fmt(format_args!(
        "[RT-{}:{:02}:{:02}:{:02}]",
        secs / SECS_PER_DAY,
        (secs % SECS_PER_DAY) / SECS_PER_HOUR,
        (secs % SECS_PER_HOUR) / 60,
        secs % 60
    ))
}

/// `[YYYY-MM-DD HH:MM:SS]`
pub fn fill_calendar<const N: usize>(
    line: &mut LineBuffer<N>,
    at: &PrimitiveDateTime,
) -> Result<usize, LineBufferError> {
    line.append_fmt(format_args!(
        "[{:04}-{:02}-{:02} {:02}:{:02}:{:02}]",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    ))
}

/// Timestamp tag in the configured mode.
///
/// A failed clock read aborts the line with `TimeSourceUnavailable`.
pub fn fill_time<const N: usize, T: TimeSource + ?Sized>(
    line: &mut LineBuffer<N>,
    mode: TimeMode,
    clock: &mut T,
) -> Result<usize, LogError> {
    let written = match mode {
        TimeMode::Off => 0,
        TimeMode::Calendar => {
            let now = clock.calendar()?;
            fill_calendar(line, &now)?
        }
        TimeMode::RunTime => {
            let secs = clock.uptime_secs()?;
            fill_run_time(line, secs)?
        }
    };
    Ok(written)
}

/// Last path component without its extension.
///
/// Both `/` and `\` separate components; the stem ends at the first `.`.
pub fn file_stem(path: &str) -> &str {
    let base = match path.rfind(|c| c == '/' || c == '\\') {
        Some(idx) => &path[idx + 1..],
        None => path,
    };
    base.split('.').next().unwrap_or(base)
}

/// `[<stem>:<line>]`, stem right-aligned and cut to `stem_width`, line
/// number left-justified in `line_width`.
///
/// A missing or empty path writes nothing and is not an error.
pub fn fill_location<const N: usize>(
    line: &mut LineBuffer<N>,
    location: &Location<'_>,
    stem_width: usize,
    line_width: usize,
) -> Result<usize, LineBufferError> {
    let path = match location.file {
        Some(p) if !p.is_empty() => p,
        _ => return Ok(0),
    };

    line.append_fmt(format_args!(
        "[{:>sw$.sw$}:{:<lw$}]",
        file_stem(path),
        location.line,
        sw = stem_width,
        lw = line_width
    ))
}

/// `[<open>LBL<close>]` using the scheme's pair for `level`.
pub fn fill_level<const N: usize>(
    line: &mut LineBuffer<N>,
    level: SeverityLevel,
    colors: &ColorScheme,
) -> Result<usize, LineBufferError> {
    let pair = colors.for_level(level);
    line.append_fmt(format_args!("[{}{}{}]", pair.open, level.label(), pair.close))
}

/// Separator before the user message.
#[inline]
pub fn fill_separator<const N: usize>(line: &mut LineBuffer<N>) -> Result<usize, LineBufferError> {
    line.append(SEPARATOR)
}
