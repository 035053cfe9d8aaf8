//! Colour/control escape pairs for severity tags and the boot banner.
//!
//! The codes are the SEGGER RTT terminal controls, which are plain ANSI
//! SGR sequences and render the same on a serial terminal.

use crate::level::SeverityLevel;

/// Reset all attributes.
pub const CTRL_RESET: &str = "\x1B[0m";
pub const CTRL_TEXT_BRIGHT_RED: &str = "\x1B[1;31m";
pub const CTRL_TEXT_BRIGHT_GREEN: &str = "\x1B[1;32m";
pub const CTRL_TEXT_BRIGHT_YELLOW: &str = "\x1B[1;33m";
pub const CTRL_BG_BRIGHT_RED: &str = "\x1B[4;41m";
pub const CTRL_BG_BRIGHT_BLUE: &str = "\x1B[4;44m";
pub const CTRL_BG_BRIGHT_MAGENTA: &str = "\x1B[4;45m";
pub const CTRL_BG_BRIGHT_CYAN: &str = "\x1B[4;46m";

/// Opening and closing control sequence around a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapePair {
    pub open: &'static str,
    pub close: &'static str,
}

impl EscapePair {
    /// No decoration.
    pub const NONE: EscapePair = EscapePair { open: "", close: "" };

    const fn colored(open: &'static str) -> Self {
        Self { open, close: CTRL_RESET }
    }
}

/// Active colour-definition set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    /// One pair per level, indexed by `SeverityLevel as usize`.
    pub levels: [EscapePair; 7],
    /// Wraps the boot banner.
    pub banner: EscapePair,
}

impl ColorScheme {
    /// RTT terminal colours. Verbose stays undecorated.
    pub const RTT: ColorScheme = ColorScheme {
        levels: [
            EscapePair::colored(CTRL_BG_BRIGHT_RED),
            EscapePair::colored(CTRL_TEXT_BRIGHT_RED),
            EscapePair::colored(CTRL_BG_BRIGHT_MAGENTA),
            EscapePair::colored(CTRL_BG_BRIGHT_CYAN),
            EscapePair::colored(CTRL_TEXT_BRIGHT_YELLOW),
            EscapePair::colored(CTRL_TEXT_BRIGHT_GREEN),
            EscapePair::NONE,
        ],
        banner: EscapePair::colored(CTRL_BG_BRIGHT_BLUE),
    };

    /// No escapes at all, for log capture and dumb terminals.
    pub const PLAIN: ColorScheme = ColorScheme {
        levels: [EscapePair::NONE; 7],
        banner: EscapePair::NONE,
    };

    /// Pair used for `level`.
    #[inline]
    pub fn for_level(&self, level: SeverityLevel) -> EscapePair {
        self.levels[level as usize]
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::RTT
    }
}
