//! # embedded-logging
//!
//! Bounded, allocation-free log lines for debug-probe and serial consoles.
//!
//! ## Architecture
//!
//! ```text
//! log call ──▶ LevelFilter ──▶ TagFormatters ──▶ LineBuffer ──▶ SinkDispatcher
//!              (threshold)     time/loc/level    (fixed cap)    probe / serial
//! ```
//!
//! - One line is composed at a time in a fixed-capacity [`LineBuffer`]
//! - A fragment that does not fit abandons the line; nothing partial is sent
//! - Fatal lines are never filtered and terminate the process once written
//!
//! The engine is single-context: see [`global`] for the shared instance
//! and what its guard does and does not promise.

#![cfg_attr(not(test), no_std)]

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod global;
pub mod hex_dump;
pub mod level;
pub mod line_buffer;
pub mod sink;
pub mod tags;
pub mod time_source;

pub use color::ColorScheme;
pub use config::{AbortPolicy, ComposeMode, EngineConfig, TimeMode};
pub use engine::{LogEngine, Logger, Outcome};
pub use error::LogError;
pub use filter::{should_emit, LevelFilter};
pub use level::SeverityLevel;
pub use line_buffer::{LineBuffer, LineBufferError, LINE_CAPACITY};
pub use sink::{AbortHandler, NullSink, PanicAbort, SinkDispatcher, SinkSet};
pub use tags::Location;
pub use time_source::{ManualClock, NoClock, TimeSource, TimeSourceError};
