//! Log engine tests: filtering, composition, dispatch, abort policy

use std::fmt::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};

use embedded_logging::config::{AbortPolicy, ComposeMode, EngineConfig, TimeMode};
use embedded_logging::hex_dump::format_hex_dump;
use embedded_logging::{
    ColorScheme, LineBuffer, Location, LogEngine, LogError, ManualClock, NoClock, Outcome,
    PanicAbort, SeverityLevel, SinkSet,
};
use time::{Date, Month, PrimitiveDateTime, Time};

const HEADER: &str = "[RT-0:00:01:05][    driver:42   ]";

fn config() -> EngineConfig {
    EngineConfig::new()
        .with_colors(ColorScheme::PLAIN)
        .with_sinks(SinkSet::SERIAL)
}

fn here() -> Location<'static> {
    Location::new("/a/b/c/driver.c", 42)
}

fn engine<'a, const N: usize>(
    config: EngineConfig,
    serial: &'a mut String,
) -> LogEngine<TestOutput, &'a mut String, ManualClock, PanicAbort, N> {
    LogEngine::new(config, TestOutput::new(), serial, ManualClock::running(65), PanicAbort)
}

// Test output recording each write separately
struct TestOutput {
    writes: Vec<String>,
}

impl TestOutput {
    fn new() -> Self {
        Self { writes: Vec::new() }
    }

    fn text(&self) -> String {
        self.writes.concat()
    }
}

impl Write for TestOutput {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.writes.push(s.to_string());
        Ok(())
    }
}

#[test]
fn test_threshold_scenario() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);

    e.set_threshold(SeverityLevel::Warning);
    assert_eq!(
        e.log(SeverityLevel::Debug, &here(), format_args!("hidden\n")),
        Ok(Outcome::FilteredOut)
    );
    assert_eq!(
        e.log(SeverityLevel::Error, &here(), format_args!("boom {}\n", 7)),
        Ok(Outcome::Emitted)
    );
    drop(e);

    assert_eq!(serial, format!("{}[ERR]: boom 7\n", HEADER));
}

#[test]
fn test_initialize_prints_banner_and_clamps() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);

    assert_eq!(e.initialize(99), Ok(()));
    assert_eq!(e.threshold(), SeverityLevel::Verbose);
    drop(e);

    assert!(serial.starts_with("embedded-logging v"));
    assert!(serial.ends_with("boot, threshold VER\n"));
}

#[test]
fn test_initialize_with_dead_clock_skips_banner() {
    let mut serial = String::new();
    let clock = ManualClock {
        init_fails: true,
        ..ManualClock::running(0)
    };
    let mut e: LogEngine<TestOutput, &mut String, ManualClock, PanicAbort> =
        LogEngine::new(config(), TestOutput::new(), &mut serial, clock, PanicAbort);

    assert_eq!(
        e.initialize(SeverityLevel::Debug.into()),
        Err(LogError::TimeSourceUnavailable)
    );
    assert_eq!(e.threshold(), SeverityLevel::Debug);
    drop(e);

    assert!(serial.is_empty());
}

#[test]
fn test_time_failure_dispatches_nothing() {
    let mut serial = String::new();
    let mut e: LogEngine<TestOutput, &mut String, NoClock, PanicAbort> =
        LogEngine::new(config(), TestOutput::new(), &mut serial, NoClock, PanicAbort);

    assert_eq!(
        e.log(SeverityLevel::Warning, &here(), format_args!("lost\n")),
        Err(LogError::TimeSourceUnavailable)
    );
    assert!(e.line().is_empty());
    drop(e);

    assert!(serial.is_empty());
}

#[test]
fn test_no_time_and_no_location() {
    let mut serial = String::new();
    let cfg = config().with_time_mode(TimeMode::Off).with_location(false);
    let mut e: LogEngine<TestOutput, &mut String, NoClock, PanicAbort> =
        LogEngine::new(cfg, TestOutput::new(), &mut serial, NoClock, PanicAbort);

    e.log(SeverityLevel::ImportantInfo, &here(), format_args!("up\n")).unwrap();
    drop(e);

    assert_eq!(serial, "[IPM]: up\n");
}

#[test]
fn test_missing_location_is_skipped() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);

    e.log(SeverityLevel::Debug, &Location::none(), format_args!("x\n")).unwrap();
    drop(e);

    assert_eq!(serial, "[RT-0:00:01:05][DBG]: x\n");
}

#[test]
fn test_calendar_timestamp() {
    let mut serial = String::new();
    let at = PrimitiveDateTime::new(
        Date::from_calendar_date(2020, Month::August, 10).unwrap(),
        Time::from_hms(9, 5, 0).unwrap(),
    );
    let cfg = config().with_time_mode(TimeMode::Calendar).with_location(false);
    let mut e: LogEngine<TestOutput, &mut String, ManualClock, PanicAbort> =
        LogEngine::new(cfg, TestOutput::new(), &mut serial, ManualClock::at(at), PanicAbort);

    e.log(SeverityLevel::DebugHighlight, &here(), format_args!("hi\n")).unwrap();
    drop(e);

    assert_eq!(serial, "[2020-08-10 09:05:00][DHL]: hi\n");
}

#[test]
fn test_message_is_cut_to_capacity() {
    let mut serial = String::new();
    // header 33 + level 5 + separator 2 = 40, 8 bytes left
    let mut e = engine::<48>(config(), &mut serial);

    assert_eq!(
        e.log(SeverityLevel::Error, &here(), format_args!("0123456789")),
        Ok(Outcome::Emitted)
    );
    drop(e);

    assert_eq!(serial, format!("{}[ERR]: 01234567", HEADER));
    assert_eq!(serial.len(), 48);
}

#[test]
fn test_header_overflow_abandons_line() {
    let mut serial = String::new();
    let mut e = engine::<32>(config(), &mut serial);

    assert_eq!(
        e.log(SeverityLevel::Error, &here(), format_args!("never")),
        Err(LogError::CompositionTruncated)
    );
    drop(e);

    assert!(serial.is_empty());
}

#[test]
fn test_fatal_ignores_threshold_and_terminates() {
    let mut serial = String::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut e = engine::<1024>(config(), &mut serial);
        e.set_threshold(SeverityLevel::Fatal);
        let _ = e.log(SeverityLevel::Fatal, &here(), format_args!("dead\n"));
    }));

    assert!(result.is_err(), "fatal line must terminate");
    assert_eq!(serial, format!("{}[FTL]: dead\n", HEADER));
}

#[test]
fn test_fatal_at_widest_threshold_terminates() {
    let mut serial = String::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut e = engine::<1024>(config(), &mut serial);
        e.set_threshold(SeverityLevel::Verbose);
        let _ = e.log(SeverityLevel::Fatal, &here(), format_args!("dead\n"));
    }));

    assert!(result.is_err());
    assert!(serial.contains("[FTL]: dead"));
}

#[test]
fn test_fatal_terminates_even_when_line_is_lost() {
    let mut serial = String::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut e: LogEngine<TestOutput, &mut String, NoClock, PanicAbort> =
            LogEngine::new(config(), TestOutput::new(), &mut serial, NoClock, PanicAbort);
        let _ = e.log(SeverityLevel::Fatal, &here(), format_args!("dead\n"));
    }));

    assert!(result.is_err());
    assert!(serial.is_empty());
}

#[test]
fn test_error_abort_policy() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);
    assert!(e.log(SeverityLevel::Error, &here(), format_args!("ok\n")).is_ok());
    drop(e);

    let mut serial = String::new();
    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut e = engine::<1024>(config().with_abort_on_error(true), &mut serial);
        let _ = e.log(SeverityLevel::Error, &here(), format_args!("bad\n"));
    }));
    assert!(result.is_err());
    assert!(serial.contains("[ERR]: bad"));
}

#[test]
fn test_plain_and_newline_bypass_filter() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);
    e.set_threshold(SeverityLevel::Fatal);

    e.log_plain(format_args!("raw {}", "text"));
    e.newline();
    drop(e);

    assert_eq!(serial, "raw text\n");
}

#[test]
fn test_hex_dump_dispatch() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);
    let bytes: Vec<u8> = (0..16).collect();

    e.hex_dump(&bytes, 8, false).unwrap();
    drop(e);

    assert_eq!(
        serial,
        "00 01 02 03 04 05 06 07\n08 09 0A 0B 0C 0D 0E 0F\n\n"
    );
}

#[test]
fn test_hex_dump_presets() {
    let bytes: Vec<u8> = (0..64).collect();

    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);
    e.hex_dump_32(&bytes).unwrap();
    drop(e);
    assert_eq!(serial.lines().filter(|l| !l.is_empty()).count(), 2);

    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);
    e.hex_dump_8(&bytes).unwrap();
    drop(e);
    assert_eq!(serial.lines().filter(|l| !l.is_empty()).count(), 8);
}

#[test]
fn test_hex_dump_too_long_for_buffer() {
    let mut serial = String::new();
    let mut e = engine::<64>(config(), &mut serial);
    let bytes = [0x5Au8; 30];

    assert_eq!(e.hex_dump(&bytes, 16, false), Err(LogError::CompositionTruncated));
    drop(e);

    assert!(serial.is_empty());
}

#[test]
fn test_stream_mode_writes_header_then_message() {
    let cfg = config()
        .with_sinks(SinkSet::DEBUG_PROBE)
        .with_compose(ComposeMode::Stream);
    let mut serial = String::new();
    let mut e = engine::<1024>(cfg, &mut serial);

    e.log(SeverityLevel::Warning, &here(), format_args!("hot\n")).unwrap();

    let probe = e.sinks().probe();
    assert_eq!(probe.text(), format!("{}[WRN]: hot\n", HEADER));
    assert_eq!(probe.writes, [format!("{}[WRN]: ", HEADER), "hot\n".to_string()]);
}

#[test]
fn test_stream_mode_header_overflow_sends_nothing() {
    let cfg = config().with_compose(ComposeMode::Stream);
    let mut serial = String::new();
    // Timestamp fits, location does not
    let mut e = engine::<16>(cfg, &mut serial);

    assert_eq!(
        e.log(SeverityLevel::Error, &Location::new("/a/driver.c", 42), format_args!("x\n")),
        Err(LogError::CompositionTruncated)
    );
    assert!(e.line().is_empty());
    drop(e);

    assert!(serial.is_empty());
}

#[test]
fn test_stream_mode_wide_stem_sends_nothing() {
    let cfg = config()
        .with_compose(ComposeMode::Stream)
        .with_stem_width(200);
    let mut serial = String::new();
    let mut e = engine::<128>(cfg, &mut serial);

    assert_eq!(
        e.log(SeverityLevel::Warning, &here(), format_args!("x\n")),
        Err(LogError::CompositionTruncated)
    );
    drop(e);

    assert!(serial.is_empty());
}

#[test]
fn test_stream_mode_message_gets_full_capacity() {
    let cfg = config().with_compose(ComposeMode::Stream);
    let mut serial = String::new();
    // Header alone is 40 bytes; the message still gets all 48
    let mut e = engine::<48>(cfg, &mut serial);
    let message = "m".repeat(48);

    e.log(SeverityLevel::Error, &here(), format_args!("{}", message)).unwrap();
    drop(e);

    assert_eq!(serial, format!("{}[ERR]: {}", HEADER, message));
}

#[test]
fn test_accumulate_mode_writes_once() {
    let cfg = config().with_sinks(SinkSet::DEBUG_PROBE);
    let mut serial = String::new();
    let mut e = engine::<1024>(cfg, &mut serial);

    e.log(SeverityLevel::Warning, &here(), format_args!("hot\n")).unwrap();

    assert_eq!(e.sinks().probe().writes.len(), 1);
}

#[test]
fn test_stream_mode_hex_dump_has_no_length_limit() {
    let cfg = config()
        .with_sinks(SinkSet::DEBUG_PROBE)
        .with_compose(ComposeMode::Stream);
    let mut serial = String::new();
    let mut e = engine::<64>(cfg, &mut serial);
    let bytes = [0x5Au8; 30];

    assert_eq!(e.hex_dump(&bytes, 16, false), Ok(()));

    let text = e.sinks().probe().text();
    assert_eq!(text.matches("5A").count(), 30);
    assert!(text.ends_with("\n"));
}

#[test]
fn test_both_sinks_get_same_line() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config().with_sinks(SinkSet::BOTH), &mut serial);

    e.log(SeverityLevel::Debug, &here(), format_args!("twice\n")).unwrap();
    let (probe, _) = e.into_sinks();

    assert_eq!(probe.text(), serial);
    assert!(serial.ends_with("[DBG]: twice\n"));
}

#[test]
fn test_no_sinks_selected() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config().with_sinks(SinkSet::empty()), &mut serial);

    assert_eq!(
        e.log(SeverityLevel::Error, &here(), format_args!("void\n")),
        Ok(Outcome::Emitted)
    );
    assert!(e.sinks().probe().writes.is_empty());
    drop(e);
    assert!(serial.is_empty());
}

#[test]
fn test_colored_level_tag() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config().with_colors(ColorScheme::RTT), &mut serial);

    e.log(SeverityLevel::Error, &here(), format_args!("red\n")).unwrap();
    drop(e);

    assert!(serial.contains("[\x1B[1;31mERR\x1B[0m]: red\n"));
}

#[test]
fn test_demo_output() {
    let mut serial = String::new();
    let mut e = engine::<1024>(config(), &mut serial);

    e.demo();
    drop(e);

    for label in ["[ERR]", "[WRN]", "[IPM]", "[DHL]", "[DBG]", "[VER]"] {
        assert!(serial.contains(label), "missing {}", label);
    }
    assert!(!serial.contains("[FTL]"));
    assert!(serial.contains("Hex Dump with 32-byte alignment"));
    // 139-byte ramp, dumped three times
    assert_eq!(serial.matches("8A").count(), 3);
}

#[test]
fn test_config_widths_and_min_level() {
    let cfg = config()
        .with_stem_width(4)
        .with_line_width(2)
        .with_min_level(SeverityLevel::Warning);
    let mut serial = String::new();
    let mut e = engine::<1024>(cfg, &mut serial);
    assert_eq!(e.threshold(), SeverityLevel::Warning);

    e.log(SeverityLevel::Warning, &here(), format_args!("w\n")).unwrap();
    e.log(SeverityLevel::Debug, &here(), format_args!("d\n")).unwrap();
    drop(e);

    assert_eq!(serial, "[RT-0:00:01:05][driv:42][WRN]: w\n");
}

#[test]
fn test_run_time_advances() {
    let mut clock = ManualClock::running(59);
    clock.tick(3_600);
    let cfg = config().with_location(false);
    let mut serial = String::new();
    let mut e: LogEngine<TestOutput, &mut String, &mut ManualClock, PanicAbort> =
        LogEngine::new(cfg, TestOutput::new(), &mut serial, &mut clock, PanicAbort);

    e.log(SeverityLevel::Verbose, &here(), format_args!("t\n")).unwrap();
    drop(e);

    assert_eq!(serial, "[RT-0:01:00:59][VER]: t\n");
}

#[test]
fn test_error_codes() {
    assert_eq!(LogError::CompositionTruncated.code(), -1);
    assert_eq!(LogError::TimeSourceUnavailable.code(), -2);
    assert_eq!(LogError::Busy.code(), -3);
    assert_eq!(LogError::NotInstalled.code(), -4);
    assert_eq!(
        LogError::CompositionTruncated.to_string(),
        "E-1: line truncated, nothing dispatched"
    );
}

#[test]
fn test_hex_dump_matches_formatter() {
    let bytes: Vec<u8> = (0..40).collect();
    let mut expected = LineBuffer::<1024>::new();
    format_hex_dump(&mut expected, &bytes, 12, true).unwrap();

    for compose in [ComposeMode::Accumulate, ComposeMode::Stream] {
        let mut serial = String::new();
        let mut e = engine::<1024>(config().with_compose(compose), &mut serial);
        e.hex_dump(&bytes, 12, true).unwrap();
        drop(e);

        assert_eq!(serial, format!("{}\n", expected.as_str()), "{:?}", compose);
    }
}

#[test]
fn test_abort_policy_default() {
    let cfg = EngineConfig::new();
    assert_eq!(cfg.abort, AbortPolicy::default());
    assert!(!cfg.abort.on_error);
    assert!(config().with_abort_on_error(true).abort.on_error);
}
