//! embedded-logging - demo entry point
//!
//! On the board: serial on UART1/GPIO6 plus the USB-Serial-JTAG probe
//! console, run-time timestamps, then the level and hex-dump demo through
//! the process-wide logger.
//!
//! On the host: the same demo with stdout as the serial channel.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

use embedded_logging::{EngineConfig, LogEngine, SeverityLevel, SinkSet, TimeMode};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys as esp_idf_sys;

#[cfg(target_os = "espidf")]
use embedded_logging::{
    global,
    sink::{probe::ProbeSink, uart::{UartSink, UartSinkConfig}, EspAbort},
    time_source::EspClock,
};

#[cfg(target_os = "espidf")]
type BoardEngine = LogEngine<ProbeSink, UartSink<'static>, EspClock, EspAbort>;

// Static allocation: the installed logger must live for the whole process.
#[cfg(target_os = "espidf")]
static mut ENGINE: Option<BoardEngine> = None;

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    // Initialize ESP-IDF
    esp_idf_sys::link_patches();

    let peripherals = match esp_idf_svc::hal::peripherals::Peripherals::take() {
        Ok(p) => p,
        Err(_) => return,
    };

    let serial = match UartSink::new(
        peripherals.uart1,
        peripherals.pins.gpio6,
        &UartSinkConfig::default(),
    ) {
        Ok(s) => s,
        Err(_) => return,
    };
    let probe = match ProbeSink::new() {
        Ok(p) => p,
        Err(_) => return,
    };

    let config = EngineConfig::new()
        .with_sinks(SinkSet::BOTH)
        .with_time_mode(TimeMode::RunTime);

    // SAFETY: written once here, before anything else can log
    let engine = unsafe {
        (*core::ptr::addr_of_mut!(ENGINE)).insert(BoardEngine::new(
            config, probe, serial, EspClock, EspAbort,
        ))
    };

    if engine.initialize(SeverityLevel::Verbose.into()).is_err() {
        return;
    }
    engine.demo();

    if global::install(engine).is_err() {
        return;
    }
    let _ = global::init_log_facade();

    embedded_logging::log_info!(
        "{} ({}) console ready\n",
        embedded_logging::engine::VERSION,
        embedded_logging::engine::BUILD_PROFILE
    );
    log::debug!("log facade routed");

    loop {
        unsafe {
            esp_idf_sys::vTaskDelay(1000);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
struct Stdout;

#[cfg(not(target_os = "espidf"))]
impl core::fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        use std::io::Write;
        std::io::stdout()
            .write_all(s.as_bytes())
            .map_err(|_| core::fmt::Error)
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use embedded_logging::{ColorScheme, ManualClock, NullSink, PanicAbort};

    let config = EngineConfig::new()
        .with_sinks(SinkSet::SERIAL)
        .with_time_mode(TimeMode::RunTime)
        .with_colors(ColorScheme::PLAIN);

    // 1 day, 2 h, 3 min, 4 s of fake uptime
    let clock = ManualClock::running(93_784);
    let mut engine: LogEngine<NullSink, Stdout, ManualClock, PanicAbort> =
        LogEngine::new(config, NullSink, Stdout, clock, PanicAbort);

    if let Err(e) = engine.initialize(SeverityLevel::Verbose.into()) {
        eprintln!("logger init failed: {}", e);
        return;
    }

    engine.demo();
    engine.log_plain(format_args!("plain line, no tags\n"));
    engine.newline();

    if std::env::args().any(|a| a == "--fatal") {
        let here = embedded_logging::Location::caller();
        let _ = engine.log(
            SeverityLevel::Fatal,
            &here,
            format_args!("This is a  fatal message\n"),
        );
    }
}
