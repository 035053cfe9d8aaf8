//! UART serial channel.
//!
//! Serial output via UART TX, typically into an external USB-UART adapter
//! (CH340, CP2102, etc) or the board's VCOM bridge.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32-S3 GPIO6 (TX) ──────▶ USB-UART RX
//!                              └─▶ PC Serial Monitor
//! ```
//!
//! **WARNING**: GPIO6 conflicts with Octal PSRAM. Only use on Quad flash boards!

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// UART configuration for the serial channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UartSinkConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
    /// Expand `\n` to `\r\n` on the wire.
    pub crlf: bool,
}

impl Default for UartSinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: 6, // GPIO6 - UART TX (Quad flash, GPIO6 free for UART)
            crlf: true,
        }
    }
}

/// Split `text` into wire chunks, turning every `\n` into `\r\n` when
/// `crlf` is set.
pub fn for_each_wire_chunk(text: &str, crlf: bool, mut write: impl FnMut(&[u8])) {
    if !crlf {
        write(text.as_bytes());
        return;
    }

    let mut parts = text.split('\n');
    if let Some(first) = parts.next() {
        if !first.is_empty() {
            write(first.as_bytes());
        }
    }
    for part in parts {
        write(b"\r\n");
        if !part.is_empty() {
            write(part.as_bytes());
        }
    }
}

/// Serial channel backed by a TX-only UART driver.
#[cfg(target_os = "espidf")]
pub struct UartSink<'d> {
    driver: UartTxDriver<'d>,
    crlf: bool,
}

#[cfg(target_os = "espidf")]
impl<'d> UartSink<'d> {
    /// Initialize UART1 TX-only for log output.
    pub fn new(
        uart: impl Peripheral<P = esp_idf_svc::hal::uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        config: &UartSinkConfig,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

        let driver = UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;

        Ok(Self {
            driver,
            crlf: config.crlf,
        })
    }
}

#[cfg(target_os = "espidf")]
impl core::fmt::Write for UartSink<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut failed = false;
        for_each_wire_chunk(s, self.crlf, |bytes| {
            if self.driver.write(bytes).is_err() {
                failed = true;
            }
        });
        if failed {
            Err(core::fmt::Error)
        } else {
            Ok(())
        }
    }
}
