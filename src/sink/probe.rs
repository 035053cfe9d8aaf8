//! Debug-probe channel over the USB-Serial-JTAG peripheral.
//!
//! The same USB port that carries JTAG also exposes a CDC console, so the
//! probe console needs no extra wiring.

use esp_idf_svc::sys::{self, esp, EspError};

/// TX ring size handed to the IDF driver.
pub const PROBE_TX_BUFFER: u32 = 1024;

/// Ticks to wait for ring space before dropping output.
const WRITE_TIMEOUT_TICKS: u32 = 10;

/// Debug-probe console sink.
pub struct ProbeSink {
    _private: (),
}

impl ProbeSink {
    /// Install the USB-Serial-JTAG driver.
    pub fn new() -> Result<Self, EspError> {
        let mut config = sys::usb_serial_jtag_driver_config_t {
            tx_buffer_size: PROBE_TX_BUFFER,
            rx_buffer_size: 64,
        };
        // SAFETY: config outlives the call, driver copies it
        esp!(unsafe { sys::usb_serial_jtag_driver_install(&mut config) })?;
        Ok(Self { _private: () })
    }
}

impl core::fmt::Write for ProbeSink {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        // SAFETY: pointer and length come from a live &str
        let written = unsafe {
            sys::usb_serial_jtag_write_bytes(
                s.as_ptr() as *const core::ffi::c_void,
                s.len() as _,
                WRITE_TIMEOUT_TICKS,
            )
        };
        if written < 0 || (written as usize) < s.len() {
            Err(core::fmt::Error)
        } else {
            Ok(())
        }
    }
}
