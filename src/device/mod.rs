//! Device abstraction layer for HID keyboards.
//!
//! This module provides a trait-based abstraction over the hidapi-backed
//! keyboard and a recording mock, so that everything above the raw report
//! writes can be tested without hardware.

mod dispatcher;
pub mod mock;
mod real;

pub use dispatcher::{Dispatcher, INTER_COMMAND_DELAY, REFRESH_REPORT};
pub use real::{HidKeyboard, open_keyboard};

use crate::error::Result;

/// Raw report writes to an open HID device.
///
/// Both methods return the number of bytes the device accepted. Callers
/// treat anything but the full report length as a failure.
pub trait HidTransport {
    /// Send a feature report. The first byte is the report ID.
    fn send_feature_report(&self, data: &[u8]) -> Result<usize>;

    /// Write an output report. The first byte is the report ID.
    fn write_output_report(&self, data: &[u8]) -> Result<usize>;
}

impl<T: HidTransport + ?Sized> HidTransport for &T {
    fn send_feature_report(&self, data: &[u8]) -> Result<usize> {
        (**self).send_feature_report(data)
    }

    fn write_output_report(&self, data: &[u8]) -> Result<usize> {
        (**self).write_output_report(data)
    }
}
