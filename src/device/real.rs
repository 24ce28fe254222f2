//! hidapi-backed keyboard transport.

use hidapi::{HidApi, HidDevice};
use tracing::{debug, info, instrument, trace};

use super::HidTransport;
use crate::error::{Result, SkError};

/// An open keyboard HID device.
pub struct HidKeyboard {
    inner: HidDevice,
    vendor_id: u16,
    product_id: u16,
}

impl std::fmt::Debug for HidKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidKeyboard")
            .field("vendor_id", &format_args!("{:04x}", self.vendor_id))
            .field("product_id", &format_args!("{:04x}", self.product_id))
            .finish_non_exhaustive()
    }
}

/// Open the first keyboard matching a vendor/product ID.
#[instrument]
pub fn open_keyboard(vendor_id: u16, product_id: u16) -> Result<HidKeyboard> {
    let api = HidApi::new().map_err(|e| SkError::LibraryUnavailable(e.to_string()))?;

    let present = api
        .device_list()
        .any(|dev| dev.vendor_id() == vendor_id && dev.product_id() == product_id);
    if !present {
        return Err(SkError::DeviceNotFound {
            vendor_id,
            product_id,
        });
    }
    debug!("Keyboard is attached");

    let inner = api
        .open(vendor_id, product_id)
        .map_err(|e| SkError::DeviceOpenFailed {
            vendor_id,
            product_id,
            reason: e.to_string(),
        })?;

    info!("Opened keyboard");
    Ok(HidKeyboard {
        inner,
        vendor_id,
        product_id,
    })
}

impl HidTransport for HidKeyboard {
    fn send_feature_report(&self, data: &[u8]) -> Result<usize> {
        trace!(len = data.len(), "Sending feature report");
        self.inner
            .send_feature_report(data)
            .map_err(|e| SkError::Transport(format!("feature report failed: {e}")))?;
        Ok(data.len())
    }

    fn write_output_report(&self, data: &[u8]) -> Result<usize> {
        trace!(len = data.len(), "Writing output report");
        self.inner
            .write(data)
            .map_err(|e| SkError::Transport(format!("output report failed: {e}")))
    }
}
