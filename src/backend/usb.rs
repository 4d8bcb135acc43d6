//! USB receipt printers.
//!
//! Talks to the device with bulk transfers on the fixed endpoints from
//! [`UsbDevice`]. Requires the `usb` feature; without it every job fails
//! with [`PrintError::UnsupportedPlatform`].

use super::{
    error::PrintResult,
    Printer,
};
use crate::model::target::UsbDevice;

/// Sent after the payload so the last line is flushed out of the printer.
pub const LINE_FEED: &[u8] = b"\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct UsbPrinter;

impl UsbPrinter {
    pub fn new() -> Self {
        Self
    }
}

impl Printer for UsbPrinter {
    type Target = UsbDevice;

    async fn print(&self, data: Vec<u8>, target: UsbDevice) -> PrintResult<()> {
        tokio::task::spawn_blocking(move || device::write(&target, &data)).await?
    }
}

#[cfg(not(feature = "usb"))]
mod device {
    use crate::{
        backend::error::{
            PrintError,
            PrintResult,
        },
        model::target::UsbDevice,
    };

    pub(super) fn write(_target: &UsbDevice, _data: &[u8]) -> PrintResult<()> {
        Err(PrintError::UnsupportedPlatform("USB printing"))
    }
}

#[cfg(feature = "usb")]
mod device {
    use std::time::Duration;

    use log::{
        debug,
        info,
    };
    use rusb::{
        Context,
        DeviceHandle,
        UsbContext,
    };

    use super::LINE_FEED;
    use crate::{
        backend::error::{
            PrintError,
            PrintResult,
        },
        model::target::UsbDevice,
    };

    const INTERFACE: u8 = 0;
    /// Zero means wait as long as the transfer takes.
    const NO_TIMEOUT: Duration = Duration::ZERO;

    pub(super) fn write(target: &UsbDevice, data: &[u8]) -> PrintResult<()> {
        let unavailable = |reason: String| PrintError::DeviceUnavailable {
            device: target.to_string(),
            reason,
        };

        // Unlike the global context, a failed init here is an error, not a panic.
        let context = Context::new().map_err(|e| unavailable(format!("libusb: {}", e)))?;
        let mut handle = context
            .open_device_with_vid_pid(target.vendor_id, target.product_id)
            .ok_or_else(|| unavailable("device not found".to_string()))?;

        // Not every platform can detach kernel drivers; claiming will tell.
        let _ = handle.set_auto_detach_kernel_driver(true);
        handle
            .claim_interface(INTERFACE)
            .map_err(|e| unavailable(format!("claim failed: {}", e)))?;

        let result = bulk_write(&handle, target.out_endpoint, data)
            .and_then(|()| bulk_write(&handle, target.out_endpoint, LINE_FEED))
            .map_err(|e| unavailable(format!("write failed: {}", e)));

        let _ = handle.release_interface(INTERFACE);
        result?;

        info!("Sent {} bytes to USB printer {}", data.len(), target);
        Ok(())
    }

    fn bulk_write(
        handle: &DeviceHandle<Context>,
        endpoint: u8,
        mut data: &[u8],
    ) -> rusb::Result<()> {
        while !data.is_empty() {
            let written = handle.write_bulk(endpoint, data, NO_TIMEOUT)?;
            if written == 0 {
                return Err(rusb::Error::Io);
            }
            debug!("USB bulk write of {} bytes", written);
            data = &data[written..];
        }
        Ok(())
    }
}
