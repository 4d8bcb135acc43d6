//! Printer backends
//!
//! - [`network::NetworkPrinter`]: raw socket printers (port 9100)
//! - [`system::SystemPrinter`]: the OS print spooler (CUPS or Windows)
//! - [`usb::UsbPrinter`]: directly attached USB receipt printers
//!
//! Backends that wrap blocking OS calls run them on the blocking pool so a
//! slow spooler or device never stalls other sessions.

use std::{
    fmt::Debug,
    future::Future,
};

use self::error::PrintResult;

pub mod error;
pub mod network;
pub mod system;
pub mod usb;

pub use network::NetworkPrinter;
pub use system::SystemPrinter;
pub use usb::UsbPrinter;

/// Capability every backend provides: push bytes to a resolved target.
pub trait Printer: Send + Sync + 'static {
    /// Resolved address this backend prints to.
    type Target: Debug + Send + 'static;

    fn print(
        &self,
        data: Vec<u8>,
        target: Self::Target,
    ) -> impl Future<Output = PrintResult<()>> + Send;
}
