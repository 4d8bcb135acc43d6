use std::fmt::Display;

use crate::backend::error::{
    PrintError,
    PrintResult,
};

/// Raw socket port used when the target has no explicit port.
pub const DEFAULT_NETWORK_PORT: u16 = 9100;

/// Bulk endpoints shared by every supported receipt printer.
pub const USB_OUT_ENDPOINT: u8 = 0x01;
pub const USB_IN_ENDPOINT: u8 = 0x82;

/// Known USB receipt printers, lowercase model name to (idVendor, idProduct).
pub const KNOWN_MODELS: &[(&str, u16, u16)] = &[
    ("tm-t20", 0x04b8, 0x0e03),
    ("tm-t20ii", 0x04b8, 0x0e15),
    ("tm-t20iii", 0x04b8, 0x0e28),
    ("tm-t88v", 0x04b8, 0x0202),
];

/// Where a job ends up once the target string has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterDescriptor {
    /// Spooler printer; `None` means the spooler's default.
    NamedSystemPrinter(Option<String>),
    NetworkEndpoint(NetworkEndpoint),
    UsbDevice(UsbDevice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEndpoint {
    pub host: String,
    pub port: u16,
}

impl NetworkEndpoint {
    /// Parses `host` or `host:port`.
    pub fn parse(target: &str) -> PrintResult<Self> {
        let (host, port) = match target.split_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    PrintError::InvalidTargetFormat(format!("invalid port in '{}'", target))
                })?;
                (host, port)
            }
            None => (target, DEFAULT_NETWORK_PORT),
        };

        if host.is_empty() {
            return Err(PrintError::InvalidTargetFormat(format!(
                "missing host in '{}'",
                target
            )));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl Display for NetworkEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbDevice {
    pub vendor_id: u16,
    pub product_id: u16,
    pub in_endpoint: u8,
    pub out_endpoint: u8,
}

impl UsbDevice {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            in_endpoint: USB_IN_ENDPOINT,
            out_endpoint: USB_OUT_ENDPOINT,
        }
    }

    /// Resolves either a literal `vendor:product` hex pair or a known model name.
    pub fn resolve(target: &str) -> PrintResult<Self> {
        if let Some((vendor, product)) = target.split_once(':') {
            let parse = |id: &str| {
                u16::from_str_radix(id.trim(), 16).map_err(|_| {
                    PrintError::InvalidTargetFormat(format!(
                        "'{}' is not a vendorId:productId pair",
                        target
                    ))
                })
            };
            return Ok(Self::new(parse(vendor)?, parse(product)?));
        }

        let name = target.to_lowercase();
        KNOWN_MODELS
            .iter()
            .find(|(model, _, _)| *model == name)
            .map(|(_, vendor, product)| Self::new(*vendor, *product))
            .ok_or_else(|| {
                PrintError::InvalidTargetFormat(format!("unknown printer model '{}'", target))
            })
    }
}

impl Display for UsbDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}
