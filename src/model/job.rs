use std::{
    fmt::Display,
    str::FromStr,
};

use crate::{
    config::MarginLevel,
    error::DispatchError,
};

/// Payload format requested through the action path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    EscPos,
    Pdf,
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Format::EscPos => "escpos",
            Format::Pdf => "pdf",
        };
        write!(f, "{}", str)
    }
}

impl FromStr for Format {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "escpos" => Ok(Format::EscPos),
            "pdf" => Ok(Format::Pdf),
            other => Err(DispatchError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PrinterType {
    /// Printer installed on this machine (spooler or USB)
    System,
    /// Raw socket printer reachable over the network
    Network,
}

impl Display for PrinterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            PrinterType::System => "system",
            PrinterType::Network => "network",
        };
        write!(f, "{}", str)
    }
}

/// Parsed action path of a session, e.g. `/print/pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub verb: String,
    pub format: Option<String>,
}

impl Action {
    pub const PRINT: &'static str = "print";

    /// Parses the request path. The first segment after the leading slash is
    /// the verb and must not be empty.
    pub fn parse(path: &str) -> Result<Self, DispatchError> {
        let mut parts = path.split('/').skip(1);

        let verb = match parts.next() {
            Some(verb) if !verb.is_empty() => verb.to_string(),
            _ => return Err(DispatchError::MalformedAction),
        };
        let format = parts.next().map(str::to_string);

        Ok(Self { verb, format })
    }

    /// Requested format, `escpos` when the path has no format segment.
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("escpos")
    }
}

/// A single print request: what the client asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRequest {
    pub action: Action,
    pub raw_message: Vec<u8>,
}

/// A validated job ready to be routed to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub format: Format,
    pub printer_type: PrinterType,
    pub printer_target: Option<String>,
    pub margin_level: MarginLevel,
    pub payload: Vec<u8>,
}

impl PrintJob {
    /// Target as shown to humans, `default` when none was configured.
    pub fn target_label(&self) -> String {
        self.printer_target
            .clone()
            .unwrap_or_else(|| "default".to_string())
    }
}
