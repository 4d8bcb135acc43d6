use std::fmt::Display;

use crate::model::job::PrinterType;

/// Left inset applied to PDF pages, 0 (none) to 8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MarginLevel(u8);

impl MarginLevel {
    pub const MAX: u8 = 8;

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for MarginLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
            .ok_or_else(|| format!("margin level {} out of range 0..={}", level, Self::MAX))
    }
}

impl Display for MarginLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-wide defaults applied to every request. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub printer_type: PrinterType,
    pub printer_target: Option<String>,
    pub margin_level: MarginLevel,
    /// Send an explicit `status: 0` reply after a successful print.
    pub reply_on_success: bool,
}

impl Config {
    pub fn new(printer_type: PrinterType, printer_target: Option<String>) -> Self {
        Self {
            printer_type,
            printer_target: printer_target.filter(|t| !t.is_empty()),
            margin_level: MarginLevel::default(),
            reply_on_success: false,
        }
    }

    pub fn with_margin_level(mut self, margin_level: MarginLevel) -> Self {
        self.margin_level = margin_level;
        self
    }

    pub fn with_reply_on_success(mut self, reply_on_success: bool) -> Self {
        self.reply_on_success = reply_on_success;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PrinterType::System, None)
    }
}
