//! Error types for the printer backends

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    /// Target string could not be turned into a printer address
    #[error("invalid printer target: {0}")]
    InvalidTargetFormat(String),

    /// Spooler has neither a default nor any installed printer
    #[error("no printer configured in the system spooler")]
    NoDefaultPrinter,

    /// USB device missing or could not be claimed
    #[error("USB device {device} unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    /// Raw socket printer refused, unresolvable or failed mid-write
    #[error("{endpoint}: {source}")]
    NetworkUnreachable {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// Spooler command ran but rejected the job
    #[error("spooler error: {0}")]
    Spooler(String),

    /// Spool file could not be removed after the job was handed over
    #[error("could not remove spool file {}: {source}", path.display())]
    TempFileCleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not supported on this platform")]
    UnsupportedPlatform(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking backend work panicked or was cancelled
    #[error("backend task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
