//! System spooler backend.
//!
//! The concrete implementation is picked at compile time: CUPS command line
//! tools on Unix, the Win32 spooler on Windows, and a stub reporting
//! [`PrintError::UnsupportedPlatform`] elsewhere.

use std::{
    path::Path,
    time::{
        Duration,
        SystemTime,
        UNIX_EPOCH,
    },
};

use log::{
    debug,
    warn,
};
use tempfile::TempPath;

use super::error::{
    PrintError,
    PrintResult,
};

#[cfg(unix)]
mod cups;
#[cfg(windows)]
mod win32;

#[cfg(unix)]
pub use self::cups::CupsPrinter as SystemPrinter;
#[cfg(windows)]
pub use self::win32::WindowsPrinter as SystemPrinter;
#[cfg(not(any(unix, windows)))]
pub use self::unsupported::UnsupportedPrinter as SystemPrinter;

/// Job name shown in the spooler queue.
pub const JOB_TITLE: &str = "WebSocketd Printer";

/// Time the spooler gets to read a spool file before it is removed.
pub const CLEANUP_GRACE: Duration = Duration::from_secs(6);

/// Payload written to disk for spoolers that only accept a file path.
#[derive(Debug)]
pub struct SpoolFile {
    path: TempPath,
}

impl SpoolFile {
    /// Writes `data` to a fresh file named after the submission time.
    pub async fn write(data: Vec<u8>, suffix: &'static str) -> PrintResult<Self> {
        let path = tokio::task::spawn_blocking(move || -> PrintResult<TempPath> {
            use std::io::Write;

            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default();
            let mut file = tempfile::Builder::new()
                .prefix(&format!("ws-printer-{}-", millis))
                .suffix(suffix)
                .tempfile()?;
            file.write_all(&data)?;
            file.flush()?;
            Ok(file.into_temp_path())
        })
        .await??;

        debug!("Wrote spool file {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file once `grace` has elapsed, without blocking the caller.
    /// A failed removal is logged and never fails the print.
    pub fn remove_after(self, grace: Duration) {
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if let Err(err) = self.remove() {
                warn!("{}", err);
            }
        });
    }

    fn remove(self) -> PrintResult<()> {
        let path = self.path.to_path_buf();
        self.path
            .close()
            .map_err(|source| PrintError::TempFileCleanupFailed { path, source })
    }
}

#[cfg(not(any(unix, windows)))]
mod unsupported {
    use super::super::{
        error::{
            PrintError,
            PrintResult,
        },
        Printer,
    };

    #[derive(Debug, Clone, Default)]
    pub struct UnsupportedPrinter;

    impl UnsupportedPrinter {
        pub fn new() -> Self {
            Self
        }
    }

    impl Printer for UnsupportedPrinter {
        type Target = Option<String>;

        async fn print(&self, _data: Vec<u8>, _target: Option<String>) -> PrintResult<()> {
            Err(PrintError::UnsupportedPlatform("system printing"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spool_file_holds_payload_and_is_removed() {
        let spool = SpoolFile::write(b"%PDF-1.4 test".to_vec(), ".pdf")
            .await
            .unwrap();
        let path = spool.path().to_path_buf();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("ws-printer-"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 test");

        spool.remove().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn delayed_removal_runs_in_background() {
        let spool = SpoolFile::write(b"data".to_vec(), ".bin").await.unwrap();
        let path = spool.path().to_path_buf();

        spool.remove_after(Duration::from_millis(10));
        assert!(path.exists());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn cleanup_failure_is_reported() {
        let spool = SpoolFile::write(b"data".to_vec(), ".bin").await.unwrap();
        std::fs::remove_file(spool.path()).unwrap();

        assert!(matches!(
            spool.remove(),
            Err(PrintError::TempFileCleanupFailed { .. })
        ));
    }
}
