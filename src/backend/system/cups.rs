use std::{
    ffi::OsStr,
    io::ErrorKind,
    process::Output,
    time::Duration,
};

use log::{
    debug,
    info,
};
use tokio::process::Command;

use super::{
    SpoolFile,
    CLEANUP_GRACE,
    JOB_TITLE,
};
use crate::backend::{
    error::{
        PrintError,
        PrintResult,
    },
    Printer,
};

/// CUPS spooler driven through `lpstat` and `lp`.
#[derive(Debug, Clone)]
pub struct CupsPrinter {
    cleanup_grace: Duration,
}

impl Default for CupsPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl CupsPrinter {
    pub fn new() -> Self {
        Self {
            cleanup_grace: CLEANUP_GRACE,
        }
    }

    pub fn with_cleanup_grace(mut self, cleanup_grace: Duration) -> Self {
        self.cleanup_grace = cleanup_grace;
        self
    }

    /// Explicit name, else the spooler default, else the first destination.
    async fn resolve(&self, name: Option<String>) -> PrintResult<String> {
        if let Some(name) = name {
            return Ok(name);
        }

        if let Some(default) = default_destination(&lpstat(&["-d"]).await?) {
            return Ok(default);
        }

        first_destination(&lpstat(&["-e"]).await?).ok_or(PrintError::NoDefaultPrinter)
    }
}

impl Printer for CupsPrinter {
    type Target = Option<String>;

    async fn print(&self, data: Vec<u8>, target: Option<String>) -> PrintResult<()> {
        let printer = self.resolve(target).await?;
        let spool = SpoolFile::write(data, ".pdf").await?;

        debug!("Submitting {} to CUPS printer {}", spool.path().display(), printer);
        let output = run(
            "lp",
            [
                OsStr::new("-d"),
                OsStr::new(&printer),
                OsStr::new("-t"),
                OsStr::new(JOB_TITLE),
                spool.path().as_os_str(),
            ],
        )
        .await;
        spool.remove_after(self.cleanup_grace);

        let output = output?;
        if !output.status.success() {
            return Err(PrintError::Spooler(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        info!(
            "CUPS accepted job for {}: {}",
            printer,
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }
}

/// Runs a CUPS tool; a missing binary means there is no spooler to talk to.
async fn run<I, S>(program: &str, args: I) -> PrintResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => PrintError::UnsupportedPlatform("printing without CUPS"),
            _ => PrintError::Io(e),
        })
}

async fn lpstat(args: &[&str]) -> PrintResult<String> {
    let output = run("lpstat", args).await?;
    // lpstat exits non-zero when nothing is configured; an empty answer says the same.
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses `lpstat -d`: `system default destination: NAME`.
fn default_destination(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.split_once("system default destination:"))
        .map(|(_, name)| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Parses `lpstat -e`: one destination per line.
fn first_destination(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_system_default() {
        assert_eq!(
            default_destination("system default destination: Brother_HL\n"),
            Some("Brother_HL".to_string())
        );
    }

    #[test]
    fn no_default_configured() {
        assert_eq!(default_destination("no system default destination\n"), None);
        assert_eq!(default_destination(""), None);
    }

    #[test]
    fn first_destination_skips_blank_lines() {
        assert_eq!(
            first_destination("\nOffice_Laser\nReceipts\n"),
            Some("Office_Laser".to_string())
        );
        assert_eq!(first_destination("   \n"), None);
    }

    #[tokio::test]
    async fn missing_cups_tools_are_unsupported() {
        let err = run("ws-printer-no-such-lpstat", ["-d"]).await.unwrap_err();
        assert!(matches!(err, PrintError::UnsupportedPlatform(_)));
    }

    #[tokio::test]
    async fn explicit_name_skips_lookup() {
        let printer = CupsPrinter::new();
        assert_eq!(
            printer.resolve(Some("Receipts".to_string())).await.unwrap(),
            "Receipts"
        );
    }
}
