//! Windows spooler backend.
//!
//! The shell `print` verb always targets the OS-wide default printer, so the
//! target is made the default for the duration of the submission and the
//! previous default is put back afterwards by [`DefaultPrinterGuard`].
//! Two concurrent jobs can still race on the default printer.

use std::{
    path::Path,
    time::Duration,
};

use log::{
    debug,
    info,
    warn,
};
use windows::{
    core::{
        PCWSTR,
        PWSTR,
    },
    Win32::{
        Graphics::Printing::{
            EnumPrintersW,
            GetDefaultPrinterW,
            SetDefaultPrinterW,
            PRINTER_ENUM_CONNECTIONS,
            PRINTER_ENUM_LOCAL,
            PRINTER_INFO_4W,
        },
        UI::{
            Shell::ShellExecuteW,
            WindowsAndMessaging::SW_HIDE,
        },
    },
};

use super::{
    SpoolFile,
    CLEANUP_GRACE,
};
use crate::backend::{
    error::{
        PrintError,
        PrintResult,
    },
    Printer,
};

/// Time the shell handler gets to hand the file to the spooler.
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct WindowsPrinter {
    settle_delay: Duration,
    cleanup_grace: Duration,
}

impl Default for WindowsPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowsPrinter {
    pub fn new() -> Self {
        Self {
            settle_delay: SETTLE_DELAY,
            cleanup_grace: CLEANUP_GRACE,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_cleanup_grace(mut self, cleanup_grace: Duration) -> Self {
        self.cleanup_grace = cleanup_grace;
        self
    }
}

impl Printer for WindowsPrinter {
    type Target = Option<String>;

    async fn print(&self, data: Vec<u8>, target: Option<String>) -> PrintResult<()> {
        let spool = SpoolFile::write(data, ".pdf").await?;
        let path = spool.path().to_path_buf();
        let settle_delay = self.settle_delay;

        let result =
            tokio::task::spawn_blocking(move || print_file(target, &path, settle_delay)).await;
        spool.remove_after(self.cleanup_grace);

        let printer = result??;
        info!("Windows spooler accepted job for {}", printer);
        Ok(())
    }
}

fn print_file(target: Option<String>, path: &Path, settle_delay: Duration) -> PrintResult<String> {
    let printer = resolve(target)?;
    let _default = DefaultPrinterGuard::set(&printer)?;

    shell_print(path)?;
    std::thread::sleep(settle_delay);

    Ok(printer)
}

/// Explicit name, else the OS default, else the first installed printer.
fn resolve(target: Option<String>) -> PrintResult<String> {
    if let Some(name) = target {
        return Ok(name);
    }
    if let Some(default) = default_printer() {
        return Ok(default);
    }
    list_printers()?
        .into_iter()
        .next()
        .ok_or(PrintError::NoDefaultPrinter)
}

/// Makes a printer the OS default and restores the previous one on drop.
struct DefaultPrinterGuard {
    previous: Option<String>,
}

impl DefaultPrinterGuard {
    fn set(printer: &str) -> PrintResult<Self> {
        let previous = default_printer();
        if previous.as_deref() != Some(printer) {
            set_default_printer(printer)?;
            debug!("Default printer switched to {}", printer);
        }
        Ok(Self { previous })
    }
}

impl Drop for DefaultPrinterGuard {
    fn drop(&mut self) {
        if let Some(previous) = &self.previous {
            match set_default_printer(previous) {
                Ok(()) => debug!("Default printer restored to {}", previous),
                Err(e) => warn!("Failed to restore default printer {}: {}", previous, e),
            }
        }
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn default_printer() -> Option<String> {
    unsafe {
        let mut needed: u32 = 0;
        let _ = GetDefaultPrinterW(None, &mut needed);
        if needed == 0 {
            return None;
        }

        let mut buf: Vec<u16> = vec![0; needed as usize];
        if !GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed).as_bool() {
            return None;
        }

        PWSTR(buf.as_mut_ptr()).to_string().ok()
    }
}

fn set_default_printer(printer: &str) -> PrintResult<()> {
    let name = to_wide(printer);
    let ok = unsafe { SetDefaultPrinterW(PCWSTR::from_raw(name.as_ptr())) };
    if ok.as_bool() {
        Ok(())
    } else {
        Err(PrintError::Spooler(format!(
            "could not make '{}' the default printer: {}",
            printer,
            std::io::Error::last_os_error()
        )))
    }
}

fn list_printers() -> PrintResult<Vec<String>> {
    unsafe {
        let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
        let mut needed: u32 = 0;
        let mut returned: u32 = 0;

        let _ = EnumPrintersW(flags, None, 4, None, &mut needed, &mut returned);
        if needed == 0 {
            return Ok(Vec::new());
        }

        let mut buf = aligned_buffer(needed as usize);
        let bytes = std::slice::from_raw_parts_mut(buf.as_mut_ptr().cast::<u8>(), needed as usize);
        EnumPrintersW(
            flags,
            None,
            4,
            Some(bytes),
            &mut needed,
            &mut returned,
        )
        .map_err(|e| PrintError::Spooler(format!("EnumPrintersW failed: {}", e)))?;

        let ptr = buf.as_ptr().cast::<PRINTER_INFO_4W>();
        let infos = std::slice::from_raw_parts(ptr, returned as usize);

        Ok(infos
            .iter()
            .filter(|info| !info.pPrinterName.is_null())
            .filter_map(|info| info.pPrinterName.to_string().ok())
            .collect())
    }
}

/// Zeroed buffer of at least `len` bytes, aligned for the spooler's structs.
fn aligned_buffer(len: usize) -> Vec<u64> {
    vec![0; len.div_ceil(std::mem::size_of::<u64>())]
}

fn shell_print(path: &Path) -> PrintResult<()> {
    let verb = to_wide("print");
    let file = to_wide(&path.to_string_lossy());

    let instance = unsafe {
        ShellExecuteW(
            None,
            PCWSTR::from_raw(verb.as_ptr()),
            PCWSTR::from_raw(file.as_ptr()),
            PCWSTR::null(),
            PCWSTR::null(),
            SW_HIDE,
        )
    };

    // Values up to 32 are error codes.
    if instance.0 as isize <= 32 {
        return Err(PrintError::Spooler(format!(
            "shell print of {} failed with code {}",
            path.display(),
            instance.0 as isize
        )));
    }
    Ok(())
}
