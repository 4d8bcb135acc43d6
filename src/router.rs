use log::{
    debug,
    info,
};

use crate::{
    archive,
    backend::{
        NetworkPrinter,
        Printer,
        SystemPrinter,
        UsbPrinter,
    },
    config::{
        Config,
        MarginLevel,
    },
    error::DispatchError,
    margin,
    model::{
        job::{
            Action,
            Format,
            PrintJob,
            PrintRequest,
            PrinterType,
        },
        target::{
            NetworkEndpoint,
            PrinterDescriptor,
            UsbDevice,
        },
    },
};

/// What was printed, reported back once a request succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printed {
    pub format: Format,
    pub printer_type: PrinterType,
}

/// Turns print requests into backend calls.
///
/// | type    | escpos      | pdf            |
/// |---------|-------------|----------------|
/// | network | raw socket  | not supported  |
/// | system  | USB printer | spooler        |
pub struct Router<N = NetworkPrinter, S = SystemPrinter, U = UsbPrinter> {
    config: Config,
    network: N,
    system: S,
    usb: U,
}

impl Router {
    pub fn new(config: Config) -> Self {
        Self::with_backends(
            config,
            NetworkPrinter::new(),
            SystemPrinter::new(),
            UsbPrinter::new(),
        )
    }
}

impl<N, S, U> Router<N, S, U>
where
    N: Printer<Target = NetworkEndpoint>,
    S: Printer<Target = Option<String>>,
    U: Printer<Target = UsbDevice>,
{
    pub fn with_backends(config: Config, network: N, system: S, usb: U) -> Self {
        Self {
            config,
            network,
            system,
            usb,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn dispatch(&self, request: PrintRequest) -> Result<Printed, DispatchError> {
        let job = self.prepare(&request.action, &request.raw_message)?;
        let printed = Printed {
            format: job.format,
            printer_type: job.printer_type,
        };

        self.execute(job).await?;

        info!(
            "Printed using '{}' on the '{}' printer",
            printed.format, printed.printer_type
        );
        Ok(printed)
    }

    /// Validates the verb, unpacks the archive and settles the format.
    fn prepare(&self, action: &Action, message: &[u8]) -> Result<PrintJob, DispatchError> {
        if action.verb != Action::PRINT {
            return Err(DispatchError::UnsupportedAction(action.verb.clone()));
        }

        let payload = archive::extract_first(message)?;
        let format = action.format().parse::<Format>()?;
        debug!("Extracted {} bytes of {}", payload.len(), format);

        Ok(PrintJob {
            format,
            printer_type: self.config.printer_type,
            printer_target: self.config.printer_target.clone(),
            margin_level: self.config.margin_level,
            payload,
        })
    }

    /// Picks the backend for the job's format and printer type.
    pub fn resolve(&self, job: &PrintJob) -> Result<PrinterDescriptor, DispatchError> {
        let missing_target = || DispatchError::MissingPrinterTarget {
            printer_type: job.printer_type,
            format: job.format,
        };
        let invalid = |e| DispatchError::print(job.target_label(), e);

        match (job.printer_type, job.format) {
            (PrinterType::Network, Format::EscPos) => {
                let target = job.printer_target.as_deref().ok_or_else(missing_target)?;
                let endpoint = NetworkEndpoint::parse(target).map_err(invalid)?;
                Ok(PrinterDescriptor::NetworkEndpoint(endpoint))
            }
            (PrinterType::Network, Format::Pdf) => Err(DispatchError::UnsupportedCombination {
                printer_type: job.printer_type,
                format: job.format,
            }),
            (PrinterType::System, Format::EscPos) => {
                let target = job.printer_target.as_deref().ok_or_else(missing_target)?;
                let device = UsbDevice::resolve(target).map_err(invalid)?;
                Ok(PrinterDescriptor::UsbDevice(device))
            }
            (PrinterType::System, Format::Pdf) => Ok(PrinterDescriptor::NamedSystemPrinter(
                job.printer_target.clone(),
            )),
        }
    }

    async fn execute(&self, job: PrintJob) -> Result<(), DispatchError> {
        let descriptor = self.resolve(&job)?;
        let target = job.target_label();
        debug!("Dispatching {} job to {:?}", job.format, descriptor);

        let result = match descriptor {
            PrinterDescriptor::NetworkEndpoint(endpoint) => {
                self.network.print(job.payload, endpoint).await
            }
            PrinterDescriptor::UsbDevice(device) => self.usb.print(job.payload, device).await,
            PrinterDescriptor::NamedSystemPrinter(name) => {
                let payload = shift_margin(job.payload, job.margin_level).await?;
                self.system.print(payload, name).await
            }
        };

        result.map_err(|e| DispatchError::print(target, e))
    }
}

/// Runs the margin transform off the async workers; PDFs can be large.
async fn shift_margin(
    pdf: Vec<u8>,
    level: MarginLevel,
) -> Result<Vec<u8>, DispatchError> {
    if level.is_zero() {
        return Ok(pdf);
    }

    tokio::task::spawn_blocking(move || margin::apply(pdf, level))
        .await
        .map_err(|e| DispatchError::Document(e.to_string()))?
        .map_err(|e| DispatchError::Document(e.to_string()))
}
