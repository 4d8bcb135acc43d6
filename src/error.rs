//! Request level failures. `Display` is the message sent back to the client.

use thiserror::Error;

use crate::{
    backend::error::PrintError,
    model::job::{
        Format,
        PrinterType,
    },
};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Falta indicar la acción que se está solicitando realizar")]
    MalformedAction,

    #[error("Acción {0} no soportada")]
    UnsupportedAction(String),

    #[error("No fue posible obtener el archivo para imprimir ({0})")]
    MalformedArchive(String),

    #[error("Formato {0} no soportado")]
    UnsupportedFormat(String),

    #[error("Tipo de impresora {printer_type} no soportada con formato {format}")]
    UnsupportedCombination {
        printer_type: PrinterType,
        format: Format,
    },

    #[error("Falta indicar la impresora {printer_type} a usar con formato {format}")]
    MissingPrinterTarget {
        printer_type: PrinterType,
        format: Format,
    },

    #[error("No fue posible preparar el PDF para imprimir ({0})")]
    Document(String),

    #[error("No fue posible imprimir en {target} ({source})")]
    Print {
        target: String,
        #[source]
        source: PrintError,
    },
}

impl DispatchError {
    pub fn print(target: impl Into<String>, source: PrintError) -> Self {
        DispatchError::Print {
            target: target.into(),
            source,
        }
    }
}
