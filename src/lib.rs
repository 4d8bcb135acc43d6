//! Local print daemon: receives zipped print jobs over a WebSocket and hands
//! them to a network, spooler or USB printer.

pub mod archive;
pub mod backend;
pub mod config;
pub mod error;
pub mod margin;
pub mod model;
pub mod router;
pub mod server;
pub mod session;

pub use config::{
    Config,
    MarginLevel,
};
pub use error::DispatchError;
pub use router::Router;
pub use server::Server;
