use std::{
    net::SocketAddr,
    sync::Arc,
};

use anyhow::Result;
use log::{
    error,
    info,
};
use tokio::net::TcpListener;

use crate::{
    backend::Printer,
    model::target::{
        NetworkEndpoint,
        UsbDevice,
    },
    router::Router,
    session::Session,
};

/// Loopback port the browser side connects to.
pub const DEFAULT_PORT: u16 = 2186;

pub struct Server<N, S, U> {
    listener: TcpListener,
    router: Arc<Router<N, S, U>>,
}

impl<N, S, U> Server<N, S, U>
where
    N: Printer<Target = NetworkEndpoint>,
    S: Printer<Target = Option<String>>,
    U: Printer<Target = UsbDevice>,
{
    pub async fn bind(addr: SocketAddr, router: Router<N, S, U>) -> Result<Self> {
        let listener = TcpListener::bind(&addr).await?;
        info!("Listening for print sessions on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, one task per session.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("failed to accept connection; error = {}", e);
                    continue;
                }
            };

            let session = Session::new(peer_addr, self.router.clone());
            tokio::spawn(async move {
                if let Err(e) = session.process(stream).await {
                    info!("failed to process connection; error = {}", e);
                }
            });
        }
    }
}
