use log::{
    debug,
    info,
};
use tokio::{
    io::AsyncWriteExt,
    net::TcpStream,
};

use super::{
    error::{
        PrintError,
        PrintResult,
    },
    Printer,
};
use crate::model::target::NetworkEndpoint;

/// Raw socket printer: connect, dump the bytes, half-close, done.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkPrinter;

impl NetworkPrinter {
    pub fn new() -> Self {
        Self
    }
}

impl Printer for NetworkPrinter {
    type Target = NetworkEndpoint;

    async fn print(&self, data: Vec<u8>, target: NetworkEndpoint) -> PrintResult<()> {
        let unreachable = |source: std::io::Error| PrintError::NetworkUnreachable {
            endpoint: target.to_string(),
            source,
        };

        debug!("Connecting to network printer {}", target);
        let mut stream = TcpStream::connect((target.host.as_str(), target.port))
            .await
            .map_err(unreachable)?;

        stream.write_all(&data).await.map_err(unreachable)?;
        stream.flush().await.map_err(unreachable)?;
        // Half-close so the printer sees EOF on its read side.
        stream.shutdown().await.map_err(unreachable)?;

        info!("Sent {} bytes to network printer {}", data.len(), target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::AsyncReadExt,
        net::TcpListener,
    };

    #[tokio::test]
    async fn sends_full_payload_then_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let printer = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let payload = b"\x1b@hello\n\x1dV\x00".to_vec();
        let target = NetworkEndpoint {
            host: "127.0.0.1".to_string(),
            port,
        };
        NetworkPrinter::new()
            .print(payload.clone(), target)
            .await
            .unwrap();

        assert_eq!(printer.await.unwrap(), payload);
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let target = NetworkEndpoint {
            host: "127.0.0.1".to_string(),
            port,
        };

        let err = NetworkPrinter::new()
            .print(b"data".to_vec(), target)
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::NetworkUnreachable { .. }));
        assert!(err.to_string().starts_with(&format!("127.0.0.1:{}", port)));
    }
}
