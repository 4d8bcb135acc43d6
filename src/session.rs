use std::{
    net::SocketAddr,
    sync::Arc,
};

use anyhow::Result;
use futures::{
    SinkExt,
    StreamExt,
};
use log::{
    debug,
    info,
    warn,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{
            ErrorResponse,
            Request,
            Response,
        },
        Error as WsError,
        Message,
    },
    WebSocketStream,
};
use uuid::Uuid;

use crate::{
    backend::Printer,
    model::{
        job::{
            Action,
            PrintRequest,
        },
        reply::StatusReply,
        target::{
            NetworkEndpoint,
            UsbDevice,
        },
    },
    router::Router,
};

/// One client connection: the action path from the upgrade request, then any
/// number of archive messages, each routed on its own.
pub struct Session<N, S, U> {
    id: Uuid,
    peer_addr: SocketAddr,
    router: Arc<Router<N, S, U>>,
}

impl<N, S, U> Session<N, S, U>
where
    N: Printer<Target = NetworkEndpoint>,
    S: Printer<Target = Option<String>>,
    U: Printer<Target = UsbDevice>,
{
    pub fn new(peer_addr: SocketAddr, router: Arc<Router<N, S, U>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer_addr,
            router,
        }
    }

    pub async fn process(self, stream: TcpStream) -> Result<()> {
        let mut path = String::new();
        let mut ws = accept_hdr_async(
            stream,
            |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                path = request.uri().path().to_string();
                Ok(response)
            },
        )
        .await?;
        info!(
            "Session {} from {:?} opened with action {}",
            self.id, self.peer_addr, path
        );

        let action = match Action::parse(&path) {
            Ok(action) => action,
            Err(err) => {
                warn!("Session {} rejected: {}", self.id, err);
                reply(&mut ws, StatusReply::from(&err)).await?;
                let _ = ws.close(None).await;
                return Ok(());
            }
        };

        while let Some(message) = ws.next().await {
            let raw_message = match message {
                Ok(Message::Binary(data)) => data.to_vec(),
                Ok(Message::Text(text)) => text.as_bytes().to_vec(),
                Ok(Message::Close(_)) | Err(WsError::ConnectionClosed) => break,
                Ok(_) => continue,
                Err(err) => return Err(err.into()),
            };
            debug!(
                "Session {} received {} bytes",
                self.id,
                raw_message.len()
            );

            let request = PrintRequest {
                action: action.clone(),
                raw_message,
            };
            match self.router.dispatch(request).await {
                Ok(printed) => {
                    if self.router.config().reply_on_success {
                        let message = format!(
                            "Se imprimió usando '{}' en la impresora '{}'",
                            printed.format, printed.printer_type
                        );
                        reply(&mut ws, StatusReply::ok(message)).await?;
                    }
                }
                Err(err) => {
                    warn!("Session {} print failed: {}", self.id, err);
                    reply(&mut ws, StatusReply::from(&err)).await?;
                }
            }
        }

        info!("Session {} from {:?} closed", self.id, self.peer_addr);
        Ok(())
    }
}

async fn reply(ws: &mut WebSocketStream<TcpStream>, reply: StatusReply) -> Result<()> {
    ws.send(Message::text(reply.to_json())).await?;
    Ok(())
}
