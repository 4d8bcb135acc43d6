#![allow(dead_code)]

use std::{
    io::{
        Cursor,
        Write,
    },
    net::SocketAddr,
    time::Duration,
};

use futures::{
    SinkExt,
    StreamExt,
};
use tokio::{
    io::AsyncReadExt,
    net::{
        TcpListener,
        TcpStream,
    },
    task::JoinHandle,
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::Message,
    MaybeTlsStream,
    WebSocketStream,
};
use ws_printer::{
    model::reply::StatusReply,
    Config,
    Router,
    Server,
};
use zip::{
    write::SimpleFileOptions,
    ZipWriter,
};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub fn archive(name: &str, data: &[u8]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file(name, SimpleFileOptions::default()).unwrap();
    zip.write_all(data).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Starts a daemon with the real backends on an ephemeral port.
pub async fn start(config: Config) -> SocketAddr {
    let server = Server::bind("127.0.0.1:0".parse().unwrap(), Router::new(config))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

pub async fn connect(addr: SocketAddr, path: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{}{}", addr, path))
        .await
        .unwrap();
    ws
}

pub async fn send(ws: &mut Client, payload: Vec<u8>) {
    ws.send(Message::binary(payload)).await.unwrap();
}

/// Next status reply, failing the test if none arrives within a few seconds.
pub async fn next_reply(ws: &mut Client) -> StatusReply {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("no reply from server")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// True when the server stays quiet for a moment.
pub async fn stays_silent(ws: &mut Client) -> bool {
    tokio::time::timeout(Duration::from_millis(300), ws.next())
        .await
        .is_err()
}

/// Raw socket printer accepting one job. Returns its `host:port` and the
/// bytes it received up to EOF.
pub async fn fake_printer() -> (String, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let target = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();
        received
    });

    (target, handle)
}

/// `host:port` with nothing listening.
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().to_string()
}
