mod common;

use common::{
    archive,
    connect,
    dead_endpoint,
    fake_printer,
    next_reply,
    send,
    start,
    stays_silent,
};
use ws_printer::{
    model::job::PrinterType,
    Config,
};

const TICKET: &[u8] = b"\x1b@Boleta 123\n\x1dV\x00";

#[tokio::test]
async fn escpos_reaches_network_printer_silently() {
    let (target, printer) = fake_printer().await;
    let addr = start(Config::new(PrinterType::Network, Some(target))).await;

    let mut ws = connect(addr, "/print/escpos").await;
    send(&mut ws, archive("ticket.bin", TICKET)).await;

    assert_eq!(printer.await.unwrap(), TICKET);
    // Success is signalled by the absence of an error reply.
    assert!(stays_silent(&mut ws).await);
}

#[tokio::test]
async fn success_can_be_acknowledged() {
    let (target, printer) = fake_printer().await;
    let config = Config::new(PrinterType::Network, Some(target)).with_reply_on_success(true);
    let addr = start(config).await;

    let mut ws = connect(addr, "/print").await;
    send(&mut ws, archive("ticket.bin", TICKET)).await;

    let reply = next_reply(&mut ws).await;
    assert!(reply.is_ok());
    assert_eq!(
        reply.message,
        "Se imprimió usando 'escpos' en la impresora 'network'"
    );
    assert_eq!(printer.await.unwrap(), TICKET);
}

#[tokio::test]
async fn pdf_on_network_printer_is_rejected() {
    let addr = start(Config::new(PrinterType::Network, Some(dead_endpoint().await))).await;

    let mut ws = connect(addr, "/print/pdf").await;
    send(&mut ws, archive("doc.pdf", b"%PDF-1.4")).await;

    let reply = next_reply(&mut ws).await;
    assert_eq!(reply.status, 1);
    assert_eq!(
        reply.message,
        "Tipo de impresora network no soportada con formato pdf"
    );
}

#[tokio::test]
async fn invalid_archive_is_reported() {
    let addr = start(Config::new(PrinterType::Network, Some(dead_endpoint().await))).await;

    let mut ws = connect(addr, "/print/escpos").await;
    send(&mut ws, b"this is not a zip file".to_vec()).await;

    let reply = next_reply(&mut ws).await;
    assert_eq!(reply.status, 1);
    assert!(reply
        .message
        .starts_with("No fue posible obtener el archivo para imprimir ("));
}

#[tokio::test]
async fn missing_action_is_rejected_up_front() {
    let addr = start(Config::default()).await;

    let mut ws = connect(addr, "/").await;

    let reply = next_reply(&mut ws).await;
    assert_eq!(reply.status, 1);
    assert_eq!(
        reply.message,
        "Falta indicar la acción que se está solicitando realizar"
    );
}

#[tokio::test]
async fn unreachable_printer_names_the_target() {
    let target = dead_endpoint().await;
    let addr = start(Config::new(PrinterType::Network, Some(target.clone()))).await;

    let mut ws = connect(addr, "/print/escpos").await;
    send(&mut ws, archive("ticket.bin", TICKET)).await;

    let reply = next_reply(&mut ws).await;
    assert_eq!(reply.status, 1);
    assert!(reply
        .message
        .starts_with(&format!("No fue posible imprimir en {} (", target)));
}

#[tokio::test]
async fn session_survives_a_failed_request() {
    let (target, printer) = fake_printer().await;
    let addr = start(Config::new(PrinterType::Network, Some(target))).await;

    let mut ws = connect(addr, "/print/escpos").await;
    send(&mut ws, b"garbage".to_vec()).await;
    assert_eq!(next_reply(&mut ws).await.status, 1);

    send(&mut ws, archive("ticket.bin", TICKET)).await;
    assert_eq!(printer.await.unwrap(), TICKET);
    assert!(stays_silent(&mut ws).await);
}

#[tokio::test]
async fn sessions_are_isolated() {
    let (target, printer) = fake_printer().await;
    let addr = start(Config::new(PrinterType::Network, Some(target))).await;

    let mut failing = connect(addr, "/print/escpos").await;
    let mut healthy = connect(addr, "/print/escpos").await;

    send(&mut failing, b"garbage".to_vec()).await;
    send(&mut healthy, archive("ticket.bin", TICKET)).await;

    assert_eq!(next_reply(&mut failing).await.status, 1);
    assert_eq!(printer.await.unwrap(), TICKET);
    assert!(stays_silent(&mut healthy).await);
}

#[cfg(feature = "usb")]
#[tokio::test]
async fn absent_usb_printer_is_reported() {
    let addr = start(Config::new(PrinterType::System, Some("99:99".to_string()))).await;

    let mut ws = connect(addr, "/print/escpos").await;
    send(&mut ws, archive("ticket.bin", TICKET)).await;

    let reply = next_reply(&mut ws).await;
    assert_eq!(reply.status, 1);
    assert!(reply.message.starts_with("No fue posible imprimir en 99:99 ("));
    assert!(reply.message.contains("0099:0099"));
}
