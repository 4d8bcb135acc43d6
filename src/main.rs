use anyhow::Result;
use clap::Parser;
use log::info;
use std::net::{
    Ipv4Addr,
    SocketAddr,
    SocketAddrV4,
};
use ws_printer::{
    model::job::PrinterType,
    server::DEFAULT_PORT,
    Config,
    MarginLevel,
    Router,
    Server,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Receives print jobs from the browser and sends them to a local printer
struct Cli {
    /// What address to bind to
    #[clap(short, long, default_value = "127.0.0.1", env = "WEBSOCKETD_PRINTER_ADDRESS")]
    address: Ipv4Addr,
    /// What port to bind to
    #[clap(short, long, default_value_t = DEFAULT_PORT, env = "WEBSOCKETD_PRINTER_PORT")]
    port: u16,
    /// Printer type: "system" for an installed or USB printer, "network" for a raw socket printer
    #[clap(
        short = 't',
        long,
        value_enum,
        default_value = "system",
        env = "WEBSOCKETD_PRINTER_TYPE"
    )]
    printer_type: PrinterType,
    /// Printer to use: spooler name or USB model / vendorId:productId for "system",
    /// host[:port] for "network" (e.g. 172.16.1.5:9100)
    #[clap(short = 'u', long, env = "WEBSOCKETD_PRINTER_URI")]
    printer_uri: Option<String>,
    /// Left margin for PDF pages, 0 to 8
    #[clap(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u8).range(0..=MarginLevel::MAX as i64),
        env = "WEBSOCKETD_PRINTER_MARGIN"
    )]
    margin: u8,
    /// Reply with status 0 after every successful print
    #[clap(short, long, env = "WEBSOCKETD_PRINTER_REPLY_ON_SUCCESS")]
    reply_on_success: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let margin_level = MarginLevel::try_from(args.margin).map_err(anyhow::Error::msg)?;
    let config = Config::new(args.printer_type, args.printer_uri)
        .with_margin_level(margin_level)
        .with_reply_on_success(args.reply_on_success);
    info!(
        "Starting ws-printer with printer_type={} printer_uri={} margin={}",
        config.printer_type,
        config.printer_target.as_deref().unwrap_or("default"),
        config.margin_level
    );

    let addr = SocketAddr::V4(SocketAddrV4::new(args.address, args.port));
    let server = Server::bind(addr, Router::new(config)).await?;

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    }
}
