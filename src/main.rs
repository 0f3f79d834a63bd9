//! Content codec demo service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ TraceLayer → TimeoutLayer → BodyLimit
//!                         │
//!                         ▼
//!                  Decoded<T> ── Content-Type ──▶ Registry ──▶ Codec::unmarshal
//!                         │
//!                         ▼
//!                      handler ──▶ Reply<T>
//!                         │
//!                         ▼
//!                  Negotiated ── Accept ──▶ Registry ──▶ Codec::marshal
//!                         │
//!                         ▼
//!     ◀────────────── ResponseWriter (write-once status)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use content_codec::config::{load_config, with_bind_address, ServiceConfig};
use content_codec::observability::logging;
use content_codec::HttpServer;

#[derive(Parser)]
#[command(name = "content-codec")]
#[command(about = "HTTP service decoding and encoding JSON, XML and form bodies", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config = with_bind_address(config, bind)?;
    }

    logging::init(&config.observability.log_filter);
    tracing::info!("content-codec v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_content_type = %config.codecs.default_content_type,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
