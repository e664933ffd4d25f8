//! Fileserve gRPC Server
//!
//! Serves the files in a local directory over gRPC until interrupted.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fileserve::{FileUsecase, LocalFileRepository};
use fileserve_grpc::FileServer;

/// Fileserve gRPC Server - read-only file access over gRPC
#[derive(Parser, Debug)]
#[command(name = "fileserve-grpc")]
#[command(about = "gRPC server exposing the files in a directory")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 50051)]
    port: u16,

    /// Interface address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Directory whose files are served
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    tracing::info!("Serving files from {}", args.root.display());
    let repository = Arc::new(LocalFileRepository::new(args.root));
    let mut server = FileServer::new(FileUsecase::new(repository)).with_host(args.host);

    server.start(args.port).await?;
    shutdown_signal().await;
    server.stop().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
