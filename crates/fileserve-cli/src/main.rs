//! Fileserve CLI - client for a fileserve gRPC server
//!
//! Usage:
//!   fileserve list                    List files on the server
//!   fileserve info <filename>         Show metadata for a file
//!   fileserve get <filename> [-o out] Print (or save) a file's content

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fileserve_grpc::{ClientConfig, FileClient};

/// Fileserve CLI - read files from a fileserve gRPC server
#[derive(Parser, Debug)]
#[command(name = "fileserve")]
#[command(about = "CLI client for the fileserve gRPC service")]
struct Args {
    /// Address of the gRPC server
    #[arg(long, global = true, default_value = "localhost:50051")]
    server: String,

    /// Deadline for each call, in milliseconds
    #[arg(long, global = true, default_value_t = 5000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get the list of files on the server
    #[command(alias = "ls")]
    List,

    /// Get information about a specific file
    #[command(alias = "i")]
    Info {
        /// File to describe
        filename: String,
    },

    /// Get the content of a specific file
    #[command(alias = "g")]
    Get {
        /// File to fetch
        filename: String,

        /// Write the content to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr so stdout carries only file data
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("fileserve: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config =
        ClientConfig::default().with_call_timeout(Duration::from_millis(args.timeout_ms));
    let mut client = FileClient::connect(args.server, config).await?;

    match args.command {
        Command::List => {
            let files = client.list_files().await?;
            print!("{}", render_list(&files));
        }
        Command::Info { filename } => {
            let info = client.file_info(&filename).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Get { filename, output } => {
            let file = client.file_content(&filename).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &file.content).await?;
                    tracing::info!("Wrote {} bytes to {}", file.size(), path.display());
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&file.content)?;
                    stdout.flush()?;
                }
            }
        }
    }

    client.close();
    Ok(())
}

fn render_list(files: &[String]) -> String {
    let mut out = String::from("Files:\n");
    for file in files {
        out.push_str("- ");
        out.push_str(file);
        out.push('\n');
    }
    out
}
