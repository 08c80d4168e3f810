//! VideoAgent - serialized Flow video submissions.
//!
//! Main entry point for the VideoAgent CLI and server.

mod cli;
mod commands;
mod server;

use clap::Parser;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::init_tracing()?;

    let cli = Cli::parse();
    let mut config = server::load_config(&cli.config)?;

    match cli.command {
        None => server::run_server(config).await,
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::run_server(config).await
        }
        Some(Commands::Submit { file, port, url }) => {
            commands::submit_file(config, &file, port, url).await
        }
        Some(Commands::Probe { port }) => commands::probe(config, port).await,
    }
}
