//! CLI definitions for VideoAgent.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// VideoAgent CLI.
#[derive(Parser)]
#[command(name = "videoagent")]
#[command(about = "Serialized Flow video submissions over Chrome DevTools")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the server in foreground (default)
    Run {
        /// Server host, overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Submit a prompt file to Flow once, bypassing the queue
    Submit {
        /// File containing the prompt text
        file: PathBuf,

        /// Chrome debugging port
        #[arg(long)]
        port: Option<u16>,

        /// Flow page URL to open when no Flow tab exists
        #[arg(long)]
        url: Option<String>,
    },

    /// Find a reachable Chrome DevTools port
    Probe {
        /// Port to try first
        #[arg(long)]
        port: Option<u16>,
    },
}
