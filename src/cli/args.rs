//! CLI argument definitions using clap
//!
//! Commands:
//! - campdir serve [--host <host>] [--port <port>] [--data-dir <path>]
//! - campdir seed --data-dir <path> [--destroy]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// campdir - a self-hostable REST backend for coding-bootcamp directories
#[derive(Parser, Debug)]
#[command(name = "campdir")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the API server
    Serve {
        /// Host to bind to (overrides config/env)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config/env)
        #[arg(long)]
        port: Option<u16>,

        /// Seed fixtures to import before serving
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Import or destroy fixture data, then exit
    Seed {
        /// Directory holding the fixture JSON files
        #[arg(long, default_value = "./demos/data")]
        data_dir: PathBuf,

        /// Destroy seeded data instead of importing
        #[arg(long)]
        destroy: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
