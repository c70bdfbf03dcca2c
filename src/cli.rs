//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// linkpulse - an in-memory URL shortener with click telemetry
#[derive(Parser, Debug)]
#[command(name = "linkpulse")]
#[command(version)]
#[command(about = "An in-memory URL shortener with click telemetry", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print or write a sample configuration file
    GenerateConfig {
        /// Output file path (default: stdout)
        output: Option<String>,
    },
}
