use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "report-media")]
#[command(author, version, about = "Report-scoped photo storage service")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server for photo uploads and image serving
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Store local files as photos of a report
    Ingest {
        /// Report key the photos belong to
        #[arg(required = true)]
        report: String,

        /// Files to store
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Read a stored photo back by its relative path
    Fetch {
        /// Relative path as returned by ingest (e.g. Images/r42/roof.jpg)
        #[arg(required = true)]
        path: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
