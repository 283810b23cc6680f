//! Command-line surface for atlasctl

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "atlasctl")]
#[command(about = "Connectivity diagnostics for MongoDB deployments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Connection URI (overrides ATLAS_DOCTOR_URI and the config file)
    #[arg(long, global = true)]
    pub uri: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server-selection timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full diagnostic transcript: hostname, SRV discovery, connection
    Debug {
        /// Hostname for the DNS steps (default: seed host from the URI)
        #[arg(long)]
        host: Option<String>,

        /// Also emit the structured report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Minimal connection check; exits 1 on connection or config failure
    Test,

    /// DNS-only probe of a hostname (no URI required)
    Dns {
        /// Cluster hostname to probe
        host: String,
    },
}
