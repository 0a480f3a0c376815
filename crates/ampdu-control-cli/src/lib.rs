//! A-MPDU aggregation controller CLI
//!
//! Command-line scenario runner for the central aggregation controller.
//!
//! # Features
//!
//! - **replay**: install a scenario topology and replay its event script
//! - **validate**: check a scenario file without replaying it
//! - **nearest**: report the access point closest to a point
//! - **version**: Display version information
//!
//! # Usage
//!
//! ```bash
//! # Replay a scenario and print the resulting registries
//! ampdu-control replay office.json
//!
//! # Same, as JSON with every device command
//! ampdu-control replay office.json --format json --commands
//!
//! # Which AP serves the point (12.5, -3)?
//! ampdu-control nearest office.json -x 12.5 -y -3
//! ```

use clap::{Parser, Subcommand};

pub mod replay;
pub mod scenario;

/// A-MPDU aggregation controller command-line interface
#[derive(Parser, Debug)]
#[command(name = "ampdu-control")]
#[command(author, version, about = "Central 802.11 A-MPDU aggregation controller")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a scenario and replay its events
    Replay(replay::ReplayArgs),

    /// Check a scenario file for errors
    Validate(replay::ValidateArgs),

    /// Find the access point nearest to a point
    Nearest(replay::NearestArgs),

    /// Display version information
    Version,
}
