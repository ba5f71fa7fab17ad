//! # Streamorder CLI Module
//!
//! ## Available Commands
//!
//! - `compute` - Compute stream orders upstream of a sink arc
//! - `inspect` - Validate a network and print its metrics
//! - `convert` - Convert between JSON and binary snapshots

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use streamorder_core::{ConfluenceRule, EngineKind, StreamOrderError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Streamorder - stream order engine for river networks
///
/// Computes Strahler order and Shreve magnitude for every arc upstream of a
/// chosen sink arc.
#[derive(Parser, Debug)]
#[command(name = "streamorder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML config file (default: ./streamorder.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute orders for a sink arc and everything upstream of it
    Compute {
        /// Network file (JSON or binary snapshot)
        #[arg(short, long)]
        input: PathBuf,

        /// Sink arc index
        #[arg(short, long)]
        sink: u64,

        /// Node to start from (default: upstream end of the sink)
        #[arg(short, long)]
        node: Option<u64>,

        /// Engine (strahler, shreve, shreve-iterative)
        #[arg(short, long)]
        engine: Option<EngineKind>,

        /// Shreve combine rule (top-two, all)
        #[arg(short, long)]
        rule: Option<ConfluenceRule>,

        /// Recursion bound for the recursive engines
        #[arg(long)]
        max_depth: Option<usize>,

        /// Write the report (or a `.srn` snapshot) to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a network and print structural metrics
    Inspect {
        /// Network file (JSON or binary snapshot)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Convert a network between JSON and binary snapshot
    Convert {
        /// Source network file
        #[arg(short, long)]
        input: PathBuf,

        /// Target file; `.srn` writes a snapshot, anything else JSON
        #[arg(short, long)]
        output: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and loaded configuration.
pub fn execute(cli: Cli, config: &Config) -> Result<(), StreamOrderError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Compute {
            input,
            sink,
            node,
            engine,
            rule,
            max_depth,
            output,
        } => {
            let request = ComputeRequest {
                input,
                sink,
                node,
                engine: engine.unwrap_or(config.engine.default),
                settings: config.settings(rule, max_depth),
                output,
            };
            cmd_compute(&request, json_mode)
        }
        Commands::Inspect { input } => cmd_inspect(&input, json_mode),
        Commands::Convert { input, output } => cmd_convert(&input, &output),
    }
}
