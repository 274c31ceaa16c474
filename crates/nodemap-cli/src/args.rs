//! Command-line argument definitions for the Nodemap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global flags select the configuration file and logging
//! verbosity; each subcommand reads a graph document and performs one
//! operation on it.

use clap::{Parser, Subcommand, ValueEnum};

use nodemap::analytics::PathAlgorithm;

/// Command-line arguments for the Nodemap layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rearrange a graph with one of the layout strategies
    Layout {
        /// Path to the input graph JSON file
        input: String,

        /// Layout strategy (grid, circle, hierarchical, force, weightedTree);
        /// defaults to the configured layout
        #[arg(short, long)]
        kind: Option<String>,

        /// Path to the output graph JSON file
        #[arg(short, long, default_value = "out.json")]
        output: String,

        /// Layout option override, e.g. `--set outerRadius=800`
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
        overrides: Vec<(String, f64)>,
    },

    /// Print graph statistics and, with --from and --to, a shortest path
    Analyze {
        /// Path to the input graph JSON file
        input: String,

        /// Path start node id
        #[arg(long)]
        from: Option<String>,

        /// Path end node id
        #[arg(long)]
        to: Option<String>,

        /// Path algorithm; defaults to the configured algorithm
        #[arg(long, value_enum)]
        algorithm: Option<AlgorithmArg>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Snap a proposed drag position of a node or box
    Snap {
        /// Path to the input graph JSON file
        input: String,

        /// Id of the dragged node (or box, with --box)
        #[arg(long)]
        target: String,

        /// Treat the target as a box id
        #[arg(long = "box")]
        is_box: bool,

        /// Proposed x (node center or box left edge)
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        /// Proposed y (node center or box top edge)
        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Path algorithm names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    Auto,
    Bfs,
    Dijkstra,
}

impl From<AlgorithmArg> for PathAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Auto => PathAlgorithm::Auto,
            AlgorithmArg::Bfs => PathAlgorithm::Bfs,
            AlgorithmArg::Dijkstra => PathAlgorithm::Dijkstra,
        }
    }
}

/// Parses a `key=value` layout override.
fn parse_override(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Missing option name in `{raw}`"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|err| format!("Invalid number for `{key}`: {err}"))?;
    Ok((key.to_string(), value))
}
