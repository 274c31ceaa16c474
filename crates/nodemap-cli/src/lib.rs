//! CLI logic for the Nodemap layout tool.
//!
//! Each subcommand reads a graph document, runs one library operation on it
//! and writes the result as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{AlgorithmArg, Args, Command};

use std::fs;

use log::{info, warn};
use serde::Serialize;

use nodemap::{
    Arranger, NodemapError,
    analytics::AnalyticsRequest,
    geometry::Point,
    layout::LayoutOverrides,
    snap::{SnapRequest, SnapTarget},
};

/// Run the Nodemap CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `NodemapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid graph documents
/// - Snap targets that do not exist
pub fn run(args: &Args) -> Result<(), NodemapError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let arranger = Arranger::new(app_config);

    match &args.command {
        Command::Layout {
            input,
            kind,
            output,
            overrides,
        } => {
            info!(input_path = input, output_path = output; "Arranging graph");
            let mut graph = arranger.read_graph(input)?;
            let overrides: LayoutOverrides = overrides.iter().cloned().collect();

            match kind {
                Some(name) => {
                    if let Err(err) = arranger.arrange(&mut graph, name, &overrides) {
                        warn!(error = err.to_string(); "Graph left unchanged");
                    }
                }
                None => {
                    arranger.arrange_default(&mut graph, &overrides);
                }
            }

            arranger.write_graph(&graph, output)?;
        }
        Command::Analyze {
            input,
            from,
            to,
            algorithm,
            output,
        } => {
            let graph = arranger.read_graph(input)?;

            let mut request = AnalyticsRequest::new();
            match (from, to) {
                (Some(from), Some(to)) => request = request.with_path(from, to),
                (None, None) => {}
                _ => warn!("Both --from and --to are needed for a path; reporting statistics only"),
            }
            if let Some(algorithm) = algorithm {
                request = request.with_algorithm((*algorithm).into());
            }

            let report = arranger.analyze(&graph, &request);
            emit(&report, output.as_deref())?;
        }
        Command::Snap {
            input,
            target,
            is_box,
            x,
            y,
            output,
        } => {
            let graph = arranger.read_graph(input)?;

            let target = if *is_box {
                SnapTarget::Box(target.clone())
            } else {
                SnapTarget::Node(target.clone())
            };
            let result = arranger.snap(&graph, &SnapRequest::new(target, Point::new(*x, *y)))?;
            emit(&result, output.as_deref())?;
        }
    }

    Ok(())
}

/// Writes `value` as pretty JSON to `output`, or to stdout when absent.
fn emit<T: Serialize>(value: &T, output: Option<&str>) -> Result<(), NodemapError> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path; "Result written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
