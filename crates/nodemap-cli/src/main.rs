//! Nodemap CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use nodemap_cli::{Args, error_adapter::to_reportable};

fn main() {
    // Panics get the same graphical report as errors
    miette::set_panic_hook();

    let args = Args::parse();

    // Fall back to warn rather than refusing to start on a bad --log-level
    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Nodemap");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = nodemap_cli::run(&args) {
        // Document errors render with a source snippet, the rest as plain diagnostics
        let reporter = miette::GraphicalReportHandler::new();
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, &to_reportable(&err))
            .expect("Writing to String buffer is infallible");

        error!("{writer}");
        process::exit(1);
    }

    info!("Completed successfully");
}
