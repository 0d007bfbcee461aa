//! CLI entry point for the photomosaic generator

use clap::Parser;
use photomosaic::io::cli::{Cli, MosaicRunner};
use photomosaic::io::logging::init_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    match MosaicRunner::new(cli).run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(key = error.message_key(), "{error}");
            ExitCode::FAILURE
        }
    }
}
