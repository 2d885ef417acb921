//! ext-sort CLI entry point.
//!
//! Copies every file under a source folder into `output/<extension>/`.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod output;
mod paths;

use std::env;

use clap::Parser;
use log::LevelFilter;

use args::Args;
use ext_sort_config::load_effective_config;
use ext_sort_copy::{SortError, sort_directory};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Timestamped logs at `info`, or `debug` with `--verbose`. `RUST_LOG`
/// refines either.
fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_timed_builder();

    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}

/// Main application logic.
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = env::current_dir()?;

    let loaded = load_effective_config(args.config.as_deref(), &cwd)?;
    if let Some(path) = &loaded.config_path {
        log::debug!("Using config {}", path.display());
    }

    let options = loaded.config.resolve(&args.config_overrides())?;
    log::debug!("Options: {options:?}");

    let source = paths::resolve(&cwd, &args.source);
    let output = paths::resolve(&cwd, &args.output);

    match sort_directory(&source, &output, &options) {
        Ok(report) => {
            log::debug!("Finished sorting {}: {report}", source.display());
            Ok(())
        }
        // A bad source only gets logged; nothing has been touched yet
        Err(
            e @ (SortError::SourceNotFound(_)
            | SortError::SourceNotDirectory(_)
            | SortError::SourceUnreadable { .. }),
        ) => {
            log::error!("{e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
