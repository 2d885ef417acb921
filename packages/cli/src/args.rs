//! CLI argument definitions.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::Parser;
use ext_sort_config::ConfigOverrides;
use ext_sort_copy::{CollisionPolicy, SymlinkPolicy};

/// CLI arguments for ext-sort.
#[derive(Debug, Parser)]
#[command(
    name = "ext-sort",
    about = "Copy every file under a folder into per-extension folders",
    version
)]
pub struct Args {
    /// Folder to scan.
    #[arg(index = 1)]
    pub source: PathBuf,

    /// Destination folder (created if missing).
    #[arg(index = 2)]
    pub output: PathBuf,

    /// Config file to use instead of the discovered one.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of worker threads (0 = one per CPU).
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// What to do when a destination file exists: overwrite, skip or rename.
    #[arg(long, value_name = "POLICY")]
    pub on_collision: Option<CollisionPolicy>,

    /// How to treat symlinks: skip or follow.
    #[arg(long, value_name = "POLICY")]
    pub symlinks: Option<SymlinkPolicy>,

    /// Folder name for files without an extension.
    #[arg(long, value_name = "NAME")]
    pub no_extension_bucket: Option<String>,

    /// Do not copy access and modification times.
    #[arg(long = "no-preserve-times")]
    pub no_preserve_times: bool,

    /// Enable verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Args {
    /// Command-line values that take precedence over the config file.
    #[must_use]
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            no_extension_bucket: self.no_extension_bucket.clone(),
            on_collision: self.on_collision,
            symlinks: self.symlinks,
            preserve_times: self.no_preserve_times.then_some(false),
            jobs: self.jobs,
        }
    }
}
