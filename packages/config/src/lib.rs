//! Configuration loading for ext-sort.
//!
//! This crate provides the configuration file format and lookup rules for the
//! ext-sort CLI, and turns the loaded file plus command-line overrides into
//! [`ext_sort_copy::SortOptions`].
//!
//! # Lookup order
//!
//! * An explicit `--config` file
//! * `ext-sort.toml` in the working directory
//! * `ext-sort/config.toml` in the platform config directory
//! * Built-in defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use ext_sort_config::{ConfigOverrides, load_effective_config};
//!
//! let loaded = load_effective_config(None, &cwd)?;
//! let options = loaded.config.resolve(&ConfigOverrides::default())?;
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod discovery;
mod error;
mod toml_loader;
mod types;

pub use discovery::{
    LOCAL_CONFIG_FILE, USER_CONFIG_DIR, USER_CONFIG_FILE, config_candidates, discover_config,
};
pub use error::ConfigError;
pub use toml_loader::load_toml_config;
pub use types::{Config, ConfigOverrides, LoadedConfig};

use std::path::Path;

/// Load a configuration file.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let config = load_toml_config(path)?;

    Ok(LoadedConfig {
        config,
        config_path: Some(path.to_path_buf()),
    })
}

/// Load the configuration that applies to this run.
///
/// An explicit path must load. A discovered file that fails to load is
/// reported as a warning and defaults are used instead.
///
/// # Arguments
///
/// * `explicit` - Path given on the command line, if any
/// * `cwd` - The working directory, searched for `ext-sort.toml`
///
/// # Errors
///
/// * If `explicit` is given and cannot be loaded
pub fn load_effective_config(
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let Some(path) = discover_config(cwd) else {
        return Ok(LoadedConfig::default());
    };

    match load_config(&path) {
        Ok(loaded) => Ok(loaded),
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            Ok(LoadedConfig::default())
        }
    }
}
