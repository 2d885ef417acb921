//! Configuration file discovery.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ext-sort.toml";

/// Folder under the platform config directory holding the user config.
pub const USER_CONFIG_DIR: &str = "ext-sort";

/// Config file name inside [`USER_CONFIG_DIR`].
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Places a config file is looked for, in priority order.
///
/// # Arguments
///
/// * `cwd` - The working directory
/// * `user_config_dir` - Platform config directory, if the platform has one
#[must_use]
pub fn config_candidates(cwd: &Path, user_config_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![cwd.join(LOCAL_CONFIG_FILE)];

    if let Some(dir) = user_config_dir {
        candidates.push(dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE));
    }

    candidates
}

/// Find the config file that applies when none is given explicitly.
///
/// Checks `ext-sort.toml` in `cwd`, then `ext-sort/config.toml` in the
/// platform config directory.
#[must_use]
pub fn discover_config(cwd: &Path) -> Option<PathBuf> {
    let user_config_dir = dirs::config_dir();
    let found = config_candidates(cwd, user_config_dir.as_deref())
        .into_iter()
        .find(|path| path.is_file());

    match &found {
        Some(path) => log::debug!("Found config file {}", path.display()),
        None => log::debug!("No config file found, using defaults"),
    }

    found
}
