//! Configuration types for ext-sort.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Component, Path, PathBuf};

use ext_sort_copy::{CollisionPolicy, DEFAULT_NO_EXTENSION_BUCKET, SortOptions, SymlinkPolicy};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// ext-sort configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Bucket for files without an extension.
    pub no_extension_bucket: String,

    /// What to do when a destination file already exists
    /// (`overwrite`, `skip` or `rename`).
    pub on_collision: String,

    /// How to treat symlinks (`skip` or `follow`).
    pub symlinks: String,

    /// Copy access and modification times onto the copies.
    pub preserve_times: bool,

    /// Worker threads, `0` for one per CPU.
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_extension_bucket: DEFAULT_NO_EXTENSION_BUCKET.to_string(),
            on_collision: CollisionPolicy::default().to_string(),
            symlinks: SymlinkPolicy::default().to_string(),
            preserve_times: true,
            jobs: 0,
        }
    }
}

/// Values given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Overrides `noExtensionBucket`.
    pub no_extension_bucket: Option<String>,
    /// Overrides `onCollision`.
    pub on_collision: Option<CollisionPolicy>,
    /// Overrides `symlinks`.
    pub symlinks: Option<SymlinkPolicy>,
    /// Overrides `preserveTimes`.
    pub preserve_times: Option<bool>,
    /// Overrides `jobs`.
    pub jobs: Option<usize>,
}

impl Config {
    /// Merge `overrides` over this config and validate the result.
    ///
    /// # Errors
    ///
    /// * If a policy name in the file is not recognized
    /// * If the resulting bucket name is not a plain folder name
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<SortOptions, ConfigError> {
        let on_collision = match overrides.on_collision {
            Some(policy) => policy,
            None => self
                .on_collision
                .parse()
                .map_err(|source| ConfigError::InvalidPolicy {
                    key: "onCollision",
                    source,
                })?,
        };

        let symlinks = match overrides.symlinks {
            Some(policy) => policy,
            None => self
                .symlinks
                .parse()
                .map_err(|source| ConfigError::InvalidPolicy {
                    key: "symlinks",
                    source,
                })?,
        };

        let no_extension_bucket = overrides
            .no_extension_bucket
            .clone()
            .unwrap_or_else(|| self.no_extension_bucket.clone());

        if !is_plain_folder_name(&no_extension_bucket) {
            return Err(ConfigError::InvalidBucketName(no_extension_bucket));
        }

        Ok(SortOptions {
            no_extension_bucket,
            on_collision,
            symlinks,
            preserve_times: overrides.preserve_times.unwrap_or(self.preserve_times),
            jobs: overrides.jobs.unwrap_or(self.jobs),
        })
    }
}

/// A single path component that names a child folder.
fn is_plain_folder_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

/// A loaded configuration with metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: Config,
    /// File it came from, `None` when built-in defaults are used.
    pub config_path: Option<PathBuf>,
}
