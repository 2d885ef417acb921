//! Options controlling a sort run.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::str::FromStr;

/// Bucket used for files without an extension.
pub const DEFAULT_NO_EXTENSION_BUCKET: &str = "no_extension";

/// What to do when the destination file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Replace the existing file. Concurrent writers race and the last one wins.
    #[default]
    Overwrite,
    /// Keep the existing file and skip the copy.
    Skip,
    /// Keep both by appending ` (n)` to the new file's stem.
    Rename,
}

impl CollisionPolicy {
    /// All accepted spellings, for help and error messages.
    pub const NAMES: [&'static str; 3] = ["overwrite", "skip", "rename"];
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Skip => write!(f, "skip"),
            Self::Rename => write!(f, "rename"),
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "skip" => Ok(Self::Skip),
            "rename" => Ok(Self::Rename),
            _ => Err(ParsePolicyError {
                value: s.to_string(),
                expected: &Self::NAMES,
            }),
        }
    }
}

/// How symlinks found during the walk are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SymlinkPolicy {
    /// Skip every symlink.
    #[default]
    Skip,
    /// Copy the target of symlinks that point at regular files.
    ///
    /// Symlinks to directories are never followed.
    Follow,
}

impl SymlinkPolicy {
    /// All accepted spellings, for help and error messages.
    pub const NAMES: [&'static str; 2] = ["skip", "follow"];
}

impl fmt::Display for SymlinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Follow => write!(f, "follow"),
        }
    }
}

impl FromStr for SymlinkPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "follow" => Ok(Self::Follow),
            _ => Err(ParsePolicyError {
                value: s.to_string(),
                expected: &Self::NAMES,
            }),
        }
    }
}

/// Error returned when a policy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value '{value}', expected one of: {}", expected.join(", "))]
pub struct ParsePolicyError {
    /// The rejected input.
    pub value: String,
    /// The accepted values.
    pub expected: &'static [&'static str],
}

/// Resolved options for a sort run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
    /// Bucket name for files without an extension.
    pub no_extension_bucket: String,
    /// Behavior when the destination already exists.
    pub on_collision: CollisionPolicy,
    /// Behavior for symlinks encountered during the walk.
    pub symlinks: SymlinkPolicy,
    /// Copy access and modification times onto the destination.
    pub preserve_times: bool,
    /// Worker threads. `0` means one per CPU.
    pub jobs: usize,
}

impl SortOptions {
    /// Number of worker threads to start.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            no_extension_bucket: DEFAULT_NO_EXTENSION_BUCKET.to_string(),
            on_collision: CollisionPolicy::default(),
            symlinks: SymlinkPolicy::default(),
            preserve_times: true,
            jobs: 0,
        }
    }
}
