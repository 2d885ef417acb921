//! Resolution of command-line paths.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

/// Make `path` absolute against `cwd` and normalize `.` and `..` parts.
///
/// The path does not need to exist.
#[must_use]
pub fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path_clean::clean(path)
    } else {
        path_clean::clean(cwd.join(path))
    }
}
