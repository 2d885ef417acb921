//! Extension buckets.
//!
//! A bucket is the subdirectory of the output root that collects every file
//! sharing one normalized extension.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CopyError;

/// Derive the normalized extension of a file name.
///
/// Only the final suffix counts, so `archive.tar.gz` yields `gz`. Returns
/// `None` for names without a suffix, including dotfiles like `.bashrc`
/// and names ending in a dot.
///
/// Extensions that are not valid UTF-8 are kept byte for byte and not
/// lowercased, so distinct ones still get distinct buckets.
#[must_use]
pub fn extension_of(file_name: &Path) -> Option<OsString> {
    let ext = file_name.extension().filter(|ext| !ext.is_empty())?;

    Some(
        ext.to_str()
            .map_or_else(|| ext.to_os_string(), |ext| ext.to_lowercase().into()),
    )
}

/// Name of the bucket a file belongs in.
#[must_use]
pub fn bucket_name(file_name: &Path, no_extension_bucket: &str) -> OsString {
    extension_of(file_name).unwrap_or_else(|| no_extension_bucket.into())
}

/// Make sure the bucket directory exists under `output_root`.
///
/// Safe to call from many threads for the same bucket at once.
///
/// # Errors
///
/// * If the directory cannot be created
pub fn ensure_bucket(output_root: &Path, bucket: &OsStr) -> Result<PathBuf, CopyError> {
    let dir = output_root.join(bucket);

    if !dir.is_dir() {
        log::debug!("Creating bucket {}", dir.display());
        // create_dir_all succeeds when another thread wins the race
        fs::create_dir_all(&dir).map_err(|e| CopyError::CreateDirError {
            path: dir.clone(),
            io_error: e,
        })?;
    }

    Ok(dir)
}
