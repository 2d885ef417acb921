//! Copying a single file into its extension bucket.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::TempPath;

use crate::bucket::{bucket_name, ensure_bucket};
use crate::error::CopyError;
use crate::options::{CollisionPolicy, SortOptions};

/// Upper bound on ` (n)` suffixes tried by [`CollisionPolicy::Rename`].
const MAX_RENAME_ATTEMPTS: u32 = 10_000;

/// Result of copying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The file was copied to `target`.
    Copied {
        /// Final destination path.
        target: PathBuf,
    },
    /// `target` already existed and the collision policy kept it.
    Exists {
        /// The untouched destination path.
        target: PathBuf,
    },
}

/// Copy `source` into its extension bucket under `output_root`.
///
/// The bucket is created on demand. Contents go to a hidden staging file in
/// the bucket first and are then moved into place, so a failed copy never
/// leaves a truncated destination behind.
///
/// # Arguments
///
/// * `source` - Source file path
/// * `output_root` - Destination root holding the buckets
/// * `options` - Bucket naming, collision and metadata options
///
/// # Errors
///
/// * If the bucket directory cannot be created
/// * If the copy or the move into place fails
pub fn copy_to_bucket(
    source: &Path,
    output_root: &Path,
    options: &SortOptions,
) -> Result<CopyOutcome, CopyError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| CopyError::NoFileName(source.to_path_buf()))?;

    let bucket = bucket_name(Path::new(file_name), &options.no_extension_bucket);
    let bucket_dir = ensure_bucket(output_root, &bucket)?;
    let target = bucket_dir.join(file_name);

    if options.on_collision == CollisionPolicy::Skip && target.exists() {
        log::debug!("Target already exists: {}", target.display());
        return Ok(CopyOutcome::Exists { target });
    }

    let staged = stage_copy(source, &bucket_dir, &target, options.preserve_times)?;

    let outcome = match options.on_collision {
        CollisionPolicy::Overwrite => {
            staged
                .persist(&target)
                .map_err(|e| CopyError::PersistError {
                    source_path: source.to_path_buf(),
                    target_path: target.clone(),
                    io_error: e.error,
                })?;
            CopyOutcome::Copied { target }
        }
        CollisionPolicy::Skip => match staged.persist_noclobber(&target) {
            Ok(()) => CopyOutcome::Copied { target },
            // Lost the race to another writer of the same name
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                log::debug!("Target appeared while copying: {}", target.display());
                CopyOutcome::Exists { target }
            }
            Err(e) => {
                return Err(CopyError::PersistError {
                    source_path: source.to_path_buf(),
                    target_path: target,
                    io_error: e.error,
                });
            }
        },
        CollisionPolicy::Rename => persist_renamed(staged, source, &bucket_dir, &target)?,
    };

    if let CopyOutcome::Copied { target } = &outcome {
        log::info!(
            "File {} copied successfully to {}",
            source.display(),
            target.display()
        );
    }

    Ok(outcome)
}

/// Copy `source` to a fresh hidden file inside `bucket_dir`.
///
/// The returned path is deleted on drop unless it gets persisted.
fn stage_copy(
    source: &Path,
    bucket_dir: &Path,
    target: &Path,
    preserve_times: bool,
) -> Result<TempPath, CopyError> {
    let to_copy_error = |e: io::Error| CopyError::FileCopyError {
        source_path: source.to_path_buf(),
        target_path: target.to_path_buf(),
        io_error: e,
    };

    let staged = tempfile::Builder::new()
        .prefix(".ext-sort-")
        .suffix(".partial")
        .tempfile_in(bucket_dir)
        .map_err(to_copy_error)?
        .into_temp_path();

    // Reflink refuses to write over an existing file
    fs::remove_file(&staged).map_err(to_copy_error)?;

    copy_file_with_reflink(source, &staged).map_err(to_copy_error)?;

    if preserve_times {
        copy_file_times(source, &staged)?;
    }

    Ok(staged)
}

/// Copy a single file, trying reflink first then falling back to regular copy.
fn copy_file_with_reflink(source: &Path, target: &Path) -> io::Result<()> {
    // Try reflink first (copy-on-write, instant on APFS/Btrfs/ReFS)
    if reflink_copy::reflink(source, target).is_ok() {
        log::trace!("Reflinked {} -> {}", source.display(), target.display());
        return Ok(());
    }

    fs::copy(source, target)?;
    log::trace!("Copied {} -> {}", source.display(), target.display());
    Ok(())
}

/// Apply the source's access and modification times to `target`.
fn copy_file_times(source: &Path, target: &Path) -> Result<(), CopyError> {
    let metadata = fs::metadata(source).map_err(|e| CopyError::MetadataError {
        path: source.to_path_buf(),
        io_error: e,
    })?;

    filetime::set_file_times(
        target,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .map_err(|e| CopyError::SetTimesError {
        path: target.to_path_buf(),
        io_error: e,
    })
}

/// Move `staged` to the first free name among `target`, `stem (1).ext`,
/// `stem (2).ext`, ...
fn persist_renamed(
    mut staged: TempPath,
    source: &Path,
    bucket_dir: &Path,
    target: &Path,
) -> Result<CopyOutcome, CopyError> {
    for attempt in 0..=MAX_RENAME_ATTEMPTS {
        let candidate = if attempt == 0 {
            target.to_path_buf()
        } else {
            bucket_dir.join(numbered_name(target, attempt))
        };

        match staged.persist_noclobber(&candidate) {
            Ok(()) => return Ok(CopyOutcome::Copied { target: candidate }),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => staged = e.path,
            Err(e) => {
                return Err(CopyError::PersistError {
                    source_path: source.to_path_buf(),
                    target_path: candidate,
                    io_error: e.error,
                });
            }
        }
    }

    Err(CopyError::RenameExhausted {
        file_name: target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        bucket: bucket_dir.to_path_buf(),
    })
}

/// Build `stem (n).ext` from the file name of `path`, keeping the
/// extension's original case.
fn numbered_name(path: &Path, n: u32) -> OsString {
    let mut name = path
        .file_stem()
        .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
    name.push(format!(" ({n})"));

    if let Some(ext) = path.extension().filter(|ext| !ext.is_empty()) {
        name.push(".");
        name.push(ext);
    }

    name
}
