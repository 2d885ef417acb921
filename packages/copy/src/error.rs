//! Error types for sort operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

/// Errors that can occur while copying a single file or listing a directory.
///
/// These never abort a run. The walker logs them and counts them in the
/// [`SortReport`](crate::SortReport).
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Failed to read source directory.
    #[error("Failed to read directory {}: {io_error}", path.display())]
    ReadDirError {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// A directory sits deeper below the source root than the walk enters.
    #[error("Directory {} is nested deeper than {max_depth} levels", path.display())]
    TooDeep {
        /// The directory path.
        path: PathBuf,
        /// The deepest level the walk enters.
        max_depth: usize,
    },

    /// Failed to create a bucket directory.
    #[error("Failed to create directory {}: {io_error}", path.display())]
    CreateDirError {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to copy a file into its staging file.
    #[error("Failed to copy {} to {}: {io_error}", source_path.display(), target_path.display())]
    FileCopyError {
        /// Source file path.
        source_path: PathBuf,
        /// Target file path.
        target_path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to move a staged copy into its final location.
    #[error("Failed to move staged copy of {} into {}: {io_error}", source_path.display(), target_path.display())]
    PersistError {
        /// Source file path.
        source_path: PathBuf,
        /// Target file path.
        target_path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// The source path has no file name to copy under.
    #[error("Cannot copy {}: path has no file name", .0.display())]
    NoFileName(PathBuf),

    /// Failed to read file metadata.
    #[error("Failed to get metadata for {}: {io_error}", path.display())]
    MetadataError {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to apply access and modification times to a copy.
    #[error("Failed to set file times on {}: {io_error}", path.display())]
    SetTimesError {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Every candidate name for a renamed copy was already taken.
    #[error("No free name left for {} in {}", file_name, bucket.display())]
    RenameExhausted {
        /// The original file name.
        file_name: String,
        /// The bucket directory.
        bucket: PathBuf,
    },
}

/// Errors that stop a sort run before any file is copied.
#[derive(Debug, thiserror::Error)]
pub enum SortError {
    /// The source path does not exist.
    #[error("Source folder not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source path exists but is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    /// The source path exists but cannot be inspected or resolved.
    #[error("Failed to read source folder {}: {io_error}", path.display())]
    SourceUnreadable {
        /// The source path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// The output root could not be created or resolved.
    #[error("Failed to prepare output folder {}: {io_error}", path.display())]
    CreateOutput {
        /// The output path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// The worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
