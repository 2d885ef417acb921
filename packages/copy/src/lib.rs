//! Sort files into per-extension folders, concurrently.
//!
//! This crate walks a source tree and copies every regular file into
//! `output/<extension>/<file name>`:
//!
//! * Parallel traversal and copying on a bounded `rayon` pool
//! * Per-file and per-directory failures are logged and counted, never fatal
//! * Copy-on-write support via `reflink-copy` (APFS, Btrfs, `ReFS`)
//! * Atomic placement of each copy, with a configurable collision policy
//!
//! # Example
//!
//! ```rust,ignore
//! use ext_sort_copy::{SortOptions, sort_directory};
//!
//! let report = sort_directory(source, output, &SortOptions::default())?;
//! println!("{report}");
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod bucket;
mod copy;
mod error;
mod options;
mod report;
mod walk;

pub use bucket::{bucket_name, ensure_bucket, extension_of};
pub use copy::{CopyOutcome, copy_to_bucket};
pub use error::{CopyError, SortError};
pub use options::{
    CollisionPolicy, DEFAULT_NO_EXTENSION_BUCKET, ParsePolicyError, SortOptions, SymlinkPolicy,
};
pub use report::SortReport;
pub use walk::sort_directory;
