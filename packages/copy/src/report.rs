//! Outcome counters for a sort run.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::ops::{Add, AddAssign};

/// Counts of what happened during a walk.
///
/// Subtrees report independently and are summed on the way back up, so no
/// counter is shared between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortReport {
    /// Files copied into a bucket.
    pub files_copied: u64,
    /// Files left alone because the destination already existed.
    pub files_existing: u64,
    /// Symlinks and special files that were not copied.
    pub entries_skipped: u64,
    /// Files whose copy failed.
    pub files_failed: u64,
    /// Directories that could not be listed.
    pub dirs_failed: u64,
}

impl SortReport {
    /// Report for one copied file.
    #[must_use]
    pub const fn copied() -> Self {
        Self {
            files_copied: 1,
            ..Self::empty()
        }
    }

    /// Report for one file kept because its destination existed.
    #[must_use]
    pub const fn existing() -> Self {
        Self {
            files_existing: 1,
            ..Self::empty()
        }
    }

    /// Report for one skipped entry.
    #[must_use]
    pub const fn skipped() -> Self {
        Self {
            entries_skipped: 1,
            ..Self::empty()
        }
    }

    /// Report for one failed file.
    #[must_use]
    pub const fn file_failed() -> Self {
        Self {
            files_failed: 1,
            ..Self::empty()
        }
    }

    /// Report for one directory that could not be listed.
    #[must_use]
    pub const fn dir_failed() -> Self {
        Self {
            dirs_failed: 1,
            ..Self::empty()
        }
    }

    const fn empty() -> Self {
        Self {
            files_copied: 0,
            files_existing: 0,
            entries_skipped: 0,
            files_failed: 0,
            dirs_failed: 0,
        }
    }

    /// Total number of failures at any level.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.files_failed + self.dirs_failed
    }
}

impl Add for SortReport {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            files_copied: self.files_copied + rhs.files_copied,
            files_existing: self.files_existing + rhs.files_existing,
            entries_skipped: self.entries_skipped + rhs.entries_skipped,
            files_failed: self.files_failed + rhs.files_failed,
            dirs_failed: self.dirs_failed + rhs.dirs_failed,
        }
    }
}

impl AddAssign for SortReport {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for SortReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} existing, {} skipped, {} failed files, {} unreadable directories",
            self.files_copied,
            self.files_existing,
            self.entries_skipped,
            self.files_failed,
            self.dirs_failed
        )
    }
}
