//! Concurrent directory walk feeding the bucket copier.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::copy::{CopyOutcome, copy_to_bucket};
use crate::error::{CopyError, SortError};
use crate::options::{SortOptions, SymlinkPolicy};
use crate::report::SortReport;

/// Deepest directory level entered below the source root.
///
/// An absolute path this many levels deep is already past `PATH_MAX` on Linux.
const MAX_DEPTH: usize = 2048;

/// Stack size of each worker thread.
///
/// Every directory level nests a parallel iterator on the stack of the worker
/// running it, so the stack has to hold [`MAX_DEPTH`] levels.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Copy every file under `source` into extension buckets under `output`.
///
/// `output` is created if missing. The walk runs on a dedicated pool of
/// [`SortOptions::worker_count`] threads. Each directory level fans out over
/// its entries and returns once all of them are done. Failures below the
/// root are logged and counted in the returned report, never returned.
///
/// # Arguments
///
/// * `source` - Directory to scan
/// * `output` - Destination root for the buckets
/// * `options` - Run options
///
/// # Errors
///
/// * If `source` does not exist or is not a directory
/// * If `source` cannot be inspected or resolved
/// * If `output` cannot be created
/// * If the worker pool cannot be started
pub fn sort_directory(
    source: &Path,
    output: &Path,
    options: &SortOptions,
) -> Result<SortReport, SortError> {
    log::debug!(
        "Sorting directory: {} -> {}",
        source.display(),
        output.display()
    );

    let to_unreadable = |e: io::Error| SortError::SourceUnreadable {
        path: source.to_path_buf(),
        io_error: e,
    };

    match fs::metadata(source) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Err(SortError::SourceNotDirectory(source.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SortError::SourceNotFound(source.to_path_buf()));
        }
        Err(e) => return Err(to_unreadable(e)),
    }

    let source = fs::canonicalize(source).map_err(to_unreadable)?;

    let output = prepare_output(output)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.worker_count())
        .thread_name(|i| format!("ext-sort-{i}"))
        .stack_size(WORKER_STACK_SIZE)
        .build()?;

    let walker = Walker {
        output_root: &output,
        options,
        max_depth: MAX_DEPTH,
    };

    let report = pool.install(|| walker.walk(&source, 0));

    log::debug!("Sort finished: {report}");

    Ok(report)
}

/// Create the output root if needed and return its canonical path.
fn prepare_output(output: &Path) -> Result<PathBuf, SortError> {
    let to_sort_error = |e: io::Error| SortError::CreateOutput {
        path: output.to_path_buf(),
        io_error: e,
    };

    if !output.exists() {
        log::debug!("Creating output folder {}", output.display());
        fs::create_dir_all(output).map_err(to_sort_error)?;
    }

    fs::canonicalize(output).map_err(to_sort_error)
}

/// Shared, read-only state of one run.
struct Walker<'a> {
    output_root: &'a Path,
    options: &'a SortOptions,
    max_depth: usize,
}

impl Walker<'_> {
    /// Walk one directory level and everything beneath it.
    ///
    /// `depth` is the number of levels `dir` sits below the source root.
    fn walk(&self, dir: &Path, depth: usize) -> SortReport {
        let entries = match list_directory(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Error while reading folder {}: {e}", dir.display());
                return SortReport::dir_failed();
            }
        };

        entries
            .into_par_iter()
            .map(|entry| match entry {
                Ok(entry) => self.visit(&entry, depth),
                Err(e) => {
                    log::error!("Error while reading an entry of {}: {e}", dir.display());
                    SortReport::file_failed()
                }
            })
            .reduce(SortReport::default, |a, b| a + b)
    }

    fn visit(&self, entry: &fs::DirEntry, depth: usize) -> SortReport {
        let path = entry.path();

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                log::error!("Error reading file type of {}: {e}", path.display());
                return SortReport::file_failed();
            }
        };

        if file_type.is_dir() {
            if path == self.output_root {
                log::debug!("Skipping output folder {}", path.display());
                return SortReport::skipped();
            }
            if depth >= self.max_depth {
                let e = CopyError::TooDeep {
                    path: path.clone(),
                    max_depth: self.max_depth,
                };
                log::error!("{e}");
                return SortReport::dir_failed();
            }
            return self.walk(&path, depth + 1);
        }

        if file_type.is_file() {
            return self.copy(&path);
        }

        if file_type.is_symlink() {
            return self.visit_symlink(&path);
        }

        log::debug!("Skipping special file {}", path.display());
        SortReport::skipped()
    }

    fn visit_symlink(&self, path: &Path) -> SortReport {
        if self.options.symlinks == SymlinkPolicy::Skip {
            log::debug!("Skipping symlink {}", path.display());
            return SortReport::skipped();
        }

        match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => self.copy(path),
            Ok(metadata) if metadata.is_dir() => {
                log::debug!("Not following directory symlink {}", path.display());
                SortReport::skipped()
            }
            Ok(_) => {
                log::debug!("Skipping symlink to special file {}", path.display());
                SortReport::skipped()
            }
            Err(e) => {
                log::debug!("Skipping dangling symlink {}: {e}", path.display());
                SortReport::skipped()
            }
        }
    }

    fn copy(&self, path: &Path) -> SortReport {
        match copy_to_bucket(path, self.output_root, self.options) {
            Ok(CopyOutcome::Copied { .. }) => SortReport::copied(),
            Ok(CopyOutcome::Exists { target }) => {
                log::debug!(
                    "Kept existing {} instead of copying {}",
                    target.display(),
                    path.display()
                );
                SortReport::existing()
            }
            Err(e) => {
                log::error!("Error copying file {}: {e}", path.display());
                SortReport::file_failed()
            }
        }
    }
}

/// Read the immediate entries of `dir`.
///
/// Failing to open the directory fails the whole listing. Errors on single
/// entries are handed back so the caller can report them one by one.
fn list_directory(dir: &Path) -> Result<Vec<io::Result<fs::DirEntry>>, CopyError> {
    let read_dir = fs::read_dir(dir).map_err(|e| CopyError::ReadDirError {
        path: dir.to_path_buf(),
        io_error: e,
    })?;

    Ok(read_dir.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CollisionPolicy;
    use tempfile::TempDir;

    fn single_thread() -> SortOptions {
        SortOptions {
            jobs: 1,
            ..SortOptions::default()
        }
    }

    #[test]
    fn test_sort_directory_buckets_by_extension() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");

        fs::create_dir_all(source.join("docs/reports")).unwrap();
        fs::write(source.join("Report.PDF"), "pdf").unwrap();
        fs::write(source.join("README"), "readme").unwrap();
        fs::write(source.join("docs/archive.tar.gz"), "gz").unwrap();
        fs::write(source.join("docs/reports/summary.txt"), "txt").unwrap();

        let report = sort_directory(&source, &output, &SortOptions::default()).unwrap();

        assert_eq!(report.files_copied, 4);
        assert_eq!(report.failures(), 0);
        assert_eq!(fs::read_to_string(output.join("pdf/Report.PDF")).unwrap(), "pdf");
        assert_eq!(
            fs::read_to_string(output.join("no_extension/README")).unwrap(),
            "readme"
        );
        assert!(output.join("gz/archive.tar.gz").exists());
        assert!(output.join("txt/summary.txt").exists());
        assert!(!output.join("PDF").exists());
    }

    #[test]
    fn test_depth_does_not_change_bucket() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");
        let deep = source.join("a/b/c/d/e");

        fs::create_dir_all(&deep).unwrap();
        fs::write(source.join("top.log"), "top").unwrap();
        fs::write(deep.join("deep.log"), "deep").unwrap();

        sort_directory(&source, &output, &single_thread()).unwrap();

        let buckets: Vec<_> = fs::read_dir(&output).unwrap().collect();
        assert_eq!(buckets.len(), 1);
        assert!(output.join("log/top.log").exists());
        assert!(output.join("log/deep.log").exists());
    }

    #[test]
    fn test_name_collision_keeps_single_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");

        fs::create_dir_all(source.join("one")).unwrap();
        fs::create_dir_all(source.join("two")).unwrap();
        fs::write(source.join("one/data.csv"), "from one").unwrap();
        fs::write(source.join("two/data.csv"), "from two").unwrap();

        let report = sort_directory(&source, &output, &SortOptions::default()).unwrap();

        assert_eq!(report.files_copied, 2);
        let names: Vec<_> = fs::read_dir(output.join("csv"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["data.csv"]);

        // Which copy wins is up to the scheduler
        let content = fs::read_to_string(output.join("csv/data.csv")).unwrap();
        assert!(content == "from one" || content == "from two");
    }

    #[test]
    fn test_name_collision_with_rename_keeps_both() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");

        fs::create_dir_all(source.join("one")).unwrap();
        fs::create_dir_all(source.join("two")).unwrap();
        fs::write(source.join("one/data.csv"), "from one").unwrap();
        fs::write(source.join("two/data.csv"), "from two").unwrap();

        let options = SortOptions {
            on_collision: CollisionPolicy::Rename,
            ..SortOptions::default()
        };
        sort_directory(&source, &output, &options).unwrap();

        let mut contents = vec![
            fs::read_to_string(output.join("csv/data.csv")).unwrap(),
            fs::read_to_string(output.join("csv/data (1).csv")).unwrap(),
        ];
        contents.sort();
        assert_eq!(contents, vec!["from one", "from two"]);
    }

    #[test]
    fn test_rerun_reuses_buckets() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");

        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.md"), "a").unwrap();
        fs::write(source.join("b.md"), "b").unwrap();

        let first = sort_directory(&source, &output, &SortOptions::default()).unwrap();
        let second = sort_directory(&source, &output, &SortOptions::default()).unwrap();

        assert_eq!(first.files_copied, 2);
        assert_eq!(second.files_copied, 2);
        assert_eq!(second.failures(), 0);
        assert_eq!(fs::read_dir(output.join("md")).unwrap().count(), 2);
    }

    #[test]
    fn test_rerun_with_skip_policy_counts_existing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");

        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.md"), "a").unwrap();

        let options = SortOptions {
            on_collision: CollisionPolicy::Skip,
            ..SortOptions::default()
        };
        sort_directory(&source, &output, &options).unwrap();
        let second = sort_directory(&source, &output, &options).unwrap();

        assert_eq!(second.files_copied, 0);
        assert_eq!(second.files_existing, 1);
    }

    #[test]
    fn test_missing_source_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("missing");
        let output = dir.path().join("out");

        let err = sort_directory(&source, &output, &SortOptions::default()).unwrap_err();

        assert!(matches!(err, SortError::SourceNotFound(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_file_as_source_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("file.txt");
        let output = dir.path().join("out");
        fs::write(&source, "not a dir").unwrap();

        let err = sort_directory(&source, &output, &SortOptions::default()).unwrap_err();

        assert!(matches!(err, SortError::SourceNotDirectory(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_output_inside_source_is_not_walked() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = source.join("sorted");

        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("one.txt"), "1").unwrap();

        let first = sort_directory(&source, &output, &SortOptions::default()).unwrap();
        let second = sort_directory(&source, &output, &SortOptions::default()).unwrap();

        assert_eq!(first.files_copied, 1);
        assert_eq!(second.files_copied, 1);
        assert!(!output.join("txt/txt").exists());
        assert_eq!(fs::read_dir(output.join("txt")).unwrap().count(), 1);
    }

    #[test]
    fn test_empty_source_creates_output_only() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("nested/out");
        fs::create_dir_all(&source).unwrap();

        let report = sort_directory(&source, &output, &SortOptions::default()).unwrap();

        assert_eq!(report, SortReport::default());
        assert!(output.is_dir());
        assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
    }

    #[test]
    fn test_deep_tree_is_walked() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("s");
        let output = dir.path().join("out");

        let mut deep = source.clone();
        for _ in 0..600 {
            deep.push("d");
        }
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("leaf.txt"), "leaf").unwrap();

        let options = SortOptions {
            jobs: 2,
            ..SortOptions::default()
        };
        let report = sort_directory(&source, &output, &options).unwrap();

        assert_eq!(report.files_copied, 1);
        assert_eq!(report.failures(), 0);
        assert_eq!(fs::read_to_string(output.join("txt/leaf.txt")).unwrap(), "leaf");
    }

    #[test]
    fn test_directories_past_max_depth_are_reported() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");

        fs::create_dir_all(source.join("a/b/c")).unwrap();
        fs::create_dir_all(&output).unwrap();
        fs::write(source.join("top.txt"), "top").unwrap();
        fs::write(source.join("a/b/mid.txt"), "mid").unwrap();
        fs::write(source.join("a/b/c/deep.txt"), "deep").unwrap();

        let options = SortOptions::default();
        let walker = Walker {
            output_root: &output,
            options: &options,
            max_depth: 2,
        };
        let report = walker.walk(&source, 0);

        assert_eq!(report.files_copied, 2);
        assert_eq!(report.dirs_failed, 1);
        assert!(output.join("txt/mid.txt").exists());
        assert!(!output.join("txt/deep.txt").exists());
    }

    #[test]
    fn test_bucket_failure_does_not_stop_siblings() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");

        fs::create_dir_all(source.join("notes")).unwrap();
        fs::create_dir_all(&output).unwrap();
        // A plain file where the txt bucket should go
        fs::write(output.join("txt"), "in the way").unwrap();
        fs::write(source.join("blocked.txt"), "blocked").unwrap();
        fs::write(source.join("one.md"), "one").unwrap();
        fs::write(source.join("notes/two.md"), "two").unwrap();

        let report = sort_directory(&source, &output, &SortOptions::default()).unwrap();

        assert_eq!(report.files_failed, 1);
        assert_eq!(report.files_copied, 2);
        assert!(output.join("md/one.md").exists());
        assert!(output.join("md/two.md").exists());
        assert_eq!(fs::read_to_string(output.join("txt")).unwrap(), "in the way");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_source_keeps_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        let source = locked.join("src");
        let output = dir.path().join("out");

        fs::create_dir_all(&source).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still reach the source
        if fs::metadata(&source).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let err = sort_directory(&source, &output, &SortOptions::default()).unwrap_err();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        match err {
            SortError::SourceUnreadable { io_error, .. } => {
                assert_eq!(io_error.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_does_not_stop_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");
        let locked = source.join("locked");

        fs::create_dir_all(&locked).unwrap();
        fs::create_dir_all(source.join("open")).unwrap();
        fs::write(locked.join("hidden.txt"), "hidden").unwrap();
        fs::write(source.join("top.txt"), "top").unwrap();
        fs::write(source.join("open/nested.txt"), "nested").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = sort_directory(&source, &output, &SortOptions::default()).unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.dirs_failed, 1);
        assert_eq!(report.files_copied, 2);
        assert!(output.join("txt/top.txt").exists());
        assert!(output.join("txt/nested.txt").exists());
        assert!(!output.join("txt/hidden.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped_by_default() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");
        let outside = dir.path().join("outside.txt");

        fs::create_dir_all(&source).unwrap();
        fs::write(&outside, "outside").unwrap();
        std::os::unix::fs::symlink(&outside, source.join("link.txt")).unwrap();

        let report = sort_directory(&source, &output, &SortOptions::default()).unwrap();

        assert_eq!(report.files_copied, 0);
        assert_eq!(report.entries_skipped, 1);
        assert!(!output.join("txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_symlinks_copies_files_only() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let output = dir.path().join("out");
        let elsewhere = dir.path().join("elsewhere");

        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&elsewhere).unwrap();
        fs::write(elsewhere.join("target.txt"), "linked").unwrap();
        fs::write(elsewhere.join("inner.md"), "inner").unwrap();
        std::os::unix::fs::symlink(elsewhere.join("target.txt"), source.join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(&elsewhere, source.join("dir_link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), source.join("dangling.bin"))
            .unwrap();

        let options = SortOptions {
            symlinks: SymlinkPolicy::Follow,
            ..SortOptions::default()
        };
        let report = sort_directory(&source, &output, &options).unwrap();

        assert_eq!(report.files_copied, 1);
        assert_eq!(report.entries_skipped, 2);
        assert_eq!(fs::read_to_string(output.join("txt/link.txt")).unwrap(), "linked");
        assert!(!output.join("md").exists());
        assert!(!output.join("bin").exists());
    }
}
