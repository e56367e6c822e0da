//! Host I/O and project integration
//!
//! The core never touches the filesystem. A [`Host`] reads the source,
//! decides where the header goes and writes it; [`Generator`] strings those
//! steps around [`crate::pipeline::generate`].

mod job;
mod project;

pub use job::{GenerateError, Generator, Report};
pub use project::{Project, ProjectItem};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// What happened to a header on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// New or changed content was written
    Written,
    /// The file already held exactly this content
    Unchanged,
    /// Auto-save is off; nothing was written
    Skipped,
}

pub trait Host {
    fn read_source(&self, path: &Path) -> Result<String, HostError>;

    /// Where the header for `source` should be written.
    fn resolve_header_path(&self, source: &Path) -> PathBuf;

    fn write_header(&self, path: &Path, text: &str) -> Result<WriteOutcome, HostError>;

    /// Whether `a` and `b` name the same file.
    fn same_file(&self, a: &Path, b: &Path) -> bool {
        a == b
    }
}

/// [`Host`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsHost;

impl Host for FsHost {
    fn read_source(&self, path: &Path) -> Result<String, HostError> {
        fs::read_to_string(path).map_err(|source| HostError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `dir/name.c` → `dir/name.h`, or the existing item in `dir` whose
    /// name matches `name.h` ignoring case.
    fn resolve_header_path(&self, source: &Path) -> PathBuf {
        let header = source.with_extension("h");
        let dir = match source.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        match Project::load(dir) {
            Ok(project) => project
                .locate_existing_item(&header)
                .map(|item| dir.join(&item.name))
                .unwrap_or(header),
            Err(err) => {
                tracing::debug!("could not list '{}': {err}", dir.display());
                header
            }
        }
    }

    fn write_header(&self, path: &Path, text: &str) -> Result<WriteOutcome, HostError> {
        if fs::read_to_string(path).is_ok_and(|existing| existing == text) {
            return Ok(WriteOutcome::Unchanged);
        }
        fs::write(path, text).map_err(|source| HostError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(WriteOutcome::Written)
    }

    fn same_file(&self, a: &Path, b: &Path) -> bool {
        if a == b {
            return true;
        }
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_default_header_path() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let source = dir.path().join("calc.c");
        fs::write(&source, "").unwrap();

        assert_eq!(FsHost.resolve_header_path(&source), dir.path().join("calc.h"));
    }

    #[test]
    fn test_resolve_reuses_existing_spelling() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let source = dir.path().join("calc.c");
        fs::write(&source, "").unwrap();
        fs::write(dir.path().join("Calc.H"), "old").unwrap();

        assert_eq!(FsHost.resolve_header_path(&source), dir.path().join("Calc.H"));
    }

    #[test]
    fn test_write_reports_unchanged() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let header = dir.path().join("x.h");

        assert_eq!(FsHost.write_header(&header, "a\n").unwrap(), WriteOutcome::Written);
        assert_eq!(FsHost.write_header(&header, "a\n").unwrap(), WriteOutcome::Unchanged);
        assert_eq!(FsHost.write_header(&header, "b\n").unwrap(), WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&header).unwrap(), "b\n");
    }

    #[test]
    fn test_same_file_through_different_spellings() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let header = dir.path().join("util.h");
        fs::write(&header, "").unwrap();

        assert!(FsHost.same_file(&header, &dir.path().join(".").join("util.h")));
        assert!(!FsHost.same_file(&header, &dir.path().join("util.c")));
    }

    #[test]
    fn test_read_missing_source() {
        let err = FsHost.read_source(Path::new("/definitely/not/here.c")).unwrap_err();
        assert!(matches!(err, HostError::Read { .. }));
    }
}
