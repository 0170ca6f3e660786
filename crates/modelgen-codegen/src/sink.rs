//! Output sinks for generated files.
//!
//! # Examples
//!
//! ```
//! use modelgen_codegen::FileSystemSink;
//! use modelgen_core::traits::OutputSink;
//! use std::path::Path;
//! # use tempfile::TempDir;
//!
//! # let temp_dir = TempDir::new().unwrap();
//! let mut sink = FileSystemSink::new(temp_dir.path());
//! sink.write_file(Path::new("com/acme/enums/Phases.java"), "package com.acme.enums;")
//!     .unwrap();
//!
//! assert!(temp_dir.path().join("com/acme/enums/Phases.java").exists());
//! ```

use modelgen_core::traits::OutputSink;
use modelgen_core::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes files below a root directory.
///
/// Each file is written to a temporary sibling first and renamed into
/// place, so a failed run never leaves a truncated source file behind.
#[derive(Debug, Clone)]
pub struct FileSystemSink {
    root: PathBuf,
}

impl FileSystemSink {
    /// Creates a sink rooted at `root`. The directory is created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
        let temp_path = path.with_extension("tmp");
        let result = Self::write_temp(&temp_path, contents)
            .and_then(|()| fs::rename(&temp_path, path));
        if result.is_err() {
            // Best effort, the original error is what gets reported.
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    fn write_temp(temp_path: &Path, contents: &str) -> std::io::Result<()> {
        let mut file = fs::File::create(temp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }
}

impl OutputSink for FileSystemSink {
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Self::write_atomic(&target, contents).map_err(|source| Error::IoError {
            path: target.clone(),
            source,
        })?;
        debug!("Wrote {}", target.display());
        Ok(())
    }
}

/// Keeps generated files in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents written to `path`.
    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Paths written so far, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filesystem_sink_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = FileSystemSink::new(temp_dir.path().join("out"));

        sink.write_file(Path::new("a/b/C.java"), "class C {}").unwrap();

        let written = fs::read_to_string(temp_dir.path().join("out/a/b/C.java")).unwrap();
        assert_eq!(written, "class C {}");
        assert!(!temp_dir.path().join("out/a/b/C.tmp").exists());
    }

    #[test]
    fn test_filesystem_sink_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = FileSystemSink::new(temp_dir.path());

        sink.write_file(Path::new("X.java"), "old").unwrap();
        sink.write_file(Path::new("X.java"), "new").unwrap();

        assert_eq!(fs::read_to_string(temp_dir.path().join("X.java")).unwrap(), "new");
    }

    #[test]
    fn test_filesystem_sink_reports_io_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("blocker"), "").unwrap();
        let mut sink = FileSystemSink::new(temp_dir.path().join("blocker"));

        let err = sink.write_file(Path::new("X.java"), "x").unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_failed_rename_removes_temporary_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("Defect.java/inner")).unwrap();
        let mut sink = FileSystemSink::new(temp_dir.path());

        let err = sink.write_file(Path::new("Defect.java"), "x").unwrap_err();
        assert!(err.is_io_error());
        assert!(!temp_dir.path().join("Defect.tmp").exists());
        assert!(temp_dir.path().join("Defect.java/inner").is_dir());
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.write_file(Path::new("b/B.java"), "b").unwrap();
        sink.write_file(Path::new("a/A.java"), "a").unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get("a/A.java"), Some("a"));
        let paths: Vec<&Path> = sink.paths().collect();
        assert_eq!(paths, [Path::new("a/A.java"), Path::new("b/B.java")]);
    }
}
