//! Output sink trait.

use crate::Result;
use std::path::Path;

/// Destination for generated files.
///
/// Paths are relative to the sink's root. Implementations create parent
/// directories as needed. Writes are independent; there is no transaction
/// across files.
pub trait OutputSink {
    /// Writes `contents` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IoError`] if the file cannot be written.
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()>;
}
