//! Filesystem port
//!
//! Everything the store needs from storage. Open methods are separate from
//! the returned streams so callers can tell an open failure (retryable for
//! writes) apart from a failure mid-stream.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Plain-file access under the config folder.
pub trait FileSystem {
    /// Open an existing file for line-by-line reading.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn BufRead>>;

    /// Open for writing, creating the file or truncating it to zero length.
    fn open_truncate(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    /// Open for writing at the end, creating the file if missing.
    fn open_append(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    /// Check whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Create an empty file. Fails if the parent folder is missing.
    fn create_empty(&self, path: &Path) -> io::Result<()>;
}
