//! In-memory filesystem for tests and headless use.
//!
//! Clones share the same files, so a test can hand one clone to a
//! `ConfigStore` and inspect the other. Failures are injected per call:
//!
//! - `lock_next_opens(n)`: the next `n` opens fail like a sharing violation
//! - `set_fail_reads(true)`: opened readers error on first read
//! - `set_fail_writes(true)`: opened writers error on every write
//! - `set_deny_create(true)`: `create_empty` fails

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::FileSystem;

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<PathBuf, Vec<u8>>,
    locked_opens: usize,
    open_attempts: usize,
    fail_reads: bool,
    fail_writes: bool,
    deny_create: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        self.insert_bytes(path, content.as_bytes());
    }

    /// Raw variant of [`insert`](Self::insert), for content that isn't UTF-8.
    pub fn insert_bytes(&self, path: impl Into<PathBuf>, content: &[u8]) {
        self.lock().files.insert(path.into(), content.to_vec());
    }

    /// File content as UTF-8 (lossy), or `None` if the file does not exist.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.lock()
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Make the next `count` open calls fail as if another process held the file.
    pub fn lock_next_opens(&self, count: usize) {
        self.lock().locked_opens = count;
    }

    /// Number of open calls seen so far, failed ones included.
    pub fn open_attempts(&self) -> usize {
        self.lock().open_attempts
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn set_deny_create(&self, deny: bool) {
        self.lock().deny_create = deny;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the attempt and consume one injected lock, if any.
    fn begin_open(&self, path: &Path) -> io::Result<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        inner.open_attempts += 1;
        if inner.locked_opens > 0 {
            inner.locked_opens -= 1;
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("sharing violation on {}", path.display()),
            ));
        }
        Ok(inner)
    }

    fn writer(&self, path: &Path) -> Box<dyn Write> {
        Box::new(MemoryWriter {
            inner: Arc::clone(&self.inner),
            path: path.to_path_buf(),
        })
    }
}

impl FileSystem for MemoryFs {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn BufRead>> {
        let inner = self.begin_open(path)?;
        let bytes = inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))?;

        if inner.fail_reads {
            return Ok(Box::new(BufReader::new(BrokenReader)));
        }
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn open_truncate(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        let mut inner = self.begin_open(path)?;
        inner.files.insert(path.to_path_buf(), Vec::new());
        drop(inner);
        Ok(self.writer(path))
    }

    fn open_append(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        let mut inner = self.begin_open(path)?;
        inner.files.entry(path.to_path_buf()).or_default();
        drop(inner);
        Ok(self.writer(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().files.contains_key(path)
    }

    fn create_empty(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.lock();
        if inner.deny_create {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
        }
        if inner.files.contains_key(path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "file exists"));
        }
        inner.files.insert(path.to_path_buf(), Vec::new());
        Ok(())
    }
}

/// Writes land in the shared map immediately, so a failed save leaves
/// whatever was written before the failure, like a real disk.
struct MemoryWriter {
    inner: Arc<Mutex<Inner>>,
    path: PathBuf,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.fail_writes {
            return Err(io::Error::other("device error"));
        }
        inner
            .files
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("device error"))
    }
}
