//! Deferred tile sources
//!
//! Tiles are registered with an opaque [`SourceHandle`] instead of pixels. The
//! handle is only turned into bytes when a generation actually needs the tile,
//! through whichever [`StorageAccess`] the engine was built with.

use crate::io::error::{MosaicError, Result};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Opaque capability token naming a tile source
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceHandle(String);

impl SourceHandle {
    /// Wrap an existing token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Readable byte stream produced by a storage backend
pub type SourceStream = Box<dyn Read + Send>;

/// Resolves handles issued at registration time back into byte streams
pub trait StorageAccess: Send + Sync {
    /// Open the source behind `handle`
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::StorageAccessRevoked`] when the handle is
    /// unknown, was revoked, or the underlying source cannot be opened
    fn open(&self, handle: &SourceHandle) -> Result<SourceStream>;
}

fn revoked(handle: &SourceHandle, source: Option<std::io::Error>) -> MosaicError {
    MosaicError::StorageAccessRevoked {
        handle: handle.to_string(),
        source,
    }
}

/// File-backed storage that hands out tokens for granted paths
///
/// Tokens stay valid until revoked or the storage is cleared. The file itself
/// is only opened when the token is resolved.
#[derive(Debug, Default)]
pub struct FileStorage {
    grants: RwLock<HashMap<SourceHandle, PathBuf>>,
    next_token: AtomicU64,
}

impl FileStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant access to `path` and return its token
    pub fn grant(&self, path: impl AsRef<Path>) -> SourceHandle {
        let id = self.next_token.fetch_add(1, Ordering::Relaxed);
        let handle = SourceHandle(format!("file-{id:08}"));
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.clone(), path.as_ref().to_path_buf());
        handle
    }

    /// Withdraw a previously granted token
    ///
    /// Returns whether the token was known.
    pub fn revoke(&self, handle: &SourceHandle) -> bool {
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(handle)
            .is_some()
    }

    /// Withdraw every token
    pub fn clear(&self) {
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Path granted for `handle`, if any
    pub fn path_of(&self, handle: &SourceHandle) -> Option<PathBuf> {
        self.grants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(handle)
            .cloned()
    }
}

impl StorageAccess for FileStorage {
    fn open(&self, handle: &SourceHandle) -> Result<SourceStream> {
        let path = self.path_of(handle).ok_or_else(|| revoked(handle, None))?;
        let file = File::open(&path).map_err(|e| revoked(handle, Some(e)))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory storage, mainly for tests and embedding callers
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<SourceHandle, Arc<[u8]>>>,
    next_token: AtomicU64,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` and return their token
    pub fn insert(&self, bytes: impl Into<Arc<[u8]>>) -> SourceHandle {
        let id = self.next_token.fetch_add(1, Ordering::Relaxed);
        let handle = SourceHandle(format!("mem-{id:08}"));
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.clone(), bytes.into());
        handle
    }

    /// Drop the bytes behind `handle`
    ///
    /// Returns whether the token was known.
    pub fn revoke(&self, handle: &SourceHandle) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(handle)
            .is_some()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no entries are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cursor over shared bytes, so resolving never copies the payload
struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl StorageAccess for MemoryStorage {
    fn open(&self, handle: &SourceHandle) -> Result<SourceStream> {
        let bytes = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(handle)
            .cloned()
            .ok_or_else(|| revoked(handle, None))?;
        Ok(Box::new(Cursor::new(SharedBytes(bytes))))
    }
}
