//! Mapped File



use std::path::{Path, PathBuf};

use crate::{map::MemoryMap, MapCfg, Result};



/// A read-only, memory mapped view of an entire file.
///
/// Starts out closed. A successful [`open`](Self::open) maps the whole file, and the mapping
/// stays valid until [`close`](Self::close), the next `open`, or drop. Views handed out by
/// [`as_slice`](Self::as_slice) and friends borrow `self`, so they can't outlive the mapping.
///
/// Zero length files are never mapped; opening one fails with
/// [`Error::MapSizeZero`](crate::Error::MapSizeZero) and leaves the instance closed.
pub struct MappedFile {
    state: State,
    cfg: MapCfg,
}

enum State {
    Closed,
    Open {
        map: MemoryMap,
        path: PathBuf,
    },
}

impl MappedFile {
    /// Create a closed instance.
    pub const fn new() -> Self {
        Self::with_cfg(MapCfg::new())
    }

    /// Create a closed instance that will map files with the given options.
    pub const fn with_cfg(cfg: MapCfg) -> Self {
        Self {
            state: State::Closed,
            cfg,
        }
    }

    /// Create an instance and try to map `path` with it.
    ///
    /// Failure is not reported here, beyond a log line. Check [`is_open`](Self::is_open).
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let mut file = Self::new();
        if let Err(e) = file.open(&path) {
            tracing::warn!(path = %path.as_ref().display(), error = %e, "failed to map file");
        }
        file
    }

    /// Map the whole file at `path`, releasing whatever was mapped before.
    ///
    /// On failure, nothing is left mapped or open.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.close();

        let path = path.as_ref();
        let map = MemoryMap::open(path, &self.cfg)?;
        tracing::debug!(path = %path.display(), len = map.len(), "mapped file");

        self.state = State::Open {
            map,
            path: path.to_path_buf(),
        };

        Ok(())
    }

    /// Release the current mapping, if there is one.
    pub fn close(&mut self) {
        if let State::Open { map, path } = std::mem::replace(&mut self.state, State::Closed) {
            drop(map);
            tracing::debug!(path = %path.display(), "unmapped file");
        }
    }

    /// Returns `true` if a file is currently mapped.
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    /// Length of the mapping in bytes, or `0` when closed.
    pub fn size(&self) -> usize {
        match &self.state {
            State::Open { map, .. } => map.len(),
            State::Closed => 0,
        }
    }

    /// Start of the mapping, or null when closed.
    ///
    /// The pointer is readable for [`size`](Self::size) bytes, and must never be written
    /// through nor used after the mapping is closed.
    pub fn as_ptr(&self) -> *const u8 {
        match &self.state {
            State::Open { map, .. } => map.as_ptr(),
            State::Closed => std::ptr::null(),
        }
    }

    /// The mapped bytes, or `None` when closed.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.state {
            State::Open { map, .. } => Some(map.as_slice()),
            State::Closed => None,
        }
    }

    /// The mapped bytes, empty when closed.
    pub fn as_slice(&self) -> &[u8] {
        self.data().unwrap_or_default()
    }

    /// Path of the mapped file.
    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            State::Open { path, .. } => Some(path),
            State::Closed => None,
        }
    }

    pub fn cfg(&self) -> &MapCfg {
        &self.cfg
    }

    /// Exactly `len` bytes starting at `start`, or `None` if that range isn't mapped.
    pub fn get(&self, start: usize, len: usize) -> Option<&[u8]> {
        let end = start.checked_add(len)?;
        self.as_slice().get(start..end)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl Default for MappedFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::ops::Deref for MappedFile {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for MappedFile {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFile")
            .field("open", &self.is_open())
            .field("path", &self.path())
            .field("len", &self.size())
            .field("cfg", &self.cfg)
            .finish()
    }
}
