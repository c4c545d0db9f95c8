//! Mapping



#[cfg(unix)]
mod unix;

#[cfg(unix)]
use unix as os;

#[cfg(windows)]
mod windows;

#[cfg(windows)]
use windows as os;

use std::{fs::File, path::Path};

use crate::{Error, MappedFile, Result};



/// Access pattern hint for a mapping.
///
/// Only honored on Unix, where it is passed to `madvise`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Advice {
    #[default]
    Normal,
    Sequential,
    Random,
    WillNeed,
}

/// Options used whenever a [`MappedFile`] maps a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapCfg {
    pub(crate) populate: bool,
    pub(crate) advice: Advice,
}

impl MapCfg {
    pub const fn new() -> Self {
        Self {
            populate: false,
            advice: Advice::Normal,
        }
    }

    /// Prefault the mapped pages up front. Only has an effect on Linux and Android.
    pub fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    pub fn advise(mut self, advice: Advice) -> Self {
        self.advice = advice;
        self
    }

    /// Map the file at `path` with these options.
    pub fn open(self, path: impl AsRef<Path>) -> Result<MappedFile> {
        let mut file = MappedFile::with_cfg(self);
        file.open(path)?;
        Ok(file)
    }
}



/// A live read-only view of an entire file.
///
/// Everything it holds is released when it is dropped: the view first, then the mapping
/// object (where the platform has one), then the file.
pub(crate) struct MemoryMap {
    raw: os::Mapping,
}

impl MemoryMap {
    pub(crate) fn open(path: &Path, cfg: &MapCfg) -> Result<Self> {
        let file = File::open(path).map_err(Error::Open)?;

        // From here on, any early return drops `file` and closes it.
        let meta = file.metadata().map_err(Error::Stat)?;
        if !meta.is_file() {
            return Err(Error::NotAFile);
        }

        let len = meta.len();
        if len == 0 {
            return Err(Error::MapSizeZero);
        }
        let len = usize::try_from(len).map_err(|_| Error::MapTooLarge(len))?;

        let raw = os::Mapping::new(file, len, cfg)?;

        Ok(Self { raw })
    }

    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.raw.as_ptr()
    }

    pub(crate) fn len(&self) -> usize {
        self.raw.len()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: The view is readable for `len` bytes until `raw` is dropped, and the
        // returned slice borrows `self`.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len()) }
    }
}
