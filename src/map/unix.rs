//! Unix Implementation



use std::{ffi::c_void, fs::File, num::NonZeroUsize, ptr::NonNull};

use nix::sys::mman::{madvise, mmap, munmap, MapFlags, MmapAdvise, ProtFlags};

use crate::{Advice, Error, MapCfg, Result};



/// A raw memory mapping of a whole file.
///
/// # Safety
/// - It will unmap itself when dropped, and only then close the file.
// NOTES:
// - See https://github.com/nix-rust/nix/pull/2000 for some more info on `nix` ops.
pub struct Mapping {
    addr: NonNull<c_void>,
    len: usize,
    // Dropped after `Drop::drop` has unmapped `addr`.
    _file: File,
}

// The mapping is read-only and never changes address while it's alive.
unsafe impl Send for Mapping {}
unsafe impl Sync for Mapping {}

impl Mapping {
    pub fn new(file: File, len: usize, cfg: &MapCfg) -> Result<Self> {
        let length = NonZeroUsize::new(len).ok_or(Error::MapSizeZero)?;

        let addr = unsafe {
            mmap(None, length, ProtFlags::PROT_READ, map_flags(cfg), &file, 0)
        }
        .map_err(|errno| Error::Map(errno.into()))?;

        if cfg.advice != Advice::Normal {
            if let Err(e) = unsafe { madvise(addr, len, mmap_advice(cfg.advice)) } {
                tracing::warn!(advice = ?cfg.advice, error = %e, "`madvise` failed");
            }
        }

        Ok(Self {
            addr,
            len,
            _file: file,
        })
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.addr.as_ptr() as *const u8
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        // Unmap memory.
        if let Err(e) = unsafe { munmap(self.addr, self.len) } {
            tracing::warn!(error = %e, "failed to `munmap` file view");
        } else {
            tracing::trace!(len = self.len, "unmapped file view");
        }

        // The file descriptor is closed when `_file` drops, right after this.
    }
}



#[cfg(any(target_os = "linux", target_os = "android"))]
fn map_flags(cfg: &MapCfg) -> MapFlags {
    if cfg.populate {
        MapFlags::MAP_PRIVATE | MapFlags::MAP_POPULATE
    } else {
        MapFlags::MAP_PRIVATE
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn map_flags(_cfg: &MapCfg) -> MapFlags {
    MapFlags::MAP_PRIVATE
}

fn mmap_advice(advice: Advice) -> MmapAdvise {
    match advice {
        Advice::Normal => MmapAdvise::MADV_NORMAL,
        Advice::Sequential => MmapAdvise::MADV_SEQUENTIAL,
        Advice::Random => MmapAdvise::MADV_RANDOM,
        Advice::WillNeed => MmapAdvise::MADV_WILLNEED,
    }
}



#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn mapping_is_read_only_view_of_file() {
        let mut tmp = tempfile::tempfile().unwrap();
        tmp.write_all(b"unix mapping").unwrap();

        let mapping = Mapping::new(tmp, 12, &MapCfg::new()).unwrap();
        let bytes = unsafe { std::slice::from_raw_parts(mapping.as_ptr(), mapping.len()) };
        assert_eq!(bytes, b"unix mapping");
    }

    #[test]
    fn mapping_zero_len_refused() {
        let tmp = tempfile::tempfile().unwrap();
        assert!(matches!(
            Mapping::new(tmp, 0, &MapCfg::new()),
            Err(Error::MapSizeZero),
        ));
    }

    #[test]
    fn mapping_write_only_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("write_only");
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        file.write_all(b"no reads here").unwrap();

        // `PROT_READ` needs a descriptor opened for reading.
        let err = Mapping::new(file, 13, &MapCfg::new()).err().unwrap();
        assert!(matches!(err, Error::Map(_)));
    }

    #[test]
    fn map_flags_follow_cfg() {
        assert_eq!(map_flags(&MapCfg::new()), MapFlags::MAP_PRIVATE);

        #[cfg(any(target_os = "linux", target_os = "android"))]
        assert!(map_flags(&MapCfg::new().populate(true)).contains(MapFlags::MAP_POPULATE));
    }
}
