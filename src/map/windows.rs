//! Windows Implementation



use std::{
    ffi::c_void,
    fs::File,
    io,
    os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle, RawHandle},
    ptr::{self, NonNull},
};

use windows_sys::Win32::{
    Foundation::HANDLE,
    System::Memory::{
        CreateFileMappingW, MapViewOfFile, UnmapViewOfFile, FILE_MAP_READ,
        MEMORY_MAPPED_VIEW_ADDRESS, PAGE_READONLY,
    },
};

use crate::{Advice, Error, MapCfg, Result};



/// A raw view of a whole file, backed by a file mapping object.
///
/// # Safety
/// - It will unmap its view when dropped, then close the mapping object, then the file.
pub struct Mapping {
    view: NonNull<c_void>,
    len: usize,
    // Field order is release order.
    _section: OwnedHandle,
    _file: File,
}

// The view is read-only and never changes address while it's alive.
unsafe impl Send for Mapping {}
unsafe impl Sync for Mapping {}

impl Mapping {
    pub fn new(file: File, len: usize, cfg: &MapCfg) -> Result<Self> {
        if len == 0 {
            // `CreateFileMappingW` refuses empty files anyway.
            return Err(Error::MapSizeZero);
        }
        if cfg.populate || cfg.advice != Advice::Normal {
            tracing::trace!(?cfg, "mapping hints are ignored on windows");
        }

        let section = unsafe {
            CreateFileMappingW(
                file.as_raw_handle() as HANDLE,
                ptr::null(),
                PAGE_READONLY,
                0,
                0,
                ptr::null(),
            )
        };
        if section.is_null() {
            return Err(Error::Map(io::Error::last_os_error()));
        }
        // SAFETY: `section` is a fresh handle that nothing else owns. From here on, an early
        // return closes it before `file`.
        let section = unsafe { OwnedHandle::from_raw_handle(section as RawHandle) };

        let view = unsafe {
            MapViewOfFile(section.as_raw_handle() as HANDLE, FILE_MAP_READ, 0, 0, 0)
        };
        let view = NonNull::new(view.Value)
            .ok_or_else(|| Error::Map(io::Error::last_os_error()))?;

        Ok(Self {
            view,
            len,
            _section: section,
            _file: file,
        })
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.view.as_ptr() as *const u8
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        let view = MEMORY_MAPPED_VIEW_ADDRESS {
            Value: self.view.as_ptr(),
        };
        if unsafe { UnmapViewOfFile(view) } == 0 {
            tracing::warn!(error = %io::Error::last_os_error(), "failed to unmap file view");
        } else {
            tracing::trace!(len = self.len, "unmapped file view");
        }

        // `_section` and then `_file` are closed right after this.
    }
}



#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn mapping_is_read_only_view_of_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"windows mapping").unwrap();
        tmp.flush().unwrap();

        let file = File::open(tmp.path()).unwrap();
        let mapping = Mapping::new(file, 15, &MapCfg::new()).unwrap();
        let bytes = unsafe { std::slice::from_raw_parts(mapping.as_ptr(), mapping.len()) };
        assert_eq!(bytes, b"windows mapping");
    }

    #[test]
    fn mapping_zero_len_refused() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = File::open(tmp.path()).unwrap();
        assert!(matches!(
            Mapping::new(file, 0, &MapCfg::new()),
            Err(Error::MapSizeZero),
        ));
    }
}
