//! Read-only memory mapped files.



pub mod file;
mod map;

pub use file::*;
pub use map::{Advice, MapCfg};



pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be opened for reading.
    #[error("failed to open file: {0}")]
    Open(#[source] std::io::Error),
    /// The path exists, but does not name a regular file.
    #[error("not a regular file")]
    NotAFile,
    /// The file's length could not be determined.
    #[error("failed to read file metadata: {0}")]
    Stat(#[source] std::io::Error),
    /// The OS declined to create the mapping.
    #[error("failed to map file: {0}")]
    Map(#[source] std::io::Error),
    /// Attempted to create a map that was of length zero.
    #[error("attempted to map a file of length zero")]
    MapSizeZero,
    /// The file is larger than this address space can map.
    #[error("file of {0} bytes is too large to map")]
    MapTooLarge(u64),
}

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OpenFailure,
    StatFailure,
    MapFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Open(_) | Error::NotAFile => ErrorKind::OpenFailure,
            Error::Stat(_) => ErrorKind::StatFailure,
            Error::Map(_) | Error::MapSizeZero | Error::MapTooLarge(_) => ErrorKind::MapFailure,
        }
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        let io = || std::io::Error::from(std::io::ErrorKind::PermissionDenied);

        assert_eq!(Error::Open(io()).kind(), ErrorKind::OpenFailure);
        assert_eq!(Error::NotAFile.kind(), ErrorKind::OpenFailure);
        assert_eq!(Error::Stat(io()).kind(), ErrorKind::StatFailure);
        assert_eq!(Error::Map(io()).kind(), ErrorKind::MapFailure);
        assert_eq!(Error::MapSizeZero.kind(), ErrorKind::MapFailure);
        assert_eq!(Error::MapTooLarge(u64::MAX).kind(), ErrorKind::MapFailure);
    }

    #[test]
    fn error_source_is_kept() {
        use std::error::Error as _;

        let err = Error::Map(std::io::Error::from(std::io::ErrorKind::OutOfMemory));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to map file"));
        assert!(Error::MapSizeZero.source().is_none());
    }
}
