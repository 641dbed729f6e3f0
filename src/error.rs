use std::io;
use std::path::PathBuf;

/// Errors produced while loading, holding or exporting a scene.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input path does not exist
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Signature, version or size validation failed
    #[error("invalid scene file: {0}")]
    Format(String),

    /// Accessor used outside the loaded-but-not-shut-down window
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Reading or writing a file failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }

    /// Classify an error from opening `path` for reading.
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::Io { path, source }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Map a binrw failure to a format error. Running out of bytes is reported
/// as truncation since the whole file is already in memory.
impl From<binrw::Error> for Error {
    fn from(err: binrw::Error) -> Self {
        if err.is_eof() {
            Error::format("unexpected end of file")
        } else {
            Error::format(err.to_string())
        }
    }
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, Error>;
