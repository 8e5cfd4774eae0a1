use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// Source image is missing or cannot be decoded.
    InputNotFound {
        path: PathBuf,
        reason: String,
    },
    /// A directory or output file could not be created.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The encoder rejected an output buffer.
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    InvalidParameter(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputNotFound { path, reason } => {
                write!(f, "Input image {} not found: {}", path.display(), reason)
            }
            Error::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            Error::Encode { path, source } => {
                write!(f, "Failed to encode {}: {}", path.display(), source)
            }
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Encode { source, .. } => Some(source),
            Error::InputNotFound { .. } | Error::InvalidParameter(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
