use std::fmt;
use std::path::PathBuf;

/// Result type for logsift-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Model boundary error (transport unreachable after retries)
    Llm(logsift_llm::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Inputs that cannot be analyzed (missing paths, nothing to read)
    InvalidInput(String),

    /// Invalid operation or state
    InvalidOperation(String),

    /// Artifact serialization failed
    Serialize(serde_json::Error),

    /// Artifact write failed; no partial file is left at `path`
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Llm(err) => write!(f, "Model error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            Error::Serialize(err) => write!(f, "Serialization error: {}", err),
            Error::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Llm(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Serialize(err) => Some(err),
            Error::Write { source, .. } => Some(source),
            Error::Config(_) | Error::InvalidInput(_) | Error::InvalidOperation(_) => None,
        }
    }
}

impl From<logsift_llm::Error> for Error {
    fn from(err: logsift_llm::Error) -> Self {
        Error::Llm(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
