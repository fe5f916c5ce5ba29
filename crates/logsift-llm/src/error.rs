use std::fmt;

/// Result type for logsift-llm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the model boundary
#[derive(Debug)]
pub enum Error {
    /// HTTP transport failed
    Http(reqwest::Error),

    /// A single attempt exceeded its deadline (seconds)
    Timeout(u64),

    /// Provider requires an API key that was not supplied
    MissingApiKey(String),

    /// Provider replied without usable content
    EmptyResponse(String),

    /// Unknown provider name in configuration
    UnknownProvider(String),

    /// All attempts failed; carries the last error seen
    Exhausted { attempts: u32, last: Box<Error> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Timeout(secs) => write!(f, "model call timed out after {}s", secs),
            Error::MissingApiKey(provider) => {
                write!(f, "provider '{}' requires an API key", provider)
            }
            Error::EmptyResponse(provider) => {
                write!(f, "provider '{}' returned no content", provider)
            }
            Error::UnknownProvider(provider) => {
                write!(f, "unknown provider '{}' (use 'openai' or 'ollama')", provider)
            }
            Error::Exhausted { attempts, last } => {
                write!(f, "model unreachable after {} attempts: {}", attempts, last)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Exhausted { last, .. } => Some(last.as_ref()),
            Error::Timeout(_)
            | Error::MissingApiKey(_)
            | Error::EmptyResponse(_)
            | Error::UnknownProvider(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
