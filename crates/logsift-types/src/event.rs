use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Log severity level recognized by the parser.
///
/// Serialized as the canonical uppercase token so that level histograms in
/// JSON artifacts read the way they appear in the source logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Unknown,
}

impl Level {
    /// Canonical uppercase token for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Unknown => "UNKNOWN",
        }
    }

    /// Case-insensitive parse of a level keyword.
    ///
    /// Accepts the aliases seen in real-world logs: `WARNING` for `Warn`,
    /// `ERR`/`FATAL`/`SEVERE` for `Error`, `TRACE` for `Debug`.
    /// Returns None for anything else; callers decide the default.
    pub fn parse_token(token: &str) -> Option<Level> {
        match token.to_ascii_uppercase().as_str() {
            "TRACE" | "DEBUG" => Some(Level::Debug),
            "INFO" => Some(Level::Info),
            "WARN" | "WARNING" => Some(Level::Warn),
            "ERR" | "ERROR" | "FATAL" | "SEVERE" => Some(Level::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed log line.
///
/// Owned by the pipeline run that produced it and discarded after
/// aggregation; only the raw line survives inside group examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Best-effort timestamp; None when the line carried no recognizable one.
    pub timestamp: Option<DateTime<Utc>>,
    pub level: Level,
    pub message: String,
    pub raw_line: String,
}
