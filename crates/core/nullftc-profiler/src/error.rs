//! Error types for the profiler.

use std::fmt;
use std::io;

/// Errors that can occur while building a profiler or exporting its data.
#[derive(Debug)]
pub enum ProfilerError {
    /// [`ProfilerBuilder::build`](crate::ProfilerBuilder::build) was called
    /// without an entry factory.
    MissingFactory,
    /// [`ProfilerBuilder::build`](crate::ProfilerBuilder::build) was called
    /// without an exporter.
    MissingExporter,
    /// I/O error while writing or reading profile data.
    Io(io::Error),
    /// JSON encoding or decoding failed.
    Json(serde_json::Error),
    /// The configuration file is malformed or contains an invalid value.
    Config(String),
    /// An asynchronous export was requested after shutdown.
    ShutDown,
    /// The export worker thread panicked.
    WorkerPanicked,
}

impl fmt::Display for ProfilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFactory => write!(f, "profiler entry factory not set"),
            Self::MissingExporter => write!(f, "profiler exporter not set"),
            Self::Io(e) => write!(f, "profile I/O error: {e}"),
            Self::Json(e) => write!(f, "profile JSON error: {e}"),
            Self::Config(msg) => write!(f, "invalid profiler config: {msg}"),
            Self::ShutDown => write!(f, "profiler has been shut down"),
            Self::WorkerPanicked => write!(f, "profiler export worker panicked"),
        }
    }
}

impl std::error::Error for ProfilerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProfilerError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ProfilerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<toml::de::Error> for ProfilerError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_messages() {
        assert_eq!(
            ProfilerError::MissingFactory.to_string(),
            "profiler entry factory not set"
        );
        assert_eq!(
            ProfilerError::MissingExporter.to_string(),
            "profiler exporter not set"
        );
        assert_eq!(
            ProfilerError::Config("flush_interval must be at least 1".into()).to_string(),
            "invalid profiler config: flush_interval must be at least 1"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        let err: ProfilerError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(err.source().is_some());
        assert!(ProfilerError::ShutDown.source().is_none());
    }
}
