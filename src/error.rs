use crate::config::ConfigError;
use crate::export::ExportError;
use crate::filter::FilterParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by scan and monitor runs.
///
/// Cancelling a monitor run is not an error; it returns the accumulated
/// matches like any other termination.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Log file '{}' not found", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Invalid choice: {0}")]
    InvalidChoice(FilterParseError),

    #[error("No keywords given. Provide at least one non-empty keyword")]
    NoKeywords,

    #[error("Failed to read log file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl TriageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            TriageError::SourceNotFound { path }
        } else {
            TriageError::Io { path, source }
        }
    }
}

impl From<FilterParseError> for TriageError {
    fn from(err: FilterParseError) -> Self {
        match err {
            FilterParseError::NoKeywords => TriageError::NoKeywords,
            other => TriageError::InvalidChoice(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, TriageError>;
