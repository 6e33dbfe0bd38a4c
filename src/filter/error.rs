use thiserror::Error;

/// Errors that can occur when building keyword or severity filters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("No keywords given. Provide at least one non-empty keyword")]
    NoKeywords,

    #[error("Unknown severity: '{0}'. Valid values are: all, info, warning, error, critical")]
    UnknownSeverity(String),

    #[error("Empty severity selection")]
    EmptySelection,
}
