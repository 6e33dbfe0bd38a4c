//! Keyword and severity filters
//!
//! A line is a match when any keyword occurs in it (case-insensitive
//! substring test) and, if a severity filter is active, its classified
//! severity is one of the selected labels.
//!
//! # Severity selection syntax
//!
//! ```text
//! all                    No severity filtering
//! error                  Only ERROR lines
//! warning,error          WARNING or ERROR lines
//! WARN, crit             Aliases and any case are accepted
//! ```

pub mod error;
pub mod keyword;
pub mod severity;

pub use error::FilterParseError;
pub use keyword::KeywordFilter;
pub use severity::SeverityFilter;
