//! Persisting a match set as text, JSON or CSV.
//!
//! Each writer targets any `io::Write`; [`write_export`] adds the output
//! directory and timestamped file naming on top.

mod csv_export;
mod json_export;
mod text_export;

pub use csv_export::{read_csv_export, write_csv};
pub use json_export::{read_json_export, write_json};
pub use text_export::write_text;

use crate::scanner::MatchSet;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create output directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write export file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write JSON export '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write CSV export '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid export timestamp format '{0}'")]
    TimestampFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Text,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Text => "text",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Where and how a match set is exported
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Include severity tags in the output
    pub tagged: bool,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    /// chrono format string for the file name timestamp
    pub timestamp_format: String,
}

impl ExportOptions {
    pub fn new(format: ExportFormat, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            format,
            tagged: true,
            output_dir: output_dir.into(),
            file_prefix: "matches".to_string(),
            timestamp_format: "%Y-%m-%d_%H-%M-%S".to_string(),
        }
    }

    pub fn tagged(mut self, tagged: bool) -> Self {
        self.tagged = tagged;
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }
}

/// Metadata written alongside the records (text header)
#[derive(Debug, Clone, Copy)]
pub struct ExportSource<'a> {
    pub path: &'a Path,
    pub keywords: &'a [String],
}

/// Write `matches` into `options.output_dir`.
///
/// Returns `Ok(None)` without touching the filesystem when there is nothing
/// to export.
pub fn write_export(
    matches: &MatchSet,
    source: ExportSource<'_>,
    options: &ExportOptions,
) -> Result<Option<PathBuf>, ExportError> {
    if matches.is_empty() {
        tracing::debug!("No matches, skipping export");
        return Ok(None);
    }
    if !is_valid_timestamp_format(&options.timestamp_format) {
        return Err(ExportError::TimestampFormat(options.timestamp_format.clone()));
    }

    fs::create_dir_all(&options.output_dir).map_err(|source| ExportError::CreateDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let path = next_export_path(options, Local::now())?;
    write_or_discard(&path, |writer| match options.format {
        ExportFormat::Text => {
            write_text(writer, matches, source, options.tagged).map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })
        }
        ExportFormat::Json => {
            write_json(writer, matches, options.tagged).map_err(|source| ExportError::Json {
                path: path.clone(),
                source,
            })
        }
        ExportFormat::Csv => {
            write_csv(writer, matches, options.tagged).map_err(|source| ExportError::Csv {
                path: path.clone(),
                source,
            })
        }
    })?;

    tracing::info!(
        file = %path.display(),
        format = %options.format,
        records = matches.len(),
        "Matches exported"
    );

    Ok(Some(path))
}

/// Whether `format` renders with chrono and stays within a single file name
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !format.contains(['/', '\\'])
        && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Create `path`, run `write` against it and flush.
///
/// A failed write removes the file so no truncated export is left behind.
fn write_or_discard<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), ExportError>,
{
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let result = write(&mut writer).and_then(|()| {
        writer.flush().map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    });
    drop(writer);

    if result.is_err() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(
                file = %path.display(),
                error = %e,
                "Could not remove partial export"
            );
        }
    }
    result
}

/// Timestamped file name that does not collide with an existing file
fn next_export_path(
    options: &ExportOptions,
    now: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    let mut stamp = String::new();
    write!(stamp, "{}", now.format(&options.timestamp_format))
        .map_err(|_| ExportError::TimestampFormat(options.timestamp_format.clone()))?;
    let ext = options.format.extension();
    let base = format!("{}_{}", options.file_prefix, stamp);

    let candidate = options.output_dir.join(format!("{base}.{ext}"));
    if !candidate.exists() {
        return Ok(candidate);
    }

    Ok((1..)
        .map(|n| options.output_dir.join(format!("{base}-{n}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate))
}
