use crate::scanner::{LogRecord, MatchSet};
use crate::severity::Severity;
use serde::Deserialize;
use std::io::{Read, Write};

/// Pretty-printed JSON array.
///
/// Tagged output is `[{"severity": "...", "text": "..."}]`, untagged output
/// is an array of the raw line strings.
pub fn write_json<W: Write>(
    writer: W,
    matches: &MatchSet,
    tagged: bool,
) -> Result<(), serde_json::Error> {
    if tagged {
        serde_json::to_writer_pretty(writer, matches.records())
    } else {
        let texts: Vec<&str> = matches.iter().map(|r| r.text.as_str()).collect();
        serde_json::to_writer_pretty(writer, &texts)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRow {
    Tagged(LogRecord),
    Plain(String),
}

/// Read a JSON export back into records.
///
/// Untagged entries come back with `default_severity`.
pub fn read_json_export<R: Read>(
    reader: R,
    default_severity: Severity,
) -> Result<Vec<LogRecord>, serde_json::Error> {
    let rows: Vec<JsonRow> = serde_json::from_reader(reader)?;
    Ok(rows
        .into_iter()
        .map(|row| match row {
            JsonRow::Tagged(record) => record,
            JsonRow::Plain(text) => LogRecord::new(default_severity, text),
        })
        .collect())
}
