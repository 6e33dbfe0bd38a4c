use crate::scanner::{LogRecord, MatchSet};
use crate::severity::Severity;
use std::io::{Read, Write};

const TAGGED_HEADER: [&str; 2] = ["Severity", "Log Entry"];
const PLAIN_HEADER: [&str; 1] = ["Logs"];

/// CSV with a `Severity,Log Entry` header, or a single `Logs` column when
/// untagged. Severity is taken from the record itself.
pub fn write_csv<W: Write>(writer: W, matches: &MatchSet, tagged: bool) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if tagged {
        csv_writer.write_record(TAGGED_HEADER)?;
        for record in matches {
            csv_writer.write_record([record.severity.label(), record.text.as_str()])?;
        }
    } else {
        csv_writer.write_record(PLAIN_HEADER)?;
        for record in matches {
            csv_writer.write_record([record.text.as_str()])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Read a CSV export back into records.
///
/// Single-column (untagged) exports come back with `default_severity`.
pub fn read_csv_export<R: Read>(
    reader: R,
    default_severity: Severity,
) -> csv::Result<Vec<LogRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let tagged = csv_reader.headers()?.len() >= TAGGED_HEADER.len();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let record = if tagged {
            let severity = row
                .get(0)
                .and_then(|s| s.parse::<Severity>().ok())
                .unwrap_or(default_severity);
            LogRecord::new(severity, row.get(1).unwrap_or_default())
        } else {
            LogRecord::new(default_severity, row.get(0).unwrap_or_default())
        };
        records.push(record);
    }

    Ok(records)
}
