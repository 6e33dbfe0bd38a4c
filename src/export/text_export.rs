use super::ExportSource;
use crate::scanner::MatchSet;
use std::io::{self, Write};

/// Plain text report: header naming the source and keywords, then one line
/// per record in arrival order.
pub fn write_text<W: Write>(
    mut writer: W,
    matches: &MatchSet,
    source: ExportSource<'_>,
    tagged: bool,
) -> io::Result<()> {
    writeln!(writer, "Log source: {}", source.path.display())?;
    writeln!(writer, "Keywords: {}", source.keywords.join(", "))?;
    writeln!(writer, "{}", "=".repeat(60))?;

    for record in matches {
        if tagged {
            writeln!(writer, "[{}] {}", record.severity, record.text)?;
        } else {
            writeln!(writer, "{}", record.text)?;
        }
    }

    Ok(())
}
