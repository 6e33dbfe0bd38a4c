use crate::classifier::RuleTable;
use crate::monitor::MatchSink;
use crate::scanner::{LogRecord, MatchSet};
use crate::severity::Severity;
use colored::{ColoredString, Colorize};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::fmt::Write;

fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

pub fn severity_tag(severity: Severity) -> ColoredString {
    let tag = format!("[{}]", severity.label());
    let tag = tag.as_str();
    match severity {
        Severity::Info => tag.cyan(),
        Severity::Warning => tag.yellow(),
        Severity::Error => tag.red(),
        Severity::Critical => tag.bright_red().bold(),
    }
}

/// `[SEVERITY] text`, colored when the terminal allows it
pub fn format_record(record: &LogRecord) -> String {
    format!("{} {}", severity_tag(record.severity), record.text)
}

/// Prints each match to stdout as it arrives
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl MatchSink for ConsoleSink {
    fn on_match(&mut self, record: &LogRecord) {
        println!("{}", format_record(record));
    }
}

/// Closing summary for a scan or monitor run
pub fn format_summary(matches: &MatchSet) -> String {
    let mut out = String::new();

    if matches.is_empty() {
        let _ = writeln!(out, "{}", "No matching log entries found.".yellow());
        return out;
    }

    let heading = format!(
        "{} matching entr{}",
        matches.len(),
        if matches.len() == 1 { "y" } else { "ies" }
    );
    let _ = writeln!(out, "{}", heading.as_str().bold());

    let mut table = create_styled_table(&["Severity", "Count"]);
    for (severity, count) in matches.severity_counts() {
        if count > 0 {
            table.add_row(vec![Cell::new(severity.label()), Cell::new(count)]);
        }
    }
    let _ = writeln!(out, "{table}");
    out
}

/// Rule table in priority order, with the fallback severity
pub fn format_rule_table(rules: &RuleTable) -> String {
    let mut out = String::new();
    let mut table = create_styled_table(&["Priority", "Severity", "Triggers"]);

    for (idx, rule) in rules.rules().iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(rule.severity.label()),
            Cell::new(rule.triggers.join(", ")),
        ]);
    }

    let _ = writeln!(out, "{table}");
    let _ = writeln!(
        out,
        "Lines matching no rule are tagged {}",
        rules.default_severity().label().bold()
    );
    out
}
