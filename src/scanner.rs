//! One-shot scanning of a complete log file

use crate::classifier::RuleTable;
use crate::error::{Result, TriageError};
use crate::filter::{KeywordFilter, SeverityFilter};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A classified, matching log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub severity: Severity,
    pub text: String,
}

impl LogRecord {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

/// Matches of one scan or monitor run, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    records: Vec<LogRecord>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord> {
        self.records.iter()
    }

    /// Number of records per severity, lowest severity first
    pub fn severity_counts(&self) -> Vec<(Severity, usize)> {
        Severity::ALL
            .iter()
            .map(|&severity| {
                let count = self
                    .records
                    .iter()
                    .filter(|r| r.severity == severity)
                    .count();
                (severity, count)
            })
            .collect()
    }
}

impl From<Vec<LogRecord>> for MatchSet {
    fn from(records: Vec<LogRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Everything needed to decide whether a line is a match
#[derive(Debug, Clone, Copy)]
pub struct LineMatcher<'a> {
    pub rules: &'a RuleTable,
    pub keywords: &'a KeywordFilter,
    pub severities: &'a SeverityFilter,
}

impl<'a> LineMatcher<'a> {
    pub fn new(
        rules: &'a RuleTable,
        keywords: &'a KeywordFilter,
        severities: &'a SeverityFilter,
    ) -> Self {
        Self {
            rules,
            keywords,
            severities,
        }
    }

    /// Classify and filter one raw line. Returns the record on a match.
    pub fn evaluate(&self, raw_line: &str) -> Option<LogRecord> {
        let text = raw_line.trim();
        let lowered = text.to_lowercase();

        if !self.keywords.matches_lowercased(&lowered) {
            return None;
        }

        let severity = self.rules.classify_lowercased(&lowered);
        self.severities
            .accepts(severity)
            .then(|| LogRecord::new(severity, text))
    }
}

/// Scan `path` once, from start to end of file
pub fn scan_file(
    path: impl AsRef<Path>,
    rules: &RuleTable,
    keywords: &KeywordFilter,
    severities: &SeverityFilter,
) -> Result<MatchSet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TriageError::io(path, e))?;

    tracing::debug!(file = %path.display(), keywords = ?keywords.keywords(), "Scanning log file");

    let matches = scan_reader(BufReader::new(file), rules, keywords, severities)
        .map_err(|e| TriageError::io(path, e))?;

    tracing::info!(
        file = %path.display(),
        matches = matches.len(),
        "Scan finished"
    );

    Ok(matches)
}

/// Scan any buffered reader line by line.
///
/// Invalid UTF-8 is replaced rather than aborting the scan.
pub fn scan_reader<R: BufRead>(
    mut reader: R,
    rules: &RuleTable,
    keywords: &KeywordFilter,
    severities: &SeverityFilter,
) -> std::io::Result<MatchSet> {
    let matcher = LineMatcher::new(rules, keywords, severities);
    let mut matches = MatchSet::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(record) = matcher.evaluate(&line) {
            matches.push(record);
        }
    }

    Ok(matches)
}
