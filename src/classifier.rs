//! Keyword-based severity classification
//!
//! A [`RuleTable`] is an ordered list of `(severity, triggers)` rules. A line
//! is lowercased and the rules are walked in declared order; the first rule
//! with a trigger occurring anywhere in the line decides the severity. When
//! nothing matches, the table's default severity is returned.
//!
//! Declared order is the tie-break. A line carrying both a WARNING and a
//! CRITICAL trigger is tagged by whichever rule comes first in the table,
//! regardless of which trigger appears earlier in the line.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleTableError {
    #[error("Rule table is empty")]
    Empty,

    #[error("Rule for {0} has an empty trigger")]
    EmptyTrigger(Severity),

    #[error("Severity {0} is declared more than once")]
    DuplicateSeverity(Severity),
}

/// One entry of the rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityRule {
    pub severity: Severity,
    pub triggers: Vec<String>,
}

impl SeverityRule {
    pub fn new(severity: Severity, triggers: &[&str]) -> Self {
        Self {
            severity,
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn matches_lowercased(&self, line: &str) -> bool {
        self.triggers.iter().any(|trigger| line.contains(trigger))
    }
}

/// Immutable, validated rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<SeverityRule>,
    default_severity: Severity,
}

impl RuleTable {
    /// Build a table from rules in priority order.
    ///
    /// Triggers are trimmed and lowercased so that matching only has to
    /// lowercase the line.
    pub fn new(
        rules: Vec<SeverityRule>,
        default_severity: Severity,
    ) -> Result<Self, RuleTableError> {
        if rules.is_empty() {
            return Err(RuleTableError::Empty);
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(rules.len());
        for rule in rules {
            if !seen.insert(rule.severity) {
                return Err(RuleTableError::DuplicateSeverity(rule.severity));
            }

            let mut triggers = Vec::with_capacity(rule.triggers.len());
            for trigger in &rule.triggers {
                let trigger = trigger.trim().to_lowercase();
                if trigger.is_empty() {
                    return Err(RuleTableError::EmptyTrigger(rule.severity));
                }
                triggers.push(trigger);
            }

            normalized.push(SeverityRule {
                severity: rule.severity,
                triggers,
            });
        }

        Ok(Self {
            rules: normalized,
            default_severity,
        })
    }

    pub fn rules(&self) -> &[SeverityRule] {
        &self.rules
    }

    pub fn default_severity(&self) -> Severity {
        self.default_severity
    }

    /// Classify a raw line. Total: always yields exactly one severity.
    pub fn classify(&self, line: &str) -> Severity {
        self.classify_lowercased(&line.to_lowercase())
    }

    /// Classify a line the caller has already lowercased
    pub(crate) fn classify_lowercased(&self, lowered: &str) -> Severity {
        self.rules
            .iter()
            .find(|rule| rule.matches_lowercased(lowered))
            .map(|rule| rule.severity)
            .unwrap_or(self.default_severity)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            default_severity: Severity::Info,
        }
    }
}

/// Built-in rule table in priority order
pub fn default_rules() -> Vec<SeverityRule> {
    vec![
        SeverityRule::new(
            Severity::Info,
            &["info", "success", "started", "completed", "connected"],
        ),
        SeverityRule::new(
            Severity::Warning,
            &["warning", "warn", "failed", "timeout", "retry"],
        ),
        SeverityRule::new(
            Severity::Error,
            &["error", "denied", "exception", "refused"],
        ),
        SeverityRule::new(
            Severity::Critical,
            &["critical", "fatal", "root", "unauthorized", "panic"],
        ),
    ]
}

/// Classify `line` against `table`
pub fn classify(line: &str, table: &RuleTable) -> Severity {
    table.classify(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_tags_known_triggers() {
        let table = RuleTable::default();
        assert_eq!(table.classify("2024-01-01 Failed attempt"), Severity::Warning);
        assert_eq!(
            table.classify("2024-01-01 root access granted"),
            Severity::Critical
        );
        assert_eq!(table.classify("Permission denied"), Severity::Error);
        assert_eq!(table.classify("nothing to see here"), Severity::Info);
    }

    #[test]
    fn test_case_does_not_change_the_result() {
        let table = RuleTable::default();
        assert_eq!(
            table.classify("ERROR occurred"),
            table.classify("error occurred")
        );
    }

    #[test]
    fn test_earlier_rule_wins_over_later_rule() {
        let table = RuleTable::default();
        // "critical" appears first in the line, but WARNING is declared first
        assert_eq!(
            table.classify("critical: request failed"),
            Severity::Warning
        );
    }

    #[test]
    fn test_declared_order_is_respected() {
        let table = RuleTable::new(
            vec![
                SeverityRule::new(Severity::Critical, &["disk"]),
                SeverityRule::new(Severity::Warning, &["full"]),
            ],
            Severity::Info,
        )
        .unwrap();
        assert_eq!(table.classify("disk full"), Severity::Critical);
        assert_eq!(table.classify("queue full"), Severity::Warning);
    }

    #[test]
    fn test_unmatched_line_gets_configured_default() {
        let table = RuleTable::new(
            vec![SeverityRule::new(Severity::Error, &["boom"])],
            Severity::Warning,
        )
        .unwrap();
        assert_eq!(table.classify("all quiet"), Severity::Warning);
    }

    #[test]
    fn test_triggers_are_normalized() {
        let table = RuleTable::new(
            vec![SeverityRule::new(Severity::Error, &["  OOM Killer "])],
            Severity::Info,
        )
        .unwrap();
        assert_eq!(table.rules()[0].triggers, vec!["oom killer".to_string()]);
        assert_eq!(table.classify("invoked oom killer"), Severity::Error);
    }

    #[test]
    fn test_invalid_tables_are_rejected() {
        assert_eq!(
            RuleTable::new(Vec::new(), Severity::Info),
            Err(RuleTableError::Empty)
        );
        assert_eq!(
            RuleTable::new(
                vec![SeverityRule::new(Severity::Error, &["ok", "  "])],
                Severity::Info
            ),
            Err(RuleTableError::EmptyTrigger(Severity::Error))
        );
        assert_eq!(
            RuleTable::new(
                vec![
                    SeverityRule::new(Severity::Error, &["a"]),
                    SeverityRule::new(Severity::Error, &["b"]),
                ],
                Severity::Info
            ),
            Err(RuleTableError::DuplicateSeverity(Severity::Error))
        );
    }
}
