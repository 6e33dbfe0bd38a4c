use super::error::FilterParseError;
use crate::severity::Severity;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Optional subset of severities a match must belong to.
///
/// `SeverityFilter::All` accepts every severity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(BTreeSet<Severity>),
}

impl SeverityFilter {
    pub fn only<I: IntoIterator<Item = Severity>>(severities: I) -> Self {
        SeverityFilter::Only(severities.into_iter().collect())
    }

    pub fn accepts(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Only(set) => set.contains(&severity),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SeverityFilter::All)
    }
}

impl FromStr for SeverityFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(SeverityFilter::All);
        }

        let mut selected = BTreeSet::new();
        for part in trimmed.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let severity = part
                .parse::<Severity>()
                .map_err(FilterParseError::UnknownSeverity)?;
            selected.insert(severity);
        }

        if selected.is_empty() {
            return Err(FilterParseError::EmptySelection);
        }

        Ok(SeverityFilter::Only(selected))
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityFilter::All => f.write_str("all"),
            SeverityFilter::Only(set) => {
                let labels: Vec<&str> = set.iter().map(|s| s.label()).collect();
                f.write_str(&labels.join(","))
            }
        }
    }
}
