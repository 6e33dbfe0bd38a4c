use super::error::FilterParseError;

/// Case-insensitive any-of substring filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordFilter {
    /// Keywords as supplied, trimmed
    keywords: Vec<String>,
    /// Lowercased keywords used for matching
    lowered: Vec<String>,
}

impl KeywordFilter {
    /// Build a filter from raw keywords.
    ///
    /// Keywords are trimmed and empty entries dropped. Duplicates (ignoring
    /// case) are collapsed. An empty result is a usage error.
    pub fn new<I, S>(keywords: I) -> Result<Self, FilterParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = Vec::new();
        let mut lowered: Vec<String> = Vec::new();

        for keyword in keywords {
            let trimmed = keyword.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let lower = trimmed.to_lowercase();
            if lowered.contains(&lower) {
                continue;
            }
            kept.push(trimmed.to_string());
            lowered.push(lower);
        }

        if kept.is_empty() {
            return Err(FilterParseError::NoKeywords);
        }

        Ok(Self {
            keywords: kept,
            lowered,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn matches(&self, line: &str) -> bool {
        self.matches_lowercased(&line.to_lowercase())
    }

    pub(crate) fn matches_lowercased(&self, lowered_line: &str) -> bool {
        self.lowered
            .iter()
            .any(|keyword| lowered_line.contains(keyword.as_str()))
    }
}
