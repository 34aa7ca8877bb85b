use regex::{Regex, RegexBuilder};

use crate::contract::{ExportRecord, ResultSet, DEFAULT_EXPORT_FILTER};
use crate::error::ResolveError;

/// Compiled, case-insensitive export name filters.
#[derive(Debug, Clone)]
pub struct ExportFilterSet {
    matchers: Vec<Regex>,
}

impl ExportFilterSet {
    /// Compiles every pattern, failing on the first invalid one.
    /// An empty pattern list compiles to the match-everything default.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ResolveError> {
        if patterns.is_empty() {
            return Self::compile(&[DEFAULT_EXPORT_FILTER]);
        }

        let matchers = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ResolveError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { matchers })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matchers.iter().any(|matcher| matcher.is_match(name))
    }
}

pub fn select_exports(records: &[ExportRecord], filters: &ExportFilterSet) -> ResultSet {
    records
        .iter()
        .filter(|record| filters.matches(&record.name))
        .map(|record| (record.name.clone(), record.value.clone()))
        .collect()
}
