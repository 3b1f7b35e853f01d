use crate::core::database::Database;
use crate::domain::model::{LookupResult, Properties};
use crate::domain::ports::{Detector, Storage};
use crate::utils::error::Result;

/// A pattern found for a user agent.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch<'a> {
    pub pattern: String,
    pub length: usize,
    pub properties: Option<&'a Properties>,
}

/// Browscap lookups over a converted [`Database`].
pub struct Browscapy {
    database: Database,
    case_insensitive_fallback: bool,
}

impl Browscapy {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            case_insensitive_fallback: true,
        }
    }

    pub async fn open<S: Storage>(storage: &S) -> Result<Self> {
        Ok(Self::new(Database::load(storage).await?))
    }

    pub fn with_case_insensitive_fallback(mut self, enabled: bool) -> Self {
        self.case_insensitive_fallback = enabled;
        self
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Exact-case search first; when nothing matches, retries ignoring case.
    pub fn search(&self, user_agent: &str) -> Option<SearchMatch<'_>> {
        let tree = &self.database.tree;
        let found = tree.find_best(user_agent, false).or_else(|| {
            if self.case_insensitive_fallback {
                tree.find_best(user_agent, true)
            } else {
                None
            }
        })?;

        Some(SearchMatch {
            properties: self.database.properties(found.entry),
            pattern: found.pattern,
            length: found.length,
        })
    }
}

impl Detector for Browscapy {
    fn lookup(&self, user_agent: &str) -> Result<LookupResult> {
        let result = match self.search(user_agent) {
            Some(found) => LookupResult {
                browser_name: found.pattern.clone(),
                pattern: Some(found.pattern),
                properties: found.properties.cloned(),
            },
            None => LookupResult::no_match(),
        };
        tracing::trace!("{} -> {}", user_agent, result.browser_name);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::DatabaseBuilder;

    fn browscapy(rows: &[(&str, &str)]) -> Browscapy {
        let mut builder = DatabaseBuilder::new();
        for (pattern, browser) in rows {
            builder
                .add(Properties::from_row(["PropertyName", "Browser"], [*pattern, *browser]))
                .unwrap();
        }
        Browscapy::new(builder.finish(None))
    }

    const FIREFOX_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:57.0) Gecko/20100101 Firefox/57.0";

    #[test]
    fn test_case_insensitive_fallback() {
        let searcher = browscapy(&[("mozilla/5.0 (*linux*x86_64*) gecko* firefox/57.0*", "Firefox")]);

        let found = searcher.search(FIREFOX_UA).unwrap();
        assert_eq!(found.pattern, "mozilla/5.0 (*linux*x86_64*) gecko* firefox/57.0*");
        assert_eq!(found.properties.unwrap().browser(), Some("Firefox"));

        let strict = searcher.with_case_insensitive_fallback(false);
        assert!(strict.search(FIREFOX_UA).is_none());
    }

    #[test]
    fn test_exact_case_preferred() {
        let searcher = browscapy(&[
            ("mozilla/5.0 (*linux*x86_64*) gecko* firefox/57.0*", "lowercase"),
            ("Mozilla/5.0 (*Linux*) Gecko* Firefox/57.0*", "Firefox"),
        ]);
        let found = searcher.search(FIREFOX_UA).unwrap();
        assert_eq!(found.properties.unwrap().browser(), Some("Firefox"));
    }

    #[test]
    fn test_lookup_reports_pattern_as_browser_name() {
        let searcher = browscapy(&[("curl/*", "cURL"), ("*", "Default Browser")]);

        let curl = searcher.lookup("curl/7.52.1").unwrap();
        assert_eq!(curl.browser_name, "curl/*");
        assert_eq!(curl.properties.unwrap().browser(), Some("cURL"));

        let other = searcher.lookup("Wget/1.0").unwrap();
        assert_eq!(other, LookupResult::no_match());

        let blank = searcher.lookup("").unwrap();
        assert_eq!(blank.browser_name, "-");
    }

    #[test]
    fn test_catch_all_does_not_block_fallback() {
        let searcher = browscapy(&[
            ("mozilla/5.0 (*linux*x86_64*) gecko* firefox/57.0*", "Firefox"),
            ("*", "Default Browser"),
        ]);
        let result = searcher.lookup(FIREFOX_UA).unwrap();
        assert_eq!(result.browser_name, "mozilla/5.0 (*linux*x86_64*) gecko* firefox/57.0*");
        assert_eq!(result.properties.unwrap().browser(), Some("Firefox"));
    }

    #[test]
    fn test_lookup_without_match() {
        let searcher = browscapy(&[("curl/*", "cURL")]);
        let result = searcher.lookup("Wget/1.0").unwrap();
        assert_eq!(result, LookupResult::no_match());
    }
}
