//! Query parsing
//!
//! Boolean mode is detected by substring containment of the padded
//! delimiters `" AND "` / `" OR "` on the uppercased input, first match
//! wins. Anything else is whitespace-split with implicit OR. There is
//! deliberately no nested boolean grammar.

use serde::Serialize;

/// How terms combine across one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryMode {
    And,
    Or,
}

/// A parsed search query: mode plus normalized terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub mode: QueryMode,
    pub terms: Vec<String>,
}

impl SearchQuery {
    /// Parse a raw query string.
    ///
    /// Terms come back trimmed, lowercased, and non-empty. An input that
    /// yields no terms (blank, or only operators) is a valid query that
    /// simply matches nothing.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let upper = trimmed.to_uppercase();

        let (mode, parts): (QueryMode, Vec<&str>) = if upper.contains(" AND ") {
            (QueryMode::And, upper.split(" AND ").collect())
        } else if upper.contains(" OR ") {
            (QueryMode::Or, upper.split(" OR ").collect())
        } else {
            (QueryMode::Or, trimmed.split(' ').collect())
        };

        let terms = parts
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self { mode, terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_and() {
        let q = SearchQuery::parse("cat AND dog");
        assert_eq!(q.mode, QueryMode::And);
        assert_eq!(q.terms, vec!["cat", "dog"]);
    }

    #[test]
    fn explicit_or() {
        let q = SearchQuery::parse("cat OR dog");
        assert_eq!(q.mode, QueryMode::Or);
        assert_eq!(q.terms, vec!["cat", "dog"]);
    }

    #[test]
    fn implicit_or_on_spaces() {
        let q = SearchQuery::parse("cat dog");
        assert_eq!(q.mode, QueryMode::Or);
        assert_eq!(q.terms, vec!["cat", "dog"]);
    }

    #[test]
    fn and_takes_precedence_over_or() {
        // First match wins; OR is swallowed into a term.
        let q = SearchQuery::parse("cat AND dog OR bird");
        assert_eq!(q.mode, QueryMode::And);
        assert_eq!(q.terms, vec!["cat", "dog or bird"]);
    }

    #[test]
    fn operators_are_case_insensitive() {
        let q = SearchQuery::parse("cat and dog");
        assert_eq!(q.mode, QueryMode::And);
        assert_eq!(q.terms, vec!["cat", "dog"]);
    }

    #[test]
    fn operator_needs_surrounding_spaces() {
        // "sand" contains "and" but must stay a single term.
        let q = SearchQuery::parse("sand");
        assert_eq!(q.mode, QueryMode::Or);
        assert_eq!(q.terms, vec!["sand"]);

        let q = SearchQuery::parse("android phone");
        assert_eq!(q.mode, QueryMode::Or);
        assert_eq!(q.terms, vec!["android", "phone"]);
    }

    #[test]
    fn terms_are_lowercased_and_trimmed() {
        let q = SearchQuery::parse("  Invoice AND  TOTAL ");
        assert_eq!(q.mode, QueryMode::And);
        assert_eq!(q.terms, vec!["invoice", "total"]);
    }

    #[test]
    fn empty_input_yields_no_terms() {
        assert!(SearchQuery::parse("").is_empty());
        assert!(SearchQuery::parse("   ").is_empty());
    }

    #[test]
    fn operator_only_input_yields_no_terms() {
        assert!(SearchQuery::parse(" AND ").is_empty());
        assert!(SearchQuery::parse(" OR ").is_empty());
    }

    #[test]
    fn blank_fragments_are_discarded() {
        let q = SearchQuery::parse("cat AND  AND dog");
        assert_eq!(q.mode, QueryMode::And);
        assert_eq!(q.terms, vec!["cat", "dog"]);
    }
}
