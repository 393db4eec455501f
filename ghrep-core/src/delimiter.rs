//! Clause delimiters.
//!
//! A term spec is split into tokens either on a literal string (the default
//! is `,`) or on a regular expression.

use regex::Regex;

use crate::errors::GhrepError;

pub const DEFAULT_DELIMITER: &str = ",";

#[derive(Debug, Clone)]
pub enum Delimiter {
    Literal(String),
    Pattern(Regex),
}

impl Delimiter {
    /// A literal delimiter. Empty strings are rejected since they would
    /// split every character into its own token.
    pub fn literal(delim: impl Into<String>) -> Result<Self, GhrepError> {
        let delim = delim.into();
        if delim.is_empty() {
            return Err(GhrepError::InvalidDelimiter("empty literal".to_string()));
        }
        Ok(Delimiter::Literal(delim))
    }

    pub fn pattern(pattern: &str) -> Result<Self, GhrepError> {
        if pattern.is_empty() {
            return Err(GhrepError::InvalidDelimiter("empty pattern".to_string()));
        }
        Regex::new(pattern)
            .map(Delimiter::Pattern)
            .map_err(|e| GhrepError::InvalidDelimiter(format!("'{}': {}", pattern, e)))
    }

    /// Splits one clause into tokens. Empty tokens are dropped, which matches
    /// how a trailing delimiter (`one,two,`) is usually meant.
    pub fn split<'a>(&self, input: &'a str) -> Vec<&'a str> {
        let parts: Vec<&str> = match self {
            Delimiter::Literal(d) => input.split(d.as_str()).collect(),
            Delimiter::Pattern(re) => re.split(input).collect(),
        };
        parts.into_iter().filter(|p| !p.is_empty()).collect()
    }

    /// Splits every clause and flattens the result into one token list.
    pub fn split_all<'a, S: AsRef<str>>(&self, clauses: &'a [S]) -> Vec<&'a str> {
        clauses.iter().flat_map(|c| self.split(c.as_ref())).collect()
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Literal(DEFAULT_DELIMITER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_split_drops_empty_tokens() {
        let d = Delimiter::default();
        assert_eq!(d.split("one,,two,"), vec!["one", "two"]);
    }

    #[test]
    fn pattern_split() {
        let d = Delimiter::pattern(r"[,;]").unwrap();
        assert_eq!(d.split("one;two,three"), vec!["one", "two", "three"]);
    }

    #[test]
    fn rejects_empty_and_broken_delimiters() {
        assert!(matches!(Delimiter::literal(""), Err(GhrepError::InvalidDelimiter(_))));
        assert!(matches!(Delimiter::pattern("(,"), Err(GhrepError::InvalidDelimiter(_))));
    }
}
