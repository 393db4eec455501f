//! Operation modes of a term spec and their autodetection.
//!
//! A term spec is read in one of three ways: topic edits (`+topic`,
//! `-topic`), searches (`s/term/i`) or search-and-replace
//! (`s/term/replacement/gi`). When the caller has not picked one, the
//! classifier looks at the tokens and picks the first tactic whose token
//! shape appears anywhere in the input.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::delimiter::Delimiter;
use crate::errors::GhrepError;

lazy_static! {
    pub(crate) static ref PLUS_MINUS_TOKEN: Regex = Regex::new(r"^[+-]").unwrap();
    /// `s?/search(/i?)?`: no replacement half, only the `i` modifier.
    pub(crate) static ref SEARCH_TOKEN: Regex = Regex::new(r"^s?/([^/]+)(/i?)?$").unwrap();
    /// `s?/search/replace/[ig]*`; the replacement may itself contain slashes.
    pub(crate) static ref SEARCH_REPLACE_TOKEN: Regex =
        Regex::new(r"^s?/([^/]+)/(.*)(/[ig]*)$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tactic {
    PlusMinus,
    Search,
    SearchReplace,
}

impl Tactic {
    /// The word used for this tactic's payload in user-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Tactic::PlusMinus => "topic",
            Tactic::Search => "search",
            Tactic::SearchReplace => "search_replace",
        }
    }

    pub fn is_pattern(&self) -> bool {
        !matches!(self, Tactic::PlusMinus)
    }
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tactic::PlusMinus => "plus_minus",
            Tactic::Search => "search",
            Tactic::SearchReplace => "search_replace",
        };
        f.write_str(name)
    }
}

/// Picks a tactic from raw tokens.
///
/// Rules are tried in order: any sign-prefixed token means topic edits, any
/// single-pattern token means search, any two-pattern token means
/// search-and-replace. The order matters because a naive search shape would
/// also accept parts of a replacement token.
pub fn classify_tactic<S: AsRef<str>>(
    tokens: &[S],
    delimiter: &Delimiter,
) -> Result<Tactic, GhrepError> {
    let words = delimiter.split_all(tokens);

    let tactic = if words.iter().any(|w| PLUS_MINUS_TOKEN.is_match(w)) {
        Tactic::PlusMinus
    } else if words.iter().any(|w| SEARCH_TOKEN.is_match(w)) {
        Tactic::Search
    } else if words.iter().any(|w| SEARCH_REPLACE_TOKEN.is_match(w)) {
        Tactic::SearchReplace
    } else {
        return Err(GhrepError::TacticUndetectable);
    };

    debug!("Autodetected tactic {} from {} token(s).", tactic, words.len());
    Ok(tactic)
}
