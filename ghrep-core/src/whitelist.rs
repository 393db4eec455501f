// File: ghrep-core/src/whitelist.rs
//! Validation of selector tokens against the set of known target names.
//!
//! The whitelist is supplied by the caller (usually the list of repositories
//! fetched once before a batch of parses) and is only ever read here. A
//! selector resolves to a set of concrete names through, in order: the `:all`
//! sentinel, a `^` negation marker, an exact name, and finally an anchored
//! regular expression over the whitelist.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Token that expands to every whitelisted name.
pub const ALL_SENTINEL: &str = ":all";

/// Prefix marking a selector as a removal from the current selection.
pub const NEGATION_PREFIX: char = '^';

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Whitelist {
    /// Every token is accepted verbatim. There is no known universe, so
    /// `:all` stays as the sentinel for the caller to expand.
    #[default]
    Any,
    Names(Vec<String>),
}

/// The outcome of resolving one selector token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Names(Vec<String>),
    /// A `^`-prefixed token, returned raw. The caller decides what it subtracts from.
    Negation(String),
}

/// Marker for a token that matched nothing. The parser turns this into an
/// `InvalidToken` carrying the active tactic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unresolvable;

impl Whitelist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Whitelist::Names(names.into_iter().map(Into::into).collect())
    }

    /// Every known name, in whitelist order. An open whitelist yields the
    /// `:all` sentinel itself.
    pub fn all(&self) -> Vec<String> {
        match self {
            Whitelist::Any => vec![ALL_SENTINEL.to_string()],
            Whitelist::Names(names) => names.clone(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            Whitelist::Any => true,
            Whitelist::Names(names) => names.iter().any(|n| n == name),
        }
    }

    pub fn resolve(&self, token: &str) -> Result<Resolved, Unresolvable> {
        if token == ALL_SENTINEL {
            return Ok(Resolved::Names(self.all()));
        }
        if token.starts_with(NEGATION_PREFIX) {
            return Ok(Resolved::Negation(token.to_string()));
        }
        if self.contains(token) {
            return Ok(Resolved::Names(vec![token.to_string()]));
        }

        let Whitelist::Names(names) = self else {
            return Err(Unresolvable);
        };
        // Not a known name, so try it as an anchored pattern.
        let Ok(re) = Regex::new(&format!("^(?:{})$", token)) else {
            debug!("Selector '{}' is neither a known name nor a valid pattern.", token);
            return Err(Unresolvable);
        };
        let matched: Vec<String> = names.iter().filter(|n| re.is_match(n)).cloned().collect();
        if matched.is_empty() {
            return Err(Unresolvable);
        }
        debug!("Selector '{}' matched {} name(s) as a pattern.", token, matched.len());
        Ok(Resolved::Names(matched))
    }

    /// Resolves a token that must name concrete targets. Nested negations
    /// (`^^x`) have nothing to subtract from and are rejected.
    pub fn resolve_names(&self, token: &str) -> Result<Vec<String>, Unresolvable> {
        match self.resolve(token)? {
            Resolved::Names(names) => Ok(names),
            Resolved::Negation(_) => Err(Unresolvable),
        }
    }
}

/// Something that can produce the list of valid target names, refreshed once
/// before a batch of parses.
pub trait WhitelistProvider {
    fn whitelist(&self) -> Result<Whitelist>;
}

impl WhitelistProvider for Whitelist {
    fn whitelist(&self) -> Result<Whitelist> {
        Ok(self.clone())
    }
}
