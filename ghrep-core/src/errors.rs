//! errors.rs - Custom error types for the ghrep-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use thiserror::Error;

use crate::tactic::Tactic;

/// A single selector token that could not be resolved against the whitelist.
///
/// These are collected while a term spec is parsed and only surface to the
/// caller bundled inside [`GhrepError::AggregateParseFailure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidToken {
    pub token: String,
    pub tactic: Tactic,
}

impl InvalidToken {
    pub fn new(token: impl Into<String>, tactic: Tactic) -> Self {
        Self { token: token.into(), tactic }
    }
}

impl fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid repo or {} string: {}", self.tactic.noun(), self.token)
    }
}

impl std::error::Error for InvalidToken {}

fn join_lines(errors: &[InvalidToken]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
}

/// This enum represents all possible error types in the `ghrep-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GhrepError {
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    #[error("{}", join_lines(.0))]
    AggregateParseFailure(Vec<InvalidToken>),

    #[error("Could not autodetect tactic; supply one explicitly")]
    TacticUndetectable,

    #[error("Invalid search boundary '{0}': {1}")]
    InvalidBoundary(String, regex::Error),

    #[error("repo_spec has no matches: {}", .0.join(", "))]
    InvalidRepoSpec(Vec<String>),

    #[error("Invalid configuration:\n{0}")]
    Config(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}

impl GhrepError {
    /// The per-token failures carried by an aggregate parse failure, if any.
    pub fn invalid_tokens(&self) -> &[InvalidToken] {
        match self {
            GhrepError::AggregateParseFailure(tokens) => tokens,
            _ => &[],
        }
    }
}
