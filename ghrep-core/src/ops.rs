//! Operation payloads attached to targets, and the parse result that maps
//! targets to them.
//!
//! License: MIT OR Apache-2.0

use serde::Serialize;
use std::collections::BTreeMap;

use crate::tactic::Tactic;

/// Topics to add to and remove from one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlusMinusOp {
    pub plus: Vec<String>,
    pub minus: Vec<String>,
}

impl PlusMinusOp {
    pub fn new(plus: Vec<String>, minus: Vec<String>) -> Self {
        Self { plus, minus }
    }

    /// Appends another clause's topics. Duplicates are kept.
    pub fn extend(&mut self, other: &PlusMinusOp) {
        self.plus.extend(other.plus.iter().cloned());
        self.minus.extend(other.minus.iter().cloned());
    }
}

/// One search, or search-and-replace, request.
///
/// `replace` is `None` for plain searches. `modifier` is kept exactly as
/// typed (`gi` stays `gi`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchReplaceOp {
    pub search: String,
    pub replace: Option<String>,
    pub modifier: String,
}

impl SearchReplaceOp {
    pub fn search(search: impl Into<String>, modifier: impl Into<String>) -> Self {
        Self { search: search.into(), replace: None, modifier: modifier.into() }
    }

    pub fn replace(
        search: impl Into<String>,
        replace: impl Into<String>,
        modifier: impl Into<String>,
    ) -> Self {
        Self { search: search.into(), replace: Some(replace.into()), modifier: modifier.into() }
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.modifier.contains('i')
    }

    pub fn is_global(&self) -> bool {
        self.modifier.contains('g')
    }
}

/// What a single target will have done to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TargetOps {
    PlusMinus(PlusMinusOp),
    Patterns(Vec<SearchReplaceOp>),
}

/// Mapping from validated target name to its operations.
///
/// Built once by [`crate::terms::ParseTerms::parse`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    tactic: Tactic,
    targets: BTreeMap<String, TargetOps>,
}

impl ParseResult {
    pub(crate) fn new(tactic: Tactic, targets: BTreeMap<String, TargetOps>) -> Self {
        Self { tactic, targets }
    }

    pub fn tactic(&self) -> Tactic {
        self.tactic
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }

    /// Target names in sorted order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn get(&self, target: &str) -> Option<&TargetOps> {
        self.targets.get(target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetOps)> {
        self.targets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn plus_minus(&self, target: &str) -> Option<&PlusMinusOp> {
        match self.targets.get(target)? {
            TargetOps::PlusMinus(op) => Some(op),
            TargetOps::Patterns(_) => None,
        }
    }

    pub fn patterns(&self, target: &str) -> Option<&[SearchReplaceOp]> {
        match self.targets.get(target)? {
            TargetOps::Patterns(ops) => Some(ops),
            TargetOps::PlusMinus(_) => None,
        }
    }
}
