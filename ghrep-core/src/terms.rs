// File: ghrep-core/src/terms.rs
//! terms.rs - Parsing of term specs into per-target operations.
//!
//! A term spec is a list of clauses. Each clause is split on the delimiter
//! into tokens, and every token is either an operation payload (a signed
//! topic, or a search/replace pattern) or a selector naming targets. The
//! clause's payload is attached to every target its selectors resolve to.
//!
//! ```text
//! one,two,+rust,-ruby     add `rust` and drop `ruby` on one and two
//! t.*,^three,s/foo/bar/g  replace foo with bar in every t* repo but three
//! s/foo                   search for foo in every repo
//! ```
//!
//! Invalid selectors do not stop the parse. Each one is recorded and the
//! whole parse fails at the end with every bad token listed, so no partial
//! result is ever returned.
//!
//! License: MIT OR Apache-2.0

use log::{debug, warn};
use std::collections::{BTreeMap, HashSet};

use crate::delimiter::Delimiter;
use crate::errors::{GhrepError, InvalidToken};
use crate::ops::{ParseResult, PlusMinusOp, SearchReplaceOp, TargetOps};
use crate::tactic::{Tactic, SEARCH_REPLACE_TOKEN, SEARCH_TOKEN};
use crate::whitelist::{Unresolvable, Whitelist, NEGATION_PREFIX};

/// Selection state threaded through one clause.
#[derive(Debug, Default)]
struct Selection {
    names: Vec<String>,
    saw_positive: bool,
    seeded: bool,
}

impl Selection {
    fn add(&mut self, names: Vec<String>) {
        self.names.extend(names);
        self.saw_positive = true;
    }

    fn subtract(&mut self, names: &[String], whitelist: &Whitelist) {
        // A clause that opens with a negation starts from everything.
        if !self.saw_positive && !self.seeded {
            self.names = whitelist.all();
        }
        self.seeded = true;
        self.names.retain(|n| !names.contains(n));
    }

    /// The final, de-duplicated target list for the clause.
    fn finish(mut self, whitelist: &Whitelist) -> Vec<String> {
        if !self.saw_positive && !self.seeded {
            self.names = whitelist.all();
        }
        let mut seen = HashSet::new();
        self.names.retain(|n| seen.insert(n.clone()));
        self.names
    }
}

/// What one clause contributes besides its selection.
#[derive(Debug)]
enum Payload {
    PlusMinus(PlusMinusOp),
    Patterns(Vec<SearchReplaceOp>),
}

/// Parser for term specs. Holds only borrowed configuration.
#[derive(Debug)]
pub struct ParseTerms<'a> {
    tactic: Tactic,
    delimiter: &'a Delimiter,
    whitelist: &'a Whitelist,
}

impl<'a> ParseTerms<'a> {
    pub fn new(tactic: Tactic, delimiter: &'a Delimiter, whitelist: &'a Whitelist) -> Self {
        Self { tactic, delimiter, whitelist }
    }

    /// Parses `input` clause by clause. An empty input yields an empty result.
    pub fn parse<S: AsRef<str>>(
        tokens: &[S],
        tactic: Tactic,
        delimiter: &Delimiter,
        whitelist: &Whitelist,
    ) -> Result<ParseResult, GhrepError> {
        ParseTerms::new(tactic, delimiter, whitelist).run(tokens)
    }

    pub fn run<S: AsRef<str>>(&self, clauses: &[S]) -> Result<ParseResult, GhrepError> {
        debug!("Parsing {} clause(s) with tactic {}.", clauses.len(), self.tactic);

        let mut targets: BTreeMap<String, TargetOps> = BTreeMap::new();
        let mut errors: Vec<InvalidToken> = Vec::new();

        for clause in clauses {
            let (names, payload) = self.parse_clause(clause.as_ref(), &mut errors);
            for name in names {
                merge(&mut targets, name, &payload);
            }
        }

        if !errors.is_empty() {
            warn!("Term spec rejected with {} invalid token(s).", errors.len());
            return Err(GhrepError::AggregateParseFailure(errors));
        }

        debug!("Term spec resolved to {} target(s).", targets.len());
        Ok(ParseResult::new(self.tactic, targets))
    }

    fn parse_clause(&self, clause: &str, errors: &mut Vec<InvalidToken>) -> (Vec<String>, Payload) {
        let mut selection = Selection::default();
        let mut payload = match self.tactic {
            Tactic::PlusMinus => Payload::PlusMinus(PlusMinusOp::default()),
            Tactic::Search | Tactic::SearchReplace => Payload::Patterns(Vec::new()),
        };

        for word in self.delimiter.split(clause) {
            let consumed = match &mut payload {
                Payload::PlusMinus(op) => take_sign(word, op),
                Payload::Patterns(ops) => match self.pattern_op(word) {
                    Some(op) => {
                        ops.push(op);
                        true
                    }
                    None => false,
                },
            };
            if consumed {
                continue;
            }
            if self.select(word, &mut selection).is_err() {
                errors.push(InvalidToken::new(word, self.tactic));
            }
        }

        (selection.finish(self.whitelist), payload)
    }

    /// Parses a search or search-and-replace token for the active tactic.
    fn pattern_op(&self, word: &str) -> Option<SearchReplaceOp> {
        match self.tactic {
            Tactic::Search => {
                let caps = SEARCH_TOKEN.captures(word)?;
                let modifier = caps.get(2).map_or("", |m| m.as_str().trim_start_matches('/'));
                Some(SearchReplaceOp::search(&caps[1], modifier))
            }
            Tactic::SearchReplace => {
                let caps = SEARCH_REPLACE_TOKEN.captures(word)?;
                let modifier = caps[3].trim_start_matches('/');
                Some(SearchReplaceOp::replace(&caps[1], &caps[2], modifier))
            }
            Tactic::PlusMinus => None,
        }
    }

    fn select(&self, word: &str, selection: &mut Selection) -> Result<(), Unresolvable> {
        match word.strip_prefix(NEGATION_PREFIX) {
            Some(negated) => {
                let names = self.whitelist.resolve_names(negated)?;
                selection.subtract(&names, self.whitelist);
            }
            None => selection.add(self.whitelist.resolve_names(word)?),
        }
        Ok(())
    }
}

fn take_sign(word: &str, op: &mut PlusMinusOp) -> bool {
    if let Some(topic) = word.strip_prefix('+') {
        op.plus.push(topic.to_string());
        true
    } else if let Some(topic) = word.strip_prefix('-') {
        op.minus.push(topic.to_string());
        true
    } else {
        false
    }
}

fn merge(targets: &mut BTreeMap<String, TargetOps>, name: String, payload: &Payload) {
    let entry = targets.entry(name).or_insert_with(|| match payload {
        Payload::PlusMinus(_) => TargetOps::PlusMinus(PlusMinusOp::default()),
        Payload::Patterns(_) => TargetOps::Patterns(Vec::new()),
    });
    match (entry, payload) {
        (TargetOps::PlusMinus(existing), Payload::PlusMinus(op)) => existing.extend(op),
        (TargetOps::Patterns(existing), Payload::Patterns(ops)) => {
            existing.extend(ops.iter().cloned());
            let mut seen = HashSet::new();
            existing.retain(|op| seen.insert(op.clone()));
        }
        // A single parse only ever produces one payload kind.
        _ => unreachable!("mixed payload kinds in one parse"),
    }
}
