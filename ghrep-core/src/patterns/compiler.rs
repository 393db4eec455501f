//! compiler.rs - Compiles search/replace operations into boundary-anchored patterns.
//!
//! Every operation becomes exactly four variants, one per combination of
//! "boundary character or line edge" on each side of the term. A boundary
//! class alone cannot match a term at the very start or end of a line since
//! there is no character there to test, hence the line-anchored variants.
//!
//! For replacements the captured boundary characters are written back
//! around the replacement text, so only the term itself changes.
//!
//! Compiled patterns are cached per `BoundaryCompiler`, keyed by the
//! operation, so re-compiling the same term is a map lookup.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::errors::GhrepError;
use crate::ops::SearchReplaceOp;

/// Anything that is not alphanumeric, a dot or a hyphen ends a term.
pub const DEFAULT_BOUNDARY: &str = "[^a-zA-Z0-9.-]";

/// Separator between alternatives of a search pattern.
pub const SEARCH_JOINER: &str = "|";
/// Separator between Perl substitution rules; the comma operator runs them in order.
pub const RULE_JOINER: &str = ",";

lazy_static! {
    static ref UNESCAPED_SLASH: Regex = Regex::new(r"(^|[^\\])((?:\\\\)*)/").unwrap();
}

/// Which side of the term is anchored by what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchoring {
    /// boundary before, boundary after
    Boundaries,
    /// boundary before, end of line after
    BoundaryThenEol,
    /// start of line before, boundary after
    BolThenBoundary,
    /// the term is the whole line
    WholeLine,
}

impl Anchoring {
    pub const ALL: [Anchoring; 4] = [
        Anchoring::Boundaries,
        Anchoring::BoundaryThenEol,
        Anchoring::BolThenBoundary,
        Anchoring::WholeLine,
    ];

    pub fn has_front(&self) -> bool {
        matches!(self, Anchoring::Boundaries | Anchoring::BoundaryThenEol)
    }

    pub fn has_back(&self) -> bool {
        matches!(self, Anchoring::Boundaries | Anchoring::BolThenBoundary)
    }
}

/// A compiled operation: four pattern strings plus the modifier the
/// executing tool needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    /// One entry per `Anchoring::ALL`, in that order.
    pub variants: Vec<String>,
    pub modifier: String,
    /// `true` for substitution rules, `false` for search alternatives.
    pub is_replace: bool,
    pub(crate) boundary: String,
    pub(crate) search: String,
    pub(crate) replace: Option<String>,
}

impl CompiledPattern {
    pub fn joiner(&self) -> &'static str {
        if self.is_replace { RULE_JOINER } else { SEARCH_JOINER }
    }

    /// The single string handed to the external tool.
    pub fn joined(&self) -> String {
        self.variants.join(self.joiner())
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.modifier.contains('i')
    }
}

/// Escapes characters that regular expression dialects (ERE, Perl and the
/// `regex` crate) treat as syntax, so the term is matched literally.
pub fn escape_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() * 2);
    for c in term.chars() {
        if matches!(c, '\\' | '.' | '^' | '$' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes every `/` not already escaped so it can sit inside `s/../../`.
pub fn escape_slashes(text: &str) -> String {
    // Two passes: adjacent slashes share the character between matches.
    let once = UNESCAPED_SLASH.replace_all(text, "$1$2\\/");
    UNESCAPED_SLASH.replace_all(&once, "$1$2\\/").into_owned()
}

/// Escapes `@` so Perl does not interpolate an array into the rule.
pub fn escape_perl_sigils(text: &str) -> String {
    text.replace('@', r"\@")
}

/// Builds the four search alternatives. `search` must already be a single
/// atom (escaped or grouped).
fn search_variants(boundary: &str, search: &str) -> Vec<String> {
    vec![
        format!("{b}{s}{b}", b = boundary, s = search),
        format!("{b}{s}$", b = boundary, s = search),
        format!("^{s}{b}", b = boundary, s = search),
        format!("^{s}$", s = search),
    ]
}

/// Builds the four Perl substitution rules. `search` must already be a
/// single atom and both texts must be safe inside `s/../../`.
fn replace_variants(boundary: &str, search: &str, replace: &str, modifier: &str) -> Vec<String> {
    vec![
        format!(
            "s/(?<front>{b}){s}(?<back>{b})/$+{{front}}{r}$+{{back}}/{m}",
            b = boundary, s = search, r = replace, m = modifier
        ),
        format!("s/(?<front>{b}){s}$/$+{{front}}{r}/{m}", b = boundary, s = search, r = replace, m = modifier),
        format!("s/^{s}(?<back>{b})/{r}$+{{back}}/{m}", b = boundary, s = search, r = replace, m = modifier),
        format!("s/^{s}$/{r}/{m}", s = search, r = replace, m = modifier),
    ]
}

/// Compiles one operation into its four boundary variants.
///
/// * `boundary` - a regex fragment matching one "not part of the term" character.
/// * `op` - the parsed operation; `replace` decides between search and substitution output.
/// * `raw_regex` - when `true` the search text is used as a pattern, unescaped.
///   It is grouped so an alternation inside it stays between the anchors.
pub fn compile_boundary_patterns(boundary: &str, op: &SearchReplaceOp, raw_regex: bool) -> CompiledPattern {
    let search = if raw_regex { op.search.clone() } else { escape_term(&op.search) };

    let variants = match &op.replace {
        Some(replace) => {
            let (atom, replace) = if raw_regex {
                (format!("(?:{})", escape_slashes(&search)), escape_slashes(replace))
            } else {
                (
                    escape_perl_sigils(&escape_slashes(&search)),
                    escape_perl_sigils(&escape_slashes(replace)),
                )
            };
            replace_variants(boundary, &atom, &replace, &op.modifier)
        }
        None if raw_regex => search_variants(boundary, &format!("({})", search)),
        None => search_variants(boundary, &search),
    };

    CompiledPattern {
        variants,
        modifier: op.modifier.clone(),
        is_replace: op.replace.is_some(),
        boundary: boundary.to_string(),
        search,
        replace: op.replace.clone(),
    }
}

/// Joins several compiled patterns for one tool invocation, grouped by
/// modifier since a search tool takes its flags once per run. Substitution
/// rules carry their own modifier and always end up in one group.
pub fn group_by_modifier(patterns: &[Arc<CompiledPattern>]) -> Vec<(String, String)> {
    let mut groups: Vec<(String, Vec<String>, &'static str)> = Vec::new();
    for pattern in patterns {
        let key = if pattern.is_replace { String::new() } else { pattern.modifier.clone() };
        match groups.iter_mut().find(|(m, _, _)| *m == key) {
            Some((_, parts, _)) => parts.push(pattern.joined()),
            None => groups.push((key, vec![pattern.joined()], pattern.joiner())),
        }
    }
    groups
        .into_iter()
        .map(|(modifier, parts, joiner)| (modifier, parts.join(joiner)))
        .collect()
}

/// Compiles operations against one boundary and remembers the results.
#[derive(Debug)]
pub struct BoundaryCompiler {
    boundary: String,
    raw_regex: bool,
    cache: RwLock<HashMap<SearchReplaceOp, Arc<CompiledPattern>>>,
}

impl BoundaryCompiler {
    /// Fails if `boundary` is not a valid regular expression.
    pub fn new(boundary: impl Into<String>, raw_regex: bool) -> Result<Self, GhrepError> {
        let boundary = boundary.into();
        Regex::new(&boundary).map_err(|e| GhrepError::InvalidBoundary(boundary.clone(), e))?;
        Ok(Self { boundary, raw_regex, cache: RwLock::new(HashMap::new()) })
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn raw_regex(&self) -> bool {
        self.raw_regex
    }

    pub fn get_or_compile(&self, op: &SearchReplaceOp) -> Arc<CompiledPattern> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(compiled) = cache.get(op) {
                debug!("Serving compiled pattern for '{}' from cache.", op.search);
                return Arc::clone(compiled);
            }
        }

        let compiled = Arc::new(compile_boundary_patterns(&self.boundary, op, self.raw_regex));
        debug!("Compiled '{}' into {} variants.", op.search, compiled.variants.len());
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op.clone(), Arc::clone(&compiled));
        compiled
    }

    pub fn compile_all(&self, ops: &[SearchReplaceOp]) -> Vec<Arc<CompiledPattern>> {
        ops.iter().map(|op| self.get_or_compile(op)).collect()
    }
}

impl Default for BoundaryCompiler {
    fn default() -> Self {
        Self {
            boundary: DEFAULT_BOUNDARY.to_string(),
            raw_regex: false,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_variants_for_cat() {
        let compiled = compile_boundary_patterns("[^a-z]", &SearchReplaceOp::search("cat", ""), false);
        assert_eq!(
            compiled.variants,
            vec!["[^a-z]cat[^a-z]", "[^a-z]cat$", "^cat[^a-z]", "^cat$"]
        );
        assert_eq!(compiled.joined(), "[^a-z]cat[^a-z]|[^a-z]cat$|^cat[^a-z]|^cat$");
    }

    #[test]
    fn boundary_alternation_matches_whole_tokens_only() {
        let compiled = compile_boundary_patterns("[^a-z]", &SearchReplaceOp::search("cat", ""), false);
        let any = Regex::new(&compiled.joined()).unwrap();
        assert!(any.is_match("cat"));
        assert!(any.is_match(" cat "));
        assert!(any.is_match("cat at the start"));
        assert!(any.is_match("ends with cat"));
        assert!(!any.is_match("category"));
        for variant in &compiled.variants {
            assert!(!Regex::new(variant).unwrap().is_match("category"), "{} matched", variant);
        }
    }

    #[test]
    fn replace_rules_re_emit_boundaries() {
        let compiled =
            compile_boundary_patterns(DEFAULT_BOUNDARY, &SearchReplaceOp::replace("foo.com", "bar.org", "g"), false);
        assert_eq!(
            compiled.variants[0],
            r"s/(?<front>[^a-zA-Z0-9.-])foo\.com(?<back>[^a-zA-Z0-9.-])/$+{front}bar.org$+{back}/g"
        );
        assert_eq!(compiled.variants[1], r"s/(?<front>[^a-zA-Z0-9.-])foo\.com$/$+{front}bar.org/g");
        assert_eq!(compiled.variants[2], r"s/^foo\.com(?<back>[^a-zA-Z0-9.-])/bar.org$+{back}/g");
        assert_eq!(compiled.variants[3], r"s/^foo\.com$/bar.org/g");
        assert_eq!(compiled.joined().matches(RULE_JOINER).count(), 3);
    }

    #[test]
    fn raw_mode_keeps_pattern_syntax() {
        let op = SearchReplaceOp::search("fo+", "");
        assert_eq!(compile_boundary_patterns("x", &op, true).variants[3], "^(fo+)$");
        assert_eq!(compile_boundary_patterns("x", &op, false).variants[3], r"^fo\+$");
    }

    #[test]
    fn raw_alternation_stays_inside_the_anchors() {
        let search = compile_boundary_patterns("[^a-z]", &SearchReplaceOp::search("cat|dog", ""), true);
        for variant in &search.variants {
            let re = Regex::new(variant).unwrap();
            assert!(!re.is_match("category"), "{} matched", variant);
            assert!(!re.is_match("hotdog"), "{} matched", variant);
        }
        assert!(Regex::new(&search.joined()).unwrap().is_match("a dog"));

        let replace = compile_boundary_patterns("[^a-z]", &SearchReplaceOp::replace("cat|dog", "x", "g"), true);
        assert_eq!(replace.variants[3], "s/^(?:cat|dog)$/x/g");
        assert_eq!(replace.apply("category").unwrap(), "category");
        assert_eq!(replace.apply("a dog").unwrap(), "a x");
    }

    #[test]
    fn literal_mode_escapes_perl_array_sigils() {
        let op = SearchReplaceOp::replace("x", "me@example.com", "g");
        let compiled = compile_boundary_patterns(DEFAULT_BOUNDARY, &op, false);
        assert_eq!(compiled.variants[3], r"s/^x$/me\@example.com/g");
        assert!(compiled.variants.iter().all(|v| v.contains(r"me\@example.com")));
        assert_eq!(compiled.apply("contact x now").unwrap(), "contact me@example.com now");

        let raw = compile_boundary_patterns(DEFAULT_BOUNDARY, &op, true);
        assert!(raw.variants[3].contains("me@example.com"));
    }

    #[test]
    fn slashes_in_replacement_are_escaped_once() {
        assert_eq!(escape_slashes("a/b//c"), r"a\/b\/\/c");
        assert_eq!(escape_slashes(r"a\/b"), r"a\/b");
        assert_eq!(escape_slashes("/lead"), r"\/lead");
    }

    #[test]
    fn compiler_caches_per_operation() {
        let compiler = BoundaryCompiler::new("[^a-z]", false).unwrap();
        let op = SearchReplaceOp::search("cat", "i");
        let first = compiler.get_or_compile(&op);
        let second = compiler.get_or_compile(&op);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalid_boundary_is_rejected() {
        assert!(matches!(BoundaryCompiler::new("[^a-z", false), Err(GhrepError::InvalidBoundary(..))));
    }

    #[test]
    fn grouping_by_modifier() {
        let compiler = BoundaryCompiler::default();
        let patterns = compiler.compile_all(&[
            SearchReplaceOp::search("a", ""),
            SearchReplaceOp::search("b", "i"),
            SearchReplaceOp::search("c", ""),
        ]);
        let groups = group_by_modifier(&patterns);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "");
        assert_eq!(groups[0].1, format!("{}|{}", patterns[0].joined(), patterns[2].joined()));
        assert_eq!(groups[1].0, "i");
    }
}
