//! In-process application of compiled patterns using the `regex` crate.
//!
//! The external tools work line by line (`perl -p`, `grep`), so this does
//! too: each line is matched without its trailing newline, and rules are
//! applied to it in variant order.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::patterns::compiler::{Anchoring, CompiledPattern};

lazy_static! {
    static ref ESCAPED_SLASH: Regex = Regex::new(r"\\/").unwrap();
    /// `$1`, `${1}`, `$+{name}` or `$name` in a Perl replacement.
    static ref PERL_GROUP_REF: Regex = Regex::new(r"\$\+?\{(\w+)\}|\$(\d+|[A-Za-z_]\w*)").unwrap();
}

/// One rule in `regex` crate form.
#[derive(Debug, Clone)]
pub struct NativeRule {
    pub regex: Regex,
    pub replacement: String,
}

/// Rewrites a Perl replacement into `regex` crate syntax: group references
/// become `${name}` and literal dollars are doubled.
fn native_replacement(replace: &str) -> String {
    let unslashed = ESCAPED_SLASH.replace_all(replace, "/");
    let mut out = String::with_capacity(unslashed.len());
    let mut last = 0;
    for caps in PERL_GROUP_REF.captures_iter(&unslashed) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        out.push_str(&unslashed[last..whole.start].replace('$', "$$"));
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        out.push_str("${");
        out.push_str(name);
        out.push('}');
        last = whole.end;
    }
    out.push_str(&unslashed[last..].replace('$', "$$"));
    out
}

fn build(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(10 * (1 << 20))
        .build()
}

impl CompiledPattern {
    /// The search alternation as a single `regex` crate pattern.
    pub fn search_regex(&self) -> Result<Regex, regex::Error> {
        let alternation = Anchoring::ALL
            .iter()
            .map(|a| self.native_pattern(*a, false))
            .collect::<Vec<_>>()
            .join("|");
        build(&alternation, self.is_case_insensitive())
    }

    /// One variant in `regex` crate syntax. Boundaries are only captured
    /// for substitution, since an alternation cannot repeat group names.
    fn native_pattern(&self, anchoring: Anchoring, capture: bool) -> String {
        let group = |name: &str| {
            if capture {
                format!("(?P<{}>{})", name, self.boundary)
            } else {
                format!("(?:{})", self.boundary)
            }
        };
        let front = if anchoring.has_front() {
            group("front")
        } else {
            "^".to_string()
        };
        let back = if anchoring.has_back() {
            group("back")
        } else {
            "$".to_string()
        };
        format!("{}(?:{}){}", front, self.search, back)
    }

    /// The four substitution rules in `regex` crate form. Empty for searches.
    pub fn native_rules(&self) -> Result<Vec<NativeRule>, regex::Error> {
        let Some(replace) = &self.replace else {
            return Ok(Vec::new());
        };
        let replace = native_replacement(replace);
        Anchoring::ALL
            .iter()
            .map(|anchoring| {
                let mut replacement = String::new();
                if anchoring.has_front() {
                    replacement.push_str("${front}");
                }
                replacement.push_str(&replace);
                if anchoring.has_back() {
                    replacement.push_str("${back}");
                }
                Ok(NativeRule {
                    regex: build(&self.native_pattern(*anchoring, true), self.is_case_insensitive())?,
                    replacement,
                })
            })
            .collect()
    }

    /// Applies the substitution rules to `text`, line by line. Without the
    /// `g` modifier each rule replaces at most once per line.
    pub fn apply<'t>(&self, text: &'t str) -> Result<Cow<'t, str>, regex::Error> {
        let rules = self.native_rules()?;
        if rules.is_empty() {
            return Ok(Cow::Borrowed(text));
        }
        let global = self.modifier.contains('g');

        let mut changed = false;
        let mut out = String::with_capacity(text.len());
        for line in text.split_inclusive('\n') {
            let (body, newline) = match line.strip_suffix('\n') {
                Some(body) => (body, "\n"),
                None => (line, ""),
            };
            let mut current: Cow<str> = Cow::Borrowed(body);
            for rule in &rules {
                let next = if global {
                    rule.regex.replace_all(&current, rule.replacement.as_str())
                } else {
                    rule.regex.replace(&current, rule.replacement.as_str())
                };
                let replaced = match next {
                    Cow::Owned(s) => Some(s),
                    Cow::Borrowed(_) => None,
                };
                if let Some(s) = replaced {
                    changed = true;
                    current = Cow::Owned(s);
                }
            }
            out.push_str(&current);
            out.push_str(newline);
        }

        Ok(if changed { Cow::Owned(out) } else { Cow::Borrowed(text) })
    }

    /// Lines of `text` (1-based number, content) that the search matches.
    pub fn matching_lines<'t>(&self, text: &'t str) -> Result<Vec<(usize, &'t str)>, regex::Error> {
        let re = self.search_regex()?;
        Ok(text
            .lines()
            .enumerate()
            .filter(|(_, line)| re.is_match(line))
            .map(|(i, line)| (i + 1, line))
            .collect())
    }
}
