// ghrep-core/src/sink.rs
//! Defines the `PatternSink` trait and the driver that feeds it.
//!
//! A sink is whatever actually runs a compiled pattern against a target:
//! a shell pipeline over a checked-out repository, an in-memory buffer in
//! tests, or a dry-run printer. The core never touches files itself; it
//! only decides which pattern strings go to which target.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::{debug, info};

use crate::ops::ParseResult;
use crate::patterns::compiler::{group_by_modifier, BoundaryCompiler};

/// One unit of work for a sink: a target and a ready-to-run pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRequest<'a> {
    pub target: &'a str,
    /// Alternation (search) or rule sequence (replace), already joined.
    pub pattern: String,
    /// Flags for tools that take them outside the pattern (`i` for grep).
    pub modifier: String,
    pub is_replace: bool,
}

/// What a sink reports back. The core does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    Matches(Vec<String>),
    Changed(bool),
    Skipped,
}

/// A trait for whatever executes compiled patterns.
pub trait PatternSink {
    /// Runs one request and reports the tool's outcome.
    fn execute(&mut self, request: &PatternRequest<'_>) -> Result<SinkOutcome>;
}

/// Compiles every operation in `result` and hands it to `sink`, one request
/// per target and modifier group. Topic-edit results produce no requests.
pub fn run_patterns<'r>(
    result: &'r ParseResult,
    compiler: &BoundaryCompiler,
    sink: &mut dyn PatternSink,
) -> Result<Vec<(&'r str, SinkOutcome)>> {
    let mut outcomes = Vec::new();
    for target in result.target_names() {
        let Some(ops) = result.patterns(target) else {
            continue;
        };
        if ops.is_empty() {
            debug!("{} -> no operations, skipping.", target);
            continue;
        }
        let compiled = compiler.compile_all(ops);
        for (modifier, pattern) in group_by_modifier(&compiled) {
            let request = PatternRequest {
                target,
                pattern,
                modifier,
                is_replace: compiled[0].is_replace,
            };
            info!("{} -> running {} pattern(s).", target, ops.len());
            outcomes.push((target, sink.execute(&request)?));
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiter::Delimiter;
    use crate::tactic::Tactic;
    use crate::terms::ParseTerms;
    use crate::whitelist::Whitelist;

    #[derive(Default)]
    struct Recording {
        requests: Vec<(String, String, String)>,
    }

    impl PatternSink for Recording {
        fn execute(&mut self, request: &PatternRequest<'_>) -> Result<SinkOutcome> {
            self.requests.push((
                request.target.to_string(),
                request.pattern.clone(),
                request.modifier.clone(),
            ));
            Ok(SinkOutcome::Skipped)
        }
    }

    #[test]
    fn one_request_per_target_and_modifier() {
        let wl = Whitelist::new(["one", "two"]);
        let result =
            ParseTerms::parse(&["one,s/foo,s/bar/i"], Tactic::Search, &Delimiter::default(), &wl).unwrap();
        let compiler = BoundaryCompiler::new("[^a-z]", false).unwrap();
        let mut sink = Recording::default();
        let outcomes = run_patterns(&result, &compiler, &mut sink).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(sink.requests[0].0, "one");
        assert_eq!(sink.requests[0].1, "[^a-z]foo[^a-z]|[^a-z]foo$|^foo[^a-z]|^foo$");
        assert_eq!(sink.requests[0].2, "");
        assert_eq!(sink.requests[1].2, "i");
    }

    #[test]
    fn replace_rules_share_one_request() {
        let wl = Whitelist::new(["one"]);
        let result = ParseTerms::parse(
            &["s/a/b/,s/c/d/gi"],
            Tactic::SearchReplace,
            &Delimiter::default(),
            &wl,
        )
        .unwrap();
        let mut sink = Recording::default();
        run_patterns(&result, &BoundaryCompiler::default(), &mut sink).unwrap();
        assert_eq!(sink.requests.len(), 1);
        assert_eq!(sink.requests[0].1.matches("s/").count(), 8);
    }
}
