// ghrep-core/src/lib.rs
//! # ghrep Core Library
//!
//! `ghrep-core` holds the platform-independent logic behind `ghrep`: it reads
//! a term spec (a compact, comma-delimited description of which repositories
//! an operation targets and what it does), validates the targets against a
//! whitelist, and compiles search and replace terms into boundary-anchored
//! patterns for external tools.
//!
//! The library is pure: it never talks to the network, runs git, or walks the
//! filesystem. Callers provide the whitelist and a [`PatternSink`] that does
//! the actual work.
//!
//! ## Modules
//!
//! * `tactic`: The three operation modes and their autodetection.
//! * `delimiter`: Literal or pattern token separators.
//! * `whitelist`: Resolution of selector tokens to concrete target names.
//! * `terms`: The term spec parser and per-target aggregation.
//! * `ops`: Operation payloads and the parse result.
//! * `patterns`: The boundary pattern compiler and its in-process applier.
//! * `sink`: The `PatternSink` trait and the driver that feeds it.
//! * `repo_spec`: Plain repo-spec matching for commands without operations.
//! * `topics`: Applying topic edits to a repository's current topics.
//! * `config`: Shared settings loaded from YAML.
//! * `errors`: The library's error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use ghrep_core::{classify_tactic, BoundaryCompiler, Delimiter, ParseTerms, Whitelist};
//!
//! fn main() -> anyhow::Result<()> {
//!     let whitelist = Whitelist::new(["api", "web", "docs"]);
//!     let delimiter = Delimiter::default();
//!     let args = ["api,web,s/example.com/example.org/g"];
//!
//!     let tactic = classify_tactic(&args, &delimiter)?;
//!     let result = ParseTerms::parse(&args, tactic, &delimiter, &whitelist)?;
//!     assert_eq!(result.target_names().collect::<Vec<_>>(), vec!["api", "web"]);
//!
//!     let compiler = BoundaryCompiler::default();
//!     for op in result.patterns("api").unwrap_or_default() {
//!         let compiled = compiler.get_or_compile(op);
//!         assert_eq!(compiled.variants.len(), 4);
//!         assert_eq!(compiled.apply("see example.com today")?, "see example.org today");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Typed failures are reported through [`GhrepError`]. A term spec with any
//! unresolvable selector fails as a whole with
//! [`GhrepError::AggregateParseFailure`], listing every bad token.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod delimiter;
pub mod errors;
pub mod ops;
pub mod patterns;
pub mod repo_spec;
pub mod sink;
pub mod tactic;
pub mod terms;
pub mod topics;
pub mod whitelist;

/// Re-exports the shared configuration.
pub use config::{config_candidate_paths, GhrepConfig};

pub use delimiter::Delimiter;

/// Re-exports the custom error types for clear error reporting.
pub use errors::{GhrepError, InvalidToken};

/// Re-exports the parsing entry points and their result types.
pub use ops::{ParseResult, PlusMinusOp, SearchReplaceOp, TargetOps};
pub use tactic::{classify_tactic, Tactic};
pub use terms::ParseTerms;
pub use whitelist::{Resolved, Whitelist, WhitelistProvider, ALL_SENTINEL};

/// Re-exports the pattern compiler.
pub use patterns::compiler::{
    compile_boundary_patterns, escape_term, BoundaryCompiler, CompiledPattern, DEFAULT_BOUNDARY,
};

pub use repo_spec::RepoSpecMatcher;
pub use sink::{run_patterns, PatternRequest, PatternSink, SinkOutcome};
pub use topics::TopicChange;
