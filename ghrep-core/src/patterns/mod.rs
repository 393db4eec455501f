//! Boundary-anchored pattern compilation.
//!
//! A search term must only match as a whole token: `cat` should hit
//! `the cat sat` but never `category`. This module turns a parsed
//! `SearchReplaceOp` into the four anchored variants needed to catch a term
//! in the middle of a line, at its start, at its end, or as the whole line.
//! The `compiler` emits the textual forms handed to external tools
//! (`grep -E` alternations and `perl -pi -e` substitution rules), and
//! `native` applies the same rules in-process with the `regex` crate.

pub mod compiler;
pub mod native;
