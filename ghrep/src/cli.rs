// ghrep/src/cli.rs
//! This file defines the command-line interface (CLI) for the ghrep application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use ghrep_core::Tactic;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "ghrep",
    version = env!("CARGO_PKG_VERSION"),
    about = "Search, replace and retag across many repositories with one term spec",
    long_about = "ghrep reads a compact term spec such as `api,web,s/old.host/new.host/g` that names \
    which repositories an operation targets and what it does. Targets are checked against the \
    repositories found locally, and search terms are compiled into boundary-anchored patterns for \
    grep and perl.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to a YAML config file.
    #[arg(long = "config", value_name = "FILE", env = "GHREP_CONFIG", global = true, help = "Path to a YAML config file.")]
    pub config: Option<PathBuf>,

    /// Directory holding one checkout per repository.
    #[arg(long = "repo-dir", value_name = "DIR", env = "REPO_DIR", global = true, help = "Directory holding one checkout per repository.")]
    pub repo_dir: Option<PathBuf>,

    /// Token separator inside a clause.
    #[arg(long, value_name = "DELIM", global = true, help = "Token separator inside a clause (default ',').")]
    pub delimiter: Option<String>,

    /// Treat --delimiter as a regular expression.
    #[arg(long = "delimiter-regex", global = true, requires = "delimiter", help = "Treat --delimiter as a regular expression.")]
    pub delimiter_regex: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `ghrep` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parses a term spec and prints what each target would get.
    #[command(about = "Parse a term spec and print the operations per target.")]
    Parse(ParseCommand),

    /// Searches the local checkouts.
    #[command(about = "Search the local checkouts, e.g. `ghrep search -- api,s/old.host/i`.")]
    Search(PatternCommand),

    /// Replaces across the local checkouts.
    #[command(about = "Replace across the local checkouts, e.g. `ghrep replace -- s/old.host/new.host/g`.")]
    Replace(PatternCommand),

    /// Applies topic edits to a topics file.
    #[command(about = "Compute topic edits, e.g. `ghrep topics --topics-file t.yaml -- api,+rust,-ruby`.")]
    Topics(TopicsCommand),

    /// Lists local repositories matching repo specs.
    #[command(about = "List local repositories matching the given repo specs.")]
    Repos(ReposCommand),

    /// Applies search or replace rules to one file without external tools.
    #[command(about = "Apply search or replace terms to a single file in-process.")]
    Apply(ApplyCommand),
}

/// Explicit tactic selection; at most one may be given.
#[derive(Args, Debug, Default, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct TacticFlags {
    #[arg(long = "plus-minus", short = 'T', help = "Parse terms as topic edits (+topic, -topic).")]
    pub plus_minus: bool,

    #[arg(long, short = 's', help = "Parse terms as searches (s/term/ or s/term/i).")]
    pub search: bool,

    #[arg(long = "search-replace", short = 'S', help = "Parse terms as substitutions (s/from/to/gi).")]
    pub search_replace: bool,
}

impl TacticFlags {
    /// The forced tactic, if any flag was given.
    pub fn selected(&self) -> Option<Tactic> {
        if self.plus_minus {
            Some(Tactic::PlusMinus)
        } else if self.search {
            Some(Tactic::Search)
        } else if self.search_replace {
            Some(Tactic::SearchReplace)
        } else {
            None
        }
    }
}

/// Arguments for the `parse` command.
#[derive(Parser, Debug)]
pub struct ParseCommand {
    #[command(flatten)]
    pub tactic: TacticFlags,

    /// Valid target names (comma-separated).
    #[arg(long, value_delimiter = ',', conflicts_with = "whitelist_file", help = "Valid target names (comma-separated). Without a whitelist any name is accepted.")]
    pub whitelist: Vec<String>,

    /// File with one valid target name per line.
    #[arg(long = "whitelist-file", value_name = "FILE", help = "Read valid target names from a file, one per line.")]
    pub whitelist_file: Option<PathBuf>,

    #[arg(long, help = "Print the result as JSON.")]
    pub json: bool,

    /// Term spec clauses.
    #[arg(required = true, allow_hyphen_values = true, value_name = "TERMS")]
    pub terms: Vec<String>,
}

/// Arguments shared by `search` and `replace`.
#[derive(Parser, Debug)]
pub struct PatternCommand {
    /// Regex fragment for one non-term character.
    #[arg(long, value_name = "REGEX", help = "Regex fragment matching one character that is not part of a term.")]
    pub boundary: Option<String>,

    #[arg(long, help = "Treat search text as a regular expression instead of a literal.")]
    pub regex: bool,

    #[arg(long = "dry-run", short = 'n', help = "Print the commands instead of running them.")]
    pub dry_run: bool,

    #[arg(long, value_name = "N", help = "Parallel perl processes per repository.")]
    pub threads: Option<usize>,

    /// Extra file extensions to skip (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "EXT", help = "Extra file extensions to skip (comma-separated).")]
    pub exclude: Vec<String>,

    /// Branch to check out before replacing.
    #[arg(long, value_name = "NAME", env = "GIT_BRANCH", help = "Branch created or reset in each checkout before replacing.")]
    pub branch: Option<String>,

    #[arg(long = "no-branch", help = "Replace on whatever is checked out.")]
    pub no_branch: bool,

    /// Term spec clauses.
    #[arg(required = true, allow_hyphen_values = true, value_name = "TERMS")]
    pub terms: Vec<String>,
}

/// Arguments for the `topics` command.
#[derive(Parser, Debug)]
pub struct TopicsCommand {
    /// YAML or JSON map of repository name to its current topics.
    #[arg(long = "topics-file", value_name = "FILE", help = "YAML or JSON map of repository name to its current topics.")]
    pub topics_file: PathBuf,

    #[arg(long, help = "Print CSV instead of a table.")]
    pub csv: bool,

    #[arg(long = "changed-only", help = "Only list repositories whose topics change.")]
    pub changed_only: bool,

    /// Term spec clauses.
    #[arg(required = true, allow_hyphen_values = true, value_name = "TERMS")]
    pub terms: Vec<String>,
}

/// Arguments for the `repos` command.
#[derive(Parser, Debug)]
pub struct ReposCommand {
    /// Repo specs (comma-separated names or patterns). Lists every repository if omitted.
    #[arg(value_name = "SPEC")]
    pub specs: Vec<String>,
}

/// Arguments for the `apply` command.
#[derive(Parser, Debug)]
pub struct ApplyCommand {
    /// File to rewrite.
    #[arg(long, short = 'i', value_name = "FILE", help = "File to apply the rules to.")]
    pub input: PathBuf,

    #[arg(long = "in-place", help = "Write the result back to the input file instead of stdout.")]
    pub in_place: bool,

    #[arg(long, value_name = "REGEX", help = "Regex fragment matching one character that is not part of a term.")]
    pub boundary: Option<String>,

    #[arg(long, help = "Treat search text as a regular expression instead of a literal.")]
    pub regex: bool,

    /// Search or replace terms. A selector, if given, must be the input file's name.
    #[arg(required = true, allow_hyphen_values = true, value_name = "TERMS")]
    pub terms: Vec<String>,
}
