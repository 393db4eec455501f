// ghrep/src/commands/mod.rs
//! Command implementations and the state they share.
//!
//! License: MIT OR Apache-2.0

pub mod apply;
pub mod parse;
pub mod patterns;
pub mod repos;
pub mod topics;

use anyhow::Result;
use is_terminal::IsTerminal;
use log::debug;
use std::io::{self, Write};

use ghrep_core::{Delimiter, GhrepConfig, Tactic};

use crate::cli::{Cli, Commands};
use crate::ui::output_format;
use crate::ui::theme::{build_theme_map, ThemeEntry, ThemeMap, ThemeStyle};

/// Settings resolved once from the config file and global flags.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GhrepConfig,
    pub delimiter: Delimiter,
    pub theme: ThemeMap,
    pub quiet: bool,
    /// Whether the primary output gets colour.
    pub color: bool,
}

impl Session {
    /// Loads the config (explicit path, else the first one found) and applies
    /// the global flag overrides on top of it.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => GhrepConfig::load_from_file(path)?,
            None => GhrepConfig::discover()?,
        };
        if let Some(dir) = &cli.repo_dir {
            config.repo_dir = dir.clone();
        }

        let delimiter = match (&cli.delimiter, cli.delimiter_regex) {
            (Some(pattern), true) => Delimiter::pattern(pattern)?,
            (Some(literal), false) => {
                config.delimiter = literal.clone();
                config.delimiter()?
            }
            (None, _) => config.delimiter()?,
        };
        debug!("Using repo dir {} and delimiter {:?}.", config.repo_dir.display(), delimiter);

        Ok(Self {
            config,
            delimiter,
            theme: build_theme_map(cli.theme.as_deref())?,
            quiet: cli.quiet,
            color: io::stdout().is_terminal(),
        })
    }

    /// A quiet, uncoloured session around `config`, skipping flag handling.
    pub fn with_config(config: GhrepConfig) -> Result<Self> {
        Ok(Self {
            delimiter: config.delimiter()?,
            config,
            theme: ThemeStyle::default_theme_map(),
            quiet: true,
            color: false,
        })
    }

    pub fn paint(&self, text: &str, entry: ThemeEntry) -> String {
        output_format::paint(text, entry, &self.theme, self.color)
    }

    pub fn info_msg(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            info_msg(msg, &self.theme);
        }
    }

    pub fn success_msg(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            let color = io::stderr().is_terminal();
            let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), &self.theme, color);
        }
    }

    pub fn warn_msg(&self, msg: impl AsRef<str>) {
        warn_msg(msg, &self.theme);
    }
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Runs the selected subcommand, writing its primary output to `out`.
pub fn dispatch(cli: &Cli, session: &Session, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::Parse(cmd) => parse::run_parse(session, cmd, out),
        Commands::Search(cmd) => patterns::run_pattern_command(session, cmd, Tactic::Search, out),
        Commands::Replace(cmd) => patterns::run_pattern_command(session, cmd, Tactic::SearchReplace, out),
        Commands::Topics(cmd) => topics::run_topics(session, cmd, out),
        Commands::Repos(cmd) => repos::run_repos(session, cmd, out),
        Commands::Apply(cmd) => apply::run_apply(session, cmd, out),
    }
}
