// ghrep/src/commands/patterns.rs
//! `ghrep search` and `ghrep replace` over the local checkouts.

use anyhow::Result;
use log::info;
use std::io::Write;

use ghrep_core::{run_patterns, ParseTerms, SinkOutcome, Tactic, WhitelistProvider};

use crate::cli::PatternCommand;
use crate::commands::Session;
use crate::sink::{ShellOptions, ShellSink};
use crate::ui::theme::ThemeEntry;
use crate::utils::repo_dir::RepoDirWhitelist;

/// Totals printed after a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub targets: usize,
    pub matches: usize,
    pub changed: usize,
}

pub fn run_pattern_command(
    session: &Session,
    cmd: &PatternCommand,
    tactic: Tactic,
    out: &mut dyn Write,
) -> Result<()> {
    let mut config = session.config.clone();
    if let Some(boundary) = &cmd.boundary {
        config.search_boundary = boundary.clone();
    }
    if let Some(threads) = cmd.threads {
        config.threads = threads;
    }
    config.regex |= cmd.regex;
    config.exclude.extend(cmd.exclude.iter().cloned());
    config.validate()?;

    let provider = RepoDirWhitelist::new(&config.repo_dir);
    let whitelist = provider.whitelist()?;
    let result = ParseTerms::parse(&cmd.terms, tactic, &session.delimiter, &whitelist)?;
    if result.is_empty() {
        session.warn_msg("No repositories selected.");
        return Ok(());
    }
    info!("{} {} repo(s).", tactic, result.len());

    let branch = match (&cmd.branch, cmd.no_branch) {
        (_, true) => None,
        (Some(branch), false) => Some(branch.clone()),
        (None, false) => Some(config.branch.clone()),
    }
    .filter(|b| !b.is_empty() && tactic == Tactic::SearchReplace);

    let options = ShellOptions {
        repo_dir: config.repo_dir.clone(),
        exclude: config.exclude.clone(),
        threads: config.threads,
        branch,
        dry_run: cmd.dry_run,
    };
    let compiler = config.compiler()?;

    let outcomes = {
        let mut sink = ShellSink::new(options, &mut *out);
        run_patterns(&result, &compiler, &mut sink)?
    };

    let mut summary = RunSummary { targets: result.len(), ..RunSummary::default() };
    for (target, outcome) in &outcomes {
        match outcome {
            SinkOutcome::Matches(lines) => {
                let name = session.paint(target, ThemeEntry::Target);
                for line in lines {
                    writeln!(out, "{}/{}", name, line)?;
                }
                summary.matches += lines.len();
            }
            SinkOutcome::Changed(true) => {
                summary.changed += 1;
                writeln!(out, "{}", session.paint(target, ThemeEntry::Target))?;
            }
            SinkOutcome::Changed(false) | SinkOutcome::Skipped => {}
        }
    }

    if cmd.dry_run {
        session.info_msg(format!("Dry run: {} repo(s) would be processed.", summary.targets));
    } else if tactic == Tactic::SearchReplace {
        session.success_msg(format!("Changed {} of {} repo(s).", summary.changed, summary.targets));
    } else {
        session.success_msg(format!("{} match(es) in {} repo(s).", summary.matches, summary.targets));
    }
    Ok(())
}
