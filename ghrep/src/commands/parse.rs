// ghrep/src/commands/parse.rs
//! `ghrep parse`: shows what a term spec resolves to without touching anything.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::io::Write;
use std::path::Path;

use ghrep_core::{classify_tactic, ParseTerms, SearchReplaceOp, TargetOps, Whitelist};

use crate::cli::ParseCommand;
use crate::commands::Session;
use crate::ui::theme::ThemeEntry;

/// Reads one name per line. Blank lines and `#` comments are ignored.
pub fn read_whitelist_file(path: &Path) -> Result<Whitelist> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read whitelist file {}", path.display()))?;
    Ok(Whitelist::new(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#')),
    ))
}

/// `s/search/replace/modifier` for substitutions, `s/search/modifier` for searches.
pub fn describe_op(op: &SearchReplaceOp) -> String {
    match &op.replace {
        Some(replace) => format!("s/{}/{}/{}", op.search, replace, op.modifier),
        None if op.modifier.is_empty() => format!("s/{}", op.search),
        None => format!("s/{}/{}", op.search, op.modifier),
    }
}

pub fn describe_ops(ops: &TargetOps) -> Vec<String> {
    match ops {
        TargetOps::PlusMinus(op) => {
            let plus = op.plus.iter().map(|t| format!("+{}", t));
            let minus = op.minus.iter().map(|t| format!("-{}", t));
            vec![plus.chain(minus).collect::<Vec<_>>().join(" ")]
        }
        TargetOps::Patterns(ops) => ops.iter().map(describe_op).collect(),
    }
}

pub fn run_parse(session: &Session, cmd: &ParseCommand, out: &mut dyn Write) -> Result<()> {
    let whitelist = if !cmd.whitelist.is_empty() {
        Whitelist::new(cmd.whitelist.iter().cloned())
    } else if let Some(path) = &cmd.whitelist_file {
        read_whitelist_file(path)?
    } else {
        Whitelist::Any
    };

    let tactic = match cmd.tactic.selected() {
        Some(tactic) => tactic,
        None => classify_tactic(&cmd.terms, &session.delimiter)?,
    };
    info!("Parsing {} clause(s) as {}.", cmd.terms.len(), tactic);

    let result = ParseTerms::parse(&cmd.terms, tactic, &session.delimiter, &whitelist)?;

    if cmd.json {
        serde_json::to_writer_pretty(&mut *out, &result)?;
        writeln!(out)?;
        return Ok(());
    }

    for (target, ops) in result.iter() {
        let name = session.paint(target, ThemeEntry::Target);
        for line in describe_ops(ops) {
            writeln!(out, "{}: {}", name, line)?;
        }
    }
    if result.is_empty() {
        session.warn_msg("No targets selected.");
    }
    Ok(())
}
