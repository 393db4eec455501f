// ghrep/src/commands/apply.rs
//! `ghrep apply`: runs search or replace terms against one file in-process,
//! using the same boundary patterns the shell pipelines get.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::io::Write;

use ghrep_core::{classify_tactic, BoundaryCompiler, ParseTerms, Tactic, Whitelist};

use crate::cli::ApplyCommand;
use crate::commands::Session;

pub fn run_apply(session: &Session, cmd: &ApplyCommand, out: &mut dyn Write) -> Result<()> {
    let path = &cmd.input;
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", path.display()))?;

    let tactic = classify_tactic(&cmd.terms, &session.delimiter)?;
    if tactic == Tactic::PlusMinus {
        bail!("`apply` takes search or replace terms, not topic edits");
    }

    let whitelist = Whitelist::new([name.clone()]);
    let result = ParseTerms::parse(&cmd.terms, tactic, &session.delimiter, &whitelist)?;
    let ops = result.patterns(&name).unwrap_or_default();

    let boundary = cmd.boundary.clone().unwrap_or_else(|| session.config.search_boundary.clone());
    let compiler = BoundaryCompiler::new(boundary, cmd.regex || session.config.regex)?;

    if tactic == Tactic::Search {
        for op in ops {
            let compiled = compiler.get_or_compile(op);
            for (number, line) in compiled.matching_lines(&text)? {
                writeln!(out, "{}:{}:{}", name, number, line)?;
            }
        }
        return Ok(());
    }

    let mut current = text.clone();
    for op in ops {
        let compiled = compiler.get_or_compile(op);
        let next = compiled.apply(&current)?.into_owned();
        debug!("{}: '{}' {}", name, op.search, if next == current { "matched nothing" } else { "replaced" });
        current = next;
    }

    if cmd.in_place {
        if current != text {
            fs::write(path, &current).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Rewrote {}.", path.display());
            session.success_msg(format!("Updated {}", path.display()));
        } else {
            session.info_msg(format!("No changes to {}", path.display()));
        }
    } else {
        write!(out, "{}", current)?;
    }
    Ok(())
}
