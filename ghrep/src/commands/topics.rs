// ghrep/src/commands/topics.rs
//! `ghrep topics`: computes topic edits against a snapshot of current topics.

use anyhow::{Context, Result};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use ghrep_core::{ParseTerms, Tactic, TopicChange, Whitelist};

use crate::cli::TopicsCommand;
use crate::commands::Session;
use crate::ui::table::Report;
use crate::ui::theme::ThemeEntry;

/// Repository name to its current topics.
pub type TopicsSnapshot = BTreeMap<String, Vec<String>>;

/// Loads a snapshot from JSON (`.json`) or YAML (anything else).
pub fn load_topics_file(path: &Path) -> Result<TopicsSnapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read topics file {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let snapshot = if is_json {
        serde_json::from_str(&text).with_context(|| format!("Failed to parse topics file {}", path.display()))?
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("Failed to parse topics file {}", path.display()))?
    };
    Ok(snapshot)
}

/// Applies every target's edit to its current topics, in name order.
pub fn plan_topic_changes<S: AsRef<str>>(
    session: &Session,
    snapshot: &TopicsSnapshot,
    terms: &[S],
) -> Result<Vec<(String, TopicChange)>> {
    let whitelist = Whitelist::new(snapshot.keys().cloned());
    let result = ParseTerms::parse(terms, Tactic::PlusMinus, &session.delimiter, &whitelist)?;

    let mut changes = Vec::with_capacity(result.len());
    for target in result.target_names() {
        let Some(op) = result.plus_minus(target) else {
            continue;
        };
        let existing = snapshot.get(target).map(Vec::as_slice).unwrap_or_default();
        let change = TopicChange::apply(existing, op);
        debug!("{} -> {}", target, change.summary());
        changes.push((target.to_string(), change));
    }
    Ok(changes)
}

/// The `+new,-old` summary with additions and removals in their theme colours.
pub fn paint_summary(session: &Session, change: &TopicChange) -> String {
    change
        .added
        .iter()
        .map(|t| session.paint(&format!("+{}", t), ThemeEntry::Added))
        .chain(change.removed.iter().map(|t| session.paint(&format!("-{}", t), ThemeEntry::Removed)))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn run_topics(session: &Session, cmd: &TopicsCommand, out: &mut dyn Write) -> Result<()> {
    let snapshot = load_topics_file(&cmd.topics_file)?;
    let changes = plan_topic_changes(session, &snapshot, &cmd.terms)?;

    let mut report = Report::new(["repo", "topics", "change"]);
    let mut changed = 0;
    for (target, change) in &changes {
        if !change.is_noop() {
            changed += 1;
        } else if cmd.changed_only {
            continue;
        }
        let summary = if cmd.csv { change.summary() } else { paint_summary(session, change) };
        report.push_row(vec![target.clone(), change.topics.join(","), summary]);
    }

    if cmd.csv {
        write!(out, "{}", report.to_csv())?;
    } else if !report.is_empty() {
        writeln!(out, "{}", report.to_table())?;
    }
    session.info_msg(format!("{} of {} repo(s) would change.", changed, changes.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghrep_core::GhrepConfig;

    fn snapshot() -> TopicsSnapshot {
        let mut map = TopicsSnapshot::new();
        map.insert("api".into(), vec!["ruby".into(), "service".into()]);
        map.insert("web".into(), vec!["frontend".into()]);
        map
    }

    #[test]
    fn plans_changes_for_selected_repos() -> Result<()> {
        let session = Session::with_config(GhrepConfig::default())?;
        let changes = plan_topic_changes(&session, &snapshot(), &["api,+rust,-ruby"])?;
        assert_eq!(changes.len(), 1);
        let (name, change) = &changes[0];
        assert_eq!(name, "api");
        assert_eq!(change.topics, vec!["service", "rust"]);
        assert_eq!(change.summary(), "+rust,-ruby");
        Ok(())
    }

    #[test]
    fn clause_without_selector_hits_every_repo() -> Result<()> {
        let session = Session::with_config(GhrepConfig::default())?;
        let changes = plan_topic_changes(&session, &snapshot(), &["+maintained"])?;
        let names: Vec<&str> = changes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["api", "web"]);
        Ok(())
    }

    #[test]
    fn summary_colours_additions_and_removals() -> Result<()> {
        let mut session = Session::with_config(GhrepConfig::default())?;
        let change = TopicChange::apply(&["ruby".to_string()], &ghrep_core::PlusMinusOp {
            plus: vec!["rust".into()],
            minus: vec!["ruby".into()],
        });
        assert_eq!(paint_summary(&session, &change), "+rust,-ruby");

        session.color = true;
        let painted = paint_summary(&session, &change);
        assert!(painted.contains("\u{1b}[32m+rust"));
        assert!(painted.contains("\u{1b}[31m-ruby"));
        Ok(())
    }

    #[test]
    fn loads_json_and_yaml() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let json = dir.path().join("topics.json");
        fs::write(&json, r#"{"api": ["rust"]}"#)?;
        let yaml = dir.path().join("topics.yaml");
        fs::write(&yaml, "api:\n  - rust\nweb: []\n")?;

        assert_eq!(load_topics_file(&json)?["api"], vec!["rust"]);
        let from_yaml = load_topics_file(&yaml)?;
        assert!(from_yaml["web"].is_empty());
        Ok(())
    }

    #[test]
    fn csv_lists_unchanged_repos_unless_filtered() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("topics.yaml");
        fs::write(&path, "api: [rust]\nweb: []\n")?;
        let session = Session::with_config(GhrepConfig::default())?;
        let mut cmd = TopicsCommand {
            topics_file: path,
            csv: true,
            changed_only: false,
            terms: vec!["+rust".into()],
        };

        let mut out = Vec::new();
        run_topics(&session, &cmd, &mut out)?;
        assert_eq!(String::from_utf8(out)?, "repo,topics,change\napi,rust,\nweb,rust,+rust\n");

        cmd.changed_only = true;
        let mut out = Vec::new();
        run_topics(&session, &cmd, &mut out)?;
        assert_eq!(String::from_utf8(out)?, "repo,topics,change\nweb,rust,+rust\n");
        Ok(())
    }
}
