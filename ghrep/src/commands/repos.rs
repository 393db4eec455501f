// ghrep/src/commands/repos.rs
//! `ghrep repos`: lists the local checkouts selected by repo specs.

use anyhow::Result;
use std::io::Write;

use ghrep_core::RepoSpecMatcher;

use crate::cli::ReposCommand;
use crate::commands::Session;
use crate::ui::theme::ThemeEntry;
use crate::utils::repo_dir::RepoDirWhitelist;

pub fn run_repos(session: &Session, cmd: &ReposCommand, out: &mut dyn Write) -> Result<()> {
    let names = RepoDirWhitelist::new(&session.config.repo_dir).repo_names()?;
    let matcher = RepoSpecMatcher::new(names);
    let selected = matcher.matches(&cmd.specs)?;

    for name in selected.iter() {
        writeln!(out, "{}", session.paint(name, ThemeEntry::Target))?;
    }
    session.info_msg(format!("{} of {} repo(s).", selected.len(), matcher.repo_list().len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghrep_core::GhrepConfig;
    use std::fs;

    fn run(specs: &[&str]) -> Result<String> {
        let dir = tempfile::tempdir()?;
        for name in ["api-v1", "api-v2", "web"] {
            fs::create_dir(dir.path().join(name))?;
        }
        let config = GhrepConfig { repo_dir: dir.path().to_path_buf(), ..GhrepConfig::default() };
        let session = Session::with_config(config)?;
        let cmd = ReposCommand { specs: specs.iter().map(|s| s.to_string()).collect() };
        let mut out = Vec::new();
        run_repos(&session, &cmd, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn lists_everything_without_specs() -> Result<()> {
        assert_eq!(run(&[])?, "api-v1\napi-v2\nweb\n");
        Ok(())
    }

    #[test]
    fn specs_are_anchored_patterns() -> Result<()> {
        assert_eq!(run(&["api-.*"])?, "api-v1\napi-v2\n");
        assert_eq!(run(&["web,api-v1"])?, "api-v1\nweb\n");
        Ok(())
    }

    #[test]
    fn unmatched_spec_fails() {
        let err = run(&["api"]).unwrap_err();
        assert!(err.to_string().contains("api"));
    }
}
