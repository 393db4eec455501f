// ghrep/src/utils/repo_dir.rs
//! The local checkout directory as a source of valid repository names.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use ghrep_core::{Whitelist, WhitelistProvider};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Lists the immediate subdirectories of `repo_dir`, one per checkout.
#[derive(Debug, Clone)]
pub struct RepoDirWhitelist {
    repo_dir: PathBuf,
}

impl RepoDirWhitelist {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self { repo_dir: repo_dir.into() }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Directory names, sorted. Hidden entries are skipped.
    pub fn repo_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.repo_dir)
            .with_context(|| format!("Failed to read repo dir {}", self.repo_dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        debug!("Found {} repo(s) in {}.", names.len(), self.repo_dir.display());
        Ok(names)
    }
}

impl WhitelistProvider for RepoDirWhitelist {
    fn whitelist(&self) -> Result<Whitelist> {
        Ok(Whitelist::new(self.repo_names()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_directories_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["web", "api", ".cache"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("README"), "not a repo").unwrap();

        let provider = RepoDirWhitelist::new(dir.path());
        assert_eq!(provider.repo_names().unwrap(), vec!["api", "web"]);
        assert!(provider.whitelist().unwrap().contains("api"));
    }

    #[test]
    fn missing_dir_is_an_error() {
        let provider = RepoDirWhitelist::new("/definitely/not/a/repo/dir");
        let err = provider.repo_names().unwrap_err();
        assert!(err.to_string().contains("Failed to read repo dir"));
    }
}
