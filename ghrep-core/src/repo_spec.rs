//! Repository selection for commands that take plain repo specs.
//!
//! Commands like `repos` do not carry operations, only a list of specs such
//! as `api-.*,web`. Each spec is an anchored pattern over the known repo
//! names. Unlike term specs there is no negation or `:all`; an empty list
//! selects everything.
//!
//! License: MIT OR Apache-2.0

use log::{debug, error};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use crate::errors::GhrepError;

#[derive(Debug, Default)]
pub struct RepoSpecMatcher {
    repo_list: Vec<String>,
    cache: RwLock<HashMap<Vec<String>, Arc<Vec<String>>>>,
}

impl RepoSpecMatcher {
    pub fn new(repo_list: Vec<String>) -> Self {
        Self { repo_list, cache: RwLock::new(HashMap::new()) }
    }

    pub fn repo_list(&self) -> &[String] {
        &self.repo_list
    }

    /// Sorted, unique names selected by `raw_list`. Fails listing every spec
    /// that matched nothing.
    pub fn matches<S: AsRef<str>>(&self, raw_list: &[S]) -> Result<Arc<Vec<String>>, GhrepError> {
        let key: Vec<String> = raw_list.iter().map(|s| s.as_ref().to_string()).collect();
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.get(&key) {
                return Ok(Arc::clone(hit));
            }
        }

        let built = Arc::new(self.build_match(&key)?);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&built));
        Ok(built)
    }

    fn build_match(&self, raw_list: &[String]) -> Result<Vec<String>, GhrepError> {
        if raw_list.is_empty() {
            let all: BTreeSet<&String> = self.repo_list.iter().collect();
            return Ok(all.into_iter().cloned().collect());
        }

        let mut selected = BTreeSet::new();
        let mut bad_specs = Vec::new();
        for spec in raw_list.iter().flat_map(|clause| clause.split(',')).filter(|s| !s.is_empty()) {
            let matching: Vec<&String> = match Regex::new(&format!("^(?:{})$", spec)) {
                Ok(re) => self.repo_list.iter().filter(|name| re.is_match(name)).collect(),
                Err(_) => Vec::new(),
            };
            if matching.is_empty() {
                error!("repo_spec has no matches: {}", spec);
                bad_specs.push(spec.to_string());
            }
            selected.extend(matching.into_iter().cloned());
        }

        if !bad_specs.is_empty() {
            return Err(GhrepError::InvalidRepoSpec(bad_specs));
        }
        debug!("Repo specs {:?} selected {} repo(s).", raw_list, selected.len());
        Ok(selected.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> RepoSpecMatcher {
        RepoSpecMatcher::new(vec!["web".into(), "api-users".into(), "api-billing".into(), "docs".into()])
    }

    #[test]
    fn empty_spec_selects_all_sorted() {
        let all = matcher().matches::<&str>(&[]).unwrap();
        assert_eq!(*all, vec!["api-billing", "api-users", "docs", "web"]);
    }

    #[test]
    fn patterns_are_anchored_and_deduplicated() {
        let picked = matcher().matches(&["api-.*,api-users", "web"]).unwrap();
        assert_eq!(*picked, vec!["api-billing", "api-users", "web"]);
    }

    #[test]
    fn every_unmatched_spec_is_reported() {
        let err = matcher().matches(&["nope,web,api", "(broken"]).unwrap_err();
        match err {
            GhrepError::InvalidRepoSpec(specs) => assert_eq!(specs, vec!["nope", "api", "(broken"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn results_are_cached_per_spec_list() {
        let m = matcher();
        let a = m.matches(&["web"]).unwrap();
        let b = m.matches(&["web"]).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
