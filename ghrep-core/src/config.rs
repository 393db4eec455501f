//! Configuration management for `ghrep-core`.
//!
//! This module defines the settings shared by every ghrep command: the
//! search boundary, literal-or-regex mode, the clause delimiter, the file
//! exclusions and where repositories live. Settings are read from YAML,
//! with every key optional and falling back to the built-in defaults.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::delimiter::Delimiter;
use crate::patterns::compiler::{BoundaryCompiler, DEFAULT_BOUNDARY};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ghrep.yaml";

static DEFAULT_CONFIG: Lazy<GhrepConfig> = Lazy::new(|| {
    serde_yml::from_str(include_str!("../config/default_config.yaml")).unwrap_or_else(|e| {
        log::warn!("Embedded default config failed to parse ({}); using compiled-in values.", e);
        GhrepConfig::builtin()
    })
});

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GhrepConfig {
    /// Regex fragment matching one character that is not part of a term.
    pub search_boundary: String,
    /// If true, search terms are patterns and are not escaped.
    pub regex: bool,
    /// Literal token separator inside a clause.
    pub delimiter: String,
    /// File extensions skipped by search and replace.
    pub exclude: Vec<String>,
    pub branch: String,
    pub repo_dir: PathBuf,
    pub threads: usize,
}

impl GhrepConfig {
    fn builtin() -> Self {
        Self {
            search_boundary: DEFAULT_BOUNDARY.to_string(),
            regex: false,
            delimiter: ",".to_string(),
            exclude: ["a", "gz", "icns", "ico", "jar", "png", "zip"].iter().map(|s| s.to_string()).collect(),
            branch: "GHREP/search-and-replace".to_string(),
            repo_dir: PathBuf::from("./github"),
            threads: 8,
        }
    }

    /// The defaults embedded in the binary.
    pub fn load_default() -> Self {
        debug!("Loading default config from embedded string...");
        DEFAULT_CONFIG.clone()
    }

    /// Loads a config file. Missing keys take their default values.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GhrepConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads the first existing file among `config_candidate_paths()`, or the defaults.
    pub fn discover() -> Result<Self> {
        match config_candidate_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_file(path),
            None => {
                debug!("No config file found; using defaults.");
                Ok(Self::load_default())
            }
        }
    }

    /// Checks every setting and reports all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.search_boundary.is_empty() {
            errors.push("`search_boundary` must not be empty.".to_string());
        } else if let Err(e) = Regex::new(&self.search_boundary) {
            errors.push(format!("`search_boundary` is not a valid regex: {}", e));
        }
        if self.delimiter.is_empty() {
            errors.push("`delimiter` must not be empty.".to_string());
        }
        if self.threads == 0 {
            errors.push("`threads` must be greater than 0.".to_string());
        }
        for ext in &self.exclude {
            if ext.is_empty() || ext.contains('/') {
                errors.push(format!("Invalid `exclude` extension: '{}'.", ext));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Config validation failed:\n{}", errors.join("\n")))
        }
    }

    pub fn delimiter(&self) -> Result<Delimiter> {
        Ok(Delimiter::literal(self.delimiter.as_str())?)
    }

    pub fn compiler(&self) -> Result<BoundaryCompiler> {
        Ok(BoundaryCompiler::new(self.search_boundary.as_str(), self.regex)?)
    }
}

// Missing keys are filled from here while the embedded file itself is
// being parsed, so this must not go through `DEFAULT_CONFIG`.
impl Default for GhrepConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Places a config file is looked for, most specific first.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("ghrep").join("config.yaml"));
    }
    paths
}
