// ghrep/src/sink.rs
//! Runs compiled patterns against local checkouts with `find`, `grep` and `perl`.
//!
//! For each target the sink renders one shell pipeline: `find` lists the
//! checkout's files (skipping VCS metadata and excluded extensions) and
//! `xargs` feeds them to `grep -E` for searches or `perl -pi -e` for
//! substitutions. In dry-run mode the pipeline is printed instead.
//!
//! License: MIT OR Apache-2.0

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ghrep_core::{PatternRequest, PatternSink, SinkOutcome};

/// Directories never searched or rewritten.
const SKIPPED_DIRS: &str = r".*/(\.git|\.xcodeproj)/.*";

/// Files handed to one `perl` process.
const FILES_PER_PERL: usize = 64;

/// Settings shared by every request a `ShellSink` runs.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub repo_dir: PathBuf,
    /// File extensions to skip, without the dot.
    pub exclude: Vec<String>,
    pub threads: usize,
    /// Branch to create or reset before replacing. `None` leaves the checkout alone.
    pub branch: Option<String>,
    pub dry_run: bool,
}

/// A [`PatternSink`] backed by shell pipelines. Dry-run output goes to `out`.
pub struct ShellSink<W: Write> {
    options: ShellOptions,
    out: W,
}

/// Wraps `text` in single quotes for `sh`.
pub fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// `find` invocation listing the files under `path`, NUL-separated.
pub fn find_command(path: &Path, exclude: &[String]) -> String {
    let mut filter = format!("-regex {}", shell_quote(SKIPPED_DIRS));
    if !exclude.is_empty() {
        let ext = format!(r".*\.({})$", exclude.join("|"));
        filter.push_str(&format!(" -or -regex {}", shell_quote(&ext)));
    }
    let path = shell_quote(&path.to_string_lossy());
    if cfg!(target_os = "macos") {
        format!(r"find -E {} -type f -not \( {} \) -print0", path, filter)
    } else {
        format!(r"find {} -regextype posix-extended -type f -not \( {} \) -print0", path, filter)
    }
}

impl<W: Write> ShellSink<W> {
    pub fn new(options: ShellOptions, out: W) -> Self {
        Self { options, out }
    }

    pub fn target_path(&self, target: &str) -> PathBuf {
        self.options.repo_dir.join(target)
    }

    /// The full pipeline for one request.
    pub fn render(&self, request: &PatternRequest<'_>) -> String {
        let path = self.target_path(request.target);
        let find = find_command(&path, &self.options.exclude);

        if !request.is_replace {
            let flags = if request.modifier.contains('i') { "-HnEi" } else { "-HnE" };
            return format!(
                "{} \\\n | xargs -0 grep --null {} {}",
                find,
                flags,
                shell_quote(&request.pattern)
            );
        }

        let perl = format!(
            "xargs -0 -n{} -P{} perl -pi -e {}",
            FILES_PER_PERL,
            self.options.threads,
            shell_quote(&request.pattern)
        );
        let pipeline = format!("{} \\\n | {}", find, perl);
        match &self.options.branch {
            Some(branch) => format!(
                "git -C {} checkout -q -B {} \\\n && {}",
                shell_quote(&path.to_string_lossy()),
                shell_quote(branch),
                pipeline
            ),
            None => pipeline,
        }
    }

    fn run(&self, script: &str) -> Result<Output> {
        debug!("Running: {}", script);
        Command::new("sh")
            .arg("-c")
            .arg(script)
            .env("LC_ALL", "C")
            .output()
            .context("Failed to spawn sh")
    }

    /// `grep --null -Hn` prints `path\0line:text`; turn that into
    /// `relative/path:line:text`.
    fn parse_matches(&self, target: &str, stdout: &[u8]) -> Vec<String> {
        let root = self.target_path(target);
        String::from_utf8_lossy(stdout)
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once('\0') {
                Some((file, rest)) => {
                    let file = Path::new(file);
                    let relative = file.strip_prefix(&root).unwrap_or(file);
                    format!("{}:{}", relative.display(), rest)
                }
                None => line.to_string(),
            })
            .collect()
    }

    fn has_changes(&self, target: &str) -> Result<bool> {
        let path = self.target_path(target);
        if !path.join(".git").exists() {
            debug!("{} is not a git checkout; assuming it changed.", target);
            return Ok(true);
        }
        let output = Command::new("git")
            .arg("-C")
            .arg(&path)
            .args(["status", "--porcelain"])
            .output()
            .context("Failed to run git status")?;
        Ok(!output.stdout.is_empty())
    }
}

impl<W: Write> PatternSink for ShellSink<W> {
    fn execute(&mut self, request: &PatternRequest<'_>) -> Result<SinkOutcome> {
        let script = self.render(request);
        if self.options.dry_run {
            writeln!(self.out, "# {}\n{}\n", request.target, script)?;
            return Ok(SinkOutcome::Skipped);
        }

        let path = self.target_path(request.target);
        if !path.is_dir() {
            bail!("No checkout for {} at {}", request.target, path.display());
        }

        let output = self.run(&script)?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!("{}: {}", request.target, stderr.trim());
        }

        if request.is_replace {
            if !output.status.success() {
                bail!("Replace failed in {} ({})", request.target, output.status);
            }
            let changed = self.has_changes(request.target)?;
            info!("{} -> {}", request.target, if changed { "changed" } else { "unchanged" });
            Ok(SinkOutcome::Changed(changed))
        } else {
            // grep exits 1 on no match, which xargs reports as 123.
            match output.status.code() {
                Some(0) | Some(1) | Some(123) => {
                    Ok(SinkOutcome::Matches(self.parse_matches(request.target, &output.stdout)))
                }
                _ => bail!("Search failed in {} ({})", request.target, output.status),
            }
        }
    }
}
