// ghrep/tests/cli_integration_tests.rs
//! Command-line integration tests for the `ghrep` binary.
//!
//! Each test runs the real executable through `assert_cmd` against a
//! temporary repo dir and checks stdout, stderr and the exit status.
//! `GHREP_CONFIG`, `REPO_DIR` and `GIT_BRANCH` are cleared so a developer's
//! environment cannot leak into the run.

use anyhow::Result;
#[allow(unused_imports)] // Used for `Command::cargo_bin` and `assert` method
use assert_cmd::prelude::*;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_log::test;

use strip_ansi_escapes::strip as strip_ansi_escapes_fn;

fn ghrep(repo_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ghrep").unwrap();
    cmd.env_remove("GHREP_CONFIG")
        .env_remove("GIT_BRANCH")
        .env("REPO_DIR", repo_dir)
        .env("RUST_LOG", "warn")
        .current_dir(repo_dir);
    cmd
}

fn strip_ansi(s: &[u8]) -> String {
    let cleaned = strip_ansi_escapes_fn(s);
    String::from_utf8_lossy(&cleaned).to_string()
}

/// A repo dir with three checkouts and a little text in each.
fn fixture() -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for (repo, body) in [
        ("api", "connect to old.host\nold.hostname stays\n"),
        ("web", "see old.host for docs\n"),
        ("docs", "nothing here\n"),
    ] {
        fs::create_dir_all(dir.path().join(repo).join("src"))?;
        fs::write(dir.path().join(repo).join("src").join("main.txt"), body)?;
    }
    Ok(dir)
}

#[test]
fn parse_prints_targets_and_ops() -> Result<()> {
    let dir = fixture()?;
    ghrep(dir.path())
        .args(["parse", "--whitelist", "api,web,docs", "--", "a.*,w.*,s/foo/bar/g"])
        .assert()
        .success()
        .stdout("api: s/foo/bar/g\nweb: s/foo/bar/g\n");
    Ok(())
}

#[test]
fn parse_json_for_topic_edits() -> Result<()> {
    let dir = fixture()?;
    let output = ghrep(dir.path())
        .args(["parse", "--json", "--whitelist", "api,web", "--", "+rust,-ruby"])
        .output()?;
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["tactic"], "plus_minus");
    assert_eq!(value["targets"]["web"]["minus"][0], "ruby");
    Ok(())
}

#[test]
fn parse_reports_every_bad_token() -> Result<()> {
    let dir = fixture()?;
    let output = ghrep(dir.path())
        .args(["parse", "--whitelist", "api", "--", "ghost,phantom,s/x/y/"])
        .output()?;
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = strip_ansi(&output.stderr);
    assert!(stderr.contains("Invalid repo or search_replace string: ghost"));
    assert!(stderr.contains("Invalid repo or search_replace string: phantom"));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn parse_with_forced_tactic() -> Result<()> {
    let dir = fixture()?;
    // Forced to search, the replace-shaped token is just an unknown repo.
    ghrep(dir.path())
        .args(["parse", "-s", "--whitelist", "api", "--", "s/a/b/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repo or search string: s/a/b/"));
    Ok(())
}

#[test]
fn parse_undetectable_tactic() -> Result<()> {
    let dir = fixture()?;
    ghrep(dir.path())
        .args(["parse", "--", "api,web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not autodetect tactic"));
    Ok(())
}

#[test]
fn parse_with_custom_delimiter() -> Result<()> {
    let dir = fixture()?;
    ghrep(dir.path())
        .args(["parse", "--delimiter", ";", "--whitelist", "api", "--", "api;s/a,b/i"])
        .assert()
        .success()
        .stdout("api: s/a,b/i\n");
    Ok(())
}

#[test]
fn repos_lists_checkouts() -> Result<()> {
    let dir = fixture()?;
    ghrep(dir.path()).args(["repos"]).assert().success().stdout("api\ndocs\nweb\n");
    ghrep(dir.path()).args(["repos", "a.*,web"]).assert().success().stdout("api\nweb\n");
    ghrep(dir.path())
        .args(["repos", "nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repo_spec has no matches: nothing"));
    Ok(())
}

#[test]
fn search_dry_run_renders_pipelines() -> Result<()> {
    let dir = fixture()?;
    ghrep(dir.path())
        .args(["search", "--dry-run", "--", "api,s/old.host/i"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# api\n"))
        .stdout(predicate::str::contains("grep --null -HnEi"))
        .stdout(predicate::str::contains(r"old\.host").and(predicate::str::contains("# web").not()));
    Ok(())
}

#[test]
fn replace_dry_run_uses_branch_from_env() -> Result<()> {
    let dir = fixture()?;
    ghrep(dir.path())
        .env("GIT_BRANCH", "rename-host")
        .args(["replace", "-n", "--threads", "3", "--", "s/old.host/new.host/g"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checkout -q -B 'rename-host'"))
        .stdout(predicate::str::contains("-P3 perl -pi -e"))
        .stdout(predicate::str::contains("# docs"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn search_runs_grep_in_checkouts() -> Result<()> {
    let dir = fixture()?;
    let output = ghrep(dir.path()).args(["search", "--", "s/old.host"]).output()?;
    assert!(output.status.success(), "stderr: {}", strip_ansi(&output.stderr));
    let stdout = strip_ansi(&output.stdout);
    assert!(stdout.contains("api/src/main.txt:1:connect to old.host"));
    assert!(stdout.contains("web/src/main.txt:1:see old.host for docs"));
    assert!(!stdout.contains("old.hostname"));
    Ok(())
}

#[test]
fn topics_table_and_csv() -> Result<()> {
    let dir = fixture()?;
    let topics = dir.path().join("topics.yaml");
    fs::write(&topics, "api: [ruby, service]\nweb: [frontend]\n")?;

    ghrep(dir.path())
        .args(["topics", "--csv", "--topics-file"])
        .arg(&topics)
        .args(["--", "api,+rust,-ruby"])
        .assert()
        .success()
        .stdout("repo,topics,change\napi,\"service,rust\",\"+rust,-ruby\"\n");

    let output = ghrep(dir.path())
        .args(["topics", "--topics-file"])
        .arg(&topics)
        .args(["--", "+maintained"])
        .output()?;
    assert!(output.status.success());
    let table = strip_ansi(&output.stdout);
    assert!(table.contains("frontend,maintained"));
    assert!(table.contains("+maintained"));
    Ok(())
}

#[test]
fn apply_rewrites_file_in_place() -> Result<()> {
    let dir = fixture()?;
    let file = dir.path().join("api").join("src").join("main.txt");
    ghrep(dir.path())
        .args(["apply", "--in-place", "--input"])
        .arg(&file)
        .args(["--", "s/old.host/new.host/g"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&file)?, "connect to new.host\nold.hostname stays\n");
    Ok(())
}

#[test]
fn config_file_sets_boundary() -> Result<()> {
    let dir = fixture()?;
    let config = dir.path().join("custom.yaml");
    // Only a space counts as a boundary, so the parenthesised term stays.
    fs::write(&config, "search_boundary: \"[ ]\"\n")?;
    let file = dir.path().join("paren.txt");
    fs::write(&file, "(old.host) old.host\n")?;

    ghrep(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["apply", "--input"])
        .arg(&file)
        .args(["--", "s/old.host/new.host/g"])
        .assert()
        .success()
        .stdout("(old.host) new.host\n");
    Ok(())
}

#[test]
fn invalid_config_fails_cleanly() -> Result<()> {
    let dir = fixture()?;
    let config = dir.path().join("bad.yaml");
    fs::write(&config, "threads: 0\n")?;
    ghrep(dir.path())
        .env("GHREP_CONFIG", &config)
        .args(["repos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("`threads` must be greater than 0."));
    Ok(())
}
