//! Integration tests for top-level CLI behavior.
//!
//! Git-backed commands run against replayed cassettes so they do not depend
//! on a repository or a git binary being present.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use gitree::cassette::recorder::CassetteRecorder;
use serde_json::{json, Value};

const LOG: &str = "s1\x1Fc2 i1\x1FAnn\x1Fann@example.com\x1F2024-01-02T00:00:00+00:00\x1F2024-01-02T00:00:00+00:00\x1FWIP on main\x1E\n\
i1\x1Fc2\x1FAnn\x1Fann@example.com\x1F2024-01-02T00:00:00+00:00\x1F2024-01-02T00:00:00+00:00\x1Findex on main\x1E\n\
c2\x1Fc1\x1FAnn\x1Fann@example.com\x1F2024-01-01T00:00:00+00:00\x1F2024-01-01T00:00:00+00:00\x1Fsecond\x1E\n\
c1\x1F\x1FAnn\x1Fann@example.com\x1F2023-12-31T00:00:00+00:00\x1F2023-12-31T00:00:00+00:00\x1Ffirst\x1E";

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gitree_cli_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Writes a cassette answering one graph load.
fn graph_cassette(dir: &Path) -> PathBuf {
    let path = dir.join("graph.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&path, "graph", "c2");
    recorder.record("git", "toplevel", json!(null), json!({"ok": "/work/repo\n"}));
    recorder.record(
        "git",
        "show_ref",
        json!(null),
        json!({"ok": "c2 HEAD\nc2 refs/heads/main\nc1 refs/tags/v1\nc2 refs/remotes/origin/main\n"}),
    );
    recorder.record("git", "stash_list", json!(null), json!({"ok": "s1 stash@{0}\n"}));
    let log_input = json!({"stash_hashes": ["s1"], "max_count": null});
    recorder.record("git", "log", log_input, json!({"ok": LOG}));
    recorder.record("id_gen", "generate_id", json!(null), json!("fixednonce"));
    recorder.finish().unwrap()
}

fn gitree(dir: &Path, cassette: Option<&Path>, args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_gitree"));
    command
        .args(args)
        .arg("--repo")
        .arg(dir)
        .current_dir(dir)
        .env_remove("GITREE_RECORD")
        .env_remove("GITREE_REPLAY")
        .env_remove("GITREE_LOG");
    if let Some(cassette) = cassette {
        command.env("GITREE_REPLAY", cassette);
    }
    command
}

fn run(command: &mut Command) -> Output {
    command.output().expect("failed to run gitree binary")
}

#[test]
fn graph_prints_snapshot_without_stash_internals() {
    let dir = scratch("graph");
    let cassette = graph_cassette(&dir);

    let output = run(&mut gitree(&dir, Some(&cassette), &["graph"]));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let snapshot: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["HEAD"], "c2");
    assert_eq!(snapshot["tags"][0], json!({"name": "v1", "hash": "c1"}));
    assert_eq!(snapshot["remotes"][0]["name"], "origin");
    let hashes: Vec<&str> = snapshot["commits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["hash"].as_str().unwrap())
        .collect();
    assert_eq!(hashes, ["s1", "c2", "c1"]);
    assert_eq!(snapshot["commits"][0]["stash"], "stash@{0}");
    assert_eq!(snapshot["commits"][2]["parents"], json!([]));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn serve_answers_init_over_stdio() {
    let dir = scratch("serve");
    let cassette = graph_cassette(&dir);

    let mut child = gitree(&dir, Some(&cassette), &["serve"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"{\"type\":\"init\"}\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let replies: Vec<Value> = stdout.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["type"], "commits");
    assert_eq!(replies[0]["data"]["commits"].as_array().unwrap().len(), 3);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn html_embeds_config_and_replayed_nonce() {
    let dir = scratch("html");
    let cassette = graph_cassette(&dir);

    let output = run(gitree(&dir, Some(&cassette), &["html"]).env("GITREE_THEME", "light"));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains("<title>Gitree</title>"));
    assert!(html.contains("theme=\"white\""));
    assert!(html.contains("nonce=\"fixednonce\""));
    assert!(html.contains("assets/js/Graph.js"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_repository_is_reported_before_other_git_calls() {
    let dir = scratch("no_repo");
    let path = dir.join("no_repo.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&path, "no-repo", "unknown");
    recorder.record(
        "git",
        "toplevel",
        json!(null),
        json!({"err": {"kind": "exit", "detail": {
            "command": "rev-parse --show-toplevel",
            "code": 128,
            "stderr": "fatal: not a git repository"
        }}}),
    );
    recorder.finish().unwrap();

    let output = run(&mut gitree(&dir, Some(&path), &["refs"]));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("There are no Git repositories in the current workspace."), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn settings_reflect_file_and_environment() {
    let dir = scratch("settings");
    std::fs::write(dir.join(".gitree.yaml"), "git:\n  max_count: 50\n").unwrap();

    let output = run(gitree(&dir, None, &["settings"]).env("GITREE_LANGUAGE", "fr"));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let settings: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["git"]["max_count"].as_u64(), Some(50));
    assert_eq!(settings["appearance"]["language"].as_str(), Some("fr"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn help_lists_subcommands() {
    let dir = scratch("help");
    let output = run(&mut gitree(&dir, None, &["--help"]));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for subcommand in ["graph", "show", "refs", "stashes", "html", "serve", "settings"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in:\n{stdout}");
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = scratch("invalid");
    let output = run(&mut gitree(&dir, None, &["nonsense"]));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
    let _ = std::fs::remove_dir_all(&dir);
}
