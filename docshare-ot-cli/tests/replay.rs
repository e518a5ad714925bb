use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const TIE_BREAK: &str = r#"{
    "document": "hello world",
    "owner": [{"offset": 5, "length": 0, "text": "A"}],
    "participant": [{"offset": 5, "length": 0, "text": "B"}],
    "schedule": ["owner-edit", "participant-edit", "deliver-to-participant", "deliver-to-owner"]
}"#;

#[test]
#[allow(deprecated)]
fn test_replay_reports_convergence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tie.json");
    fs::write(&path, TIE_BREAK).unwrap();

    let mut cmd = Command::cargo_bin("docshare-ot").unwrap();
    cmd.arg("replay").arg(&path);

    cmd.assert()
        .success()
        .code(0)
        .stdout(predicate::str::contains("owner: helloAB world"))
        .stdout(predicate::str::contains("participant: helloAB world"))
        .stdout(predicate::str::contains("Converged."));
}

#[test]
#[allow(deprecated)]
fn test_replay_json_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tie.json");
    fs::write(&path, TIE_BREAK).unwrap();

    let mut cmd = Command::cargo_bin("docshare-ot").unwrap();
    cmd.arg("replay").arg(&path).arg("--json");

    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.get("owner").unwrap(), "helloAB world");
    assert_eq!(json.get("participant").unwrap(), "helloAB world");
    assert_eq!(json.get("converged").unwrap(), true);
}

#[test]
#[allow(deprecated)]
fn test_replay_delivery_without_message_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"document": "abc", "schedule": ["deliver-to-participant"]}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("docshare-ot").unwrap();
    cmd.arg("replay").arg(&path);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nothing is in flight"));
}

#[test]
#[allow(deprecated)]
fn test_replay_missing_file() {
    let dir = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("docshare-ot").unwrap();
    cmd.arg("replay").arg(dir.path().join("missing.json"));

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("IO error"));
}

#[test]
#[allow(deprecated)]
fn test_replay_rejects_unknown_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("typo.json");
    fs::write(&path, r#"{"document": "", "owners": []}"#).unwrap();

    let mut cmd = Command::cargo_bin("docshare-ot").unwrap();
    cmd.arg("replay").arg(&path);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid scenario"));
}
