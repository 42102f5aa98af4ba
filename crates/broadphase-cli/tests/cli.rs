// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! Black-box tests for the `broadphase` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn broadphase(config: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("broadphase").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config-dir")
        .arg(config.path());
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn run_prints_summary_table() {
    let dir = TempDir::new().unwrap();
    broadphase(&dir)
        .args(["run", "--frames", "10", "--seed", "3", "--count", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("candidate pairs / frame"))
        .stdout(predicate::str::contains("mismatches"));
}

#[test]
fn run_json_reports_every_frame_without_mismatch() {
    let dir = TempDir::new().unwrap();
    let v = json_stdout(broadphase(&dir).args([
        "run", "--frames", "25", "--count", "120", "--compare", "--json",
    ]));
    assert_eq!(v["summary"]["frames"], 25);
    assert_eq!(v["summary"]["mismatches"], 0);
    assert_eq!(v["summary"]["mode"], "bvh");
    let frames = v["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 25);
    for f in frames {
        assert_eq!(f["shapes"], 120);
        assert_eq!(f["brute_pairs"], f["broad_pairs"]);
    }
}

#[test]
fn run_is_deterministic_for_a_seed() {
    let dir = TempDir::new().unwrap();
    let args = ["run", "--frames", "15", "--seed", "99", "--json"];
    let a = json_stdout(broadphase(&dir).args(args));
    let b = json_stdout(broadphase(&dir).args(args));
    assert_eq!(a, b);
}

#[test]
fn brute_force_mode_counts_every_pair_test() {
    let dir = TempDir::new().unwrap();
    let v = json_stdout(broadphase(&dir).args([
        "run", "--frames", "1", "--count", "10", "--mode", "brute-force", "--json",
    ]));
    assert_eq!(v["summary"]["mode"], "brute-force");
    assert_eq!(v["frames"][0]["bound_tests"], 45);
}

#[test]
fn out_of_range_count_is_rejected() {
    let dir = TempDir::new().unwrap();
    broadphase(&dir)
        .args(["run", "--count", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid simulation settings"));
}

#[test]
fn query_prints_trace_for_shape() {
    let dir = TempDir::new().unwrap();
    broadphase(&dir)
        .args(["query", "--shape", "2", "--count", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("visit"))
        .stdout(predicate::str::contains("shape 2 (frame 0)"));
}

#[test]
fn query_json_candidates_exclude_self() {
    let dir = TempDir::new().unwrap();
    let v = json_stdout(broadphase(&dir).args([
        "query", "--shape", "0", "--count", "200", "--frames", "3", "--json",
    ]));
    assert_eq!(v["frame"], 2);
    assert_eq!(v["steps"][0]["node"], 0);
    let candidates = v["candidates"].as_array().unwrap();
    assert!(candidates.iter().all(|c| c != 0));
    assert_eq!(v["counts"]["leaf_tests"], candidates.len());
}

#[test]
fn query_unknown_shape_fails() {
    let dir = TempDir::new().unwrap();
    broadphase(&dir)
        .args(["query", "--shape", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot query shape 30"));
}

#[test]
fn tree_dumps_full_arena() {
    let dir = TempDir::new().unwrap();
    let v = json_stdout(broadphase(&dir).args(["tree", "--count", "12", "--json"]));
    let nodes = v.as_array().unwrap();
    assert_eq!(nodes.len(), 2 * 12 - 1);
    assert_eq!(nodes[0]["subtree_size"], 12);
    assert_eq!(nodes[0]["depth"], 0);

    broadphase(&dir)
        .args(["tree", "--count", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes: 23"));
}

#[test]
fn prefs_save_show_and_reset() {
    let dir = TempDir::new().unwrap();
    let defaults = json_stdout(broadphase(&dir).args(["prefs", "show"]));
    assert_eq!(defaults["sim"]["target_count"], 30);

    broadphase(&dir)
        .args(["run", "--frames", "1", "--count", "64", "--save-prefs"])
        .assert()
        .success();
    assert!(dir.path().join("demo_prefs.json").exists());
    let saved = json_stdout(broadphase(&dir).args(["prefs", "show"]));
    assert_eq!(saved["sim"]["target_count"], 64);

    let v = json_stdout(broadphase(&dir).args(["run", "--frames", "1", "--json"]));
    assert_eq!(v["summary"]["shapes"], 64);

    broadphase(&dir)
        .args(["prefs", "reset"])
        .assert()
        .success()
        .stderr(predicate::str::contains("removed"));
    let reset = json_stdout(broadphase(&dir).args(["prefs", "show"]));
    assert_eq!(reset, defaults);
}
