//! End-to-end tests over the `synrec` binary.

use assert_cmd::Command;
use predicates::prelude::*;

use synrec_core::parse_tree;
use synrec_rec::dl_score;

fn synrec() -> Command {
    Command::cargo_bin("synrec").expect("binary builds")
}

#[test]
fn help_lists_every_subcommand() {
    synrec()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("simulate")
                .and(predicate::str::contains("erase"))
                .and(predicate::str::contains("reconcile"))
                .and(predicate::str::contains("evaluate"))
                .and(predicate::str::contains("viz")),
        );
}

#[test]
fn simulate_is_byte_identical_per_seed() {
    let run = || {
        let output = synrec()
            .args(["simulate", "--seed", "42"])
            .output()
            .expect("run simulate");
        assert!(output.status.success());
        output.stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn different_seeds_produce_different_trees() {
    let run = |seed: &str| {
        synrec()
            .args(["simulate", "--seed", seed])
            .output()
            .expect("run simulate")
            .stdout
    };
    assert_ne!(run("1"), run("2"));
}

#[test]
fn simulate_erase_reconcile_pipeline_never_worsens_the_reference() {
    let dir = tempfile::tempdir().expect("tempdir");
    let reference_path = dir.path().join("reference.nhx");
    let erased_path = dir.path().join("erased.nhx");
    let reconciled_path = dir.path().join("reconciled.nhx");

    synrec()
        .args(["simulate", "--seed", "7", "--base", "a b c d", "--depth", "4"])
        .args(["--output", reference_path.to_str().expect("utf-8 path")])
        .assert()
        .success();
    synrec()
        .args(["erase", "--input", reference_path.to_str().expect("utf-8 path")])
        .args(["--output", erased_path.to_str().expect("utf-8 path")])
        .assert()
        .success();
    synrec()
        .args(["reconcile", "--input", erased_path.to_str().expect("utf-8 path")])
        .args(["--output", reconciled_path.to_str().expect("utf-8 path")])
        .assert()
        .success();

    let reference =
        parse_tree(std::fs::read_to_string(&reference_path).expect("read").trim())
            .expect("parse reference");
    let reconciled =
        parse_tree(std::fs::read_to_string(&reconciled_path).expect("read").trim())
            .expect("parse reconciled");
    assert!(dl_score(&reconciled) <= dl_score(&reference));
}

#[test]
fn erase_strips_internal_labels_and_collapses_losses() {
    // Internal syntenies vanish; the root and the leaves keep theirs.
    synrec()
        .arg("erase")
        .write_stdin(
            "(a b c,(a,a b)a b[&&NHX:event=duplication])a b c[&&NHX:event=speciation:segfmt=2];\n",
        )
        .assert()
        .success()
        .stdout(
            predicate::str::contains("(a,a b)[&&NHX:event=duplication]")
                .and(predicate::str::contains(")a b c[&&NHX:event=speciation")),
        );

    // A cascaded-loss input: the unary loss vanishes.
    synrec()
        .arg("erase")
        .write_stdin("((a)a b c[&&NHX:event=loss:segment=1 - 3],a b c)a b c[&&NHX:event=speciation:segfmt=2];\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("event=loss").not());
}

#[test]
fn reconcile_unordered_runs_on_rearranged_leaves() {
    synrec()
        .args(["reconcile", "--unordered"])
        .write_stdin("(b a,a c)[&&NHX:event=speciation];\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("event=loss"));
}

#[test]
fn reconcile_rejects_malformed_trees() {
    synrec()
        .arg("reconcile")
        .write_stdin("((a)[&&NHX:event=speciation],a)a[&&NHX:event=speciation];\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("children"));
}

#[test]
fn failures_carry_stable_error_codes_and_hints() {
    // An inconsistent input: "b a" cannot embed in "a b".
    synrec()
        .arg("reconcile")
        .write_stdin("(a b,b a)a b[&&NHX:event=speciation];\n")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("code: E5001")
                .and(predicate::str::contains("hint:")),
        );

    // A structural failure maps into the tree-structure range.
    synrec()
        .arg("reconcile")
        .write_stdin("(a,b)c[&&NHX:event=transfer];\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("code: E2004"));

    // Syntax failures map to the text-format range.
    synrec()
        .arg("viz")
        .write_stdin("(a,b\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("code: E1001"));
}

#[test]
fn reconcile_reports_parse_locations() {
    synrec()
        .arg("reconcile")
        .write_stdin("(a,b\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line"));
}

#[test]
fn viz_emits_a_dot_digraph() {
    synrec()
        .arg("viz")
        .write_stdin("(x,x x')x x'[&&NHX:event=duplication:segment=0 - 1:segfmt=2];\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("digraph event_tree")
                .and(predicate::str::contains("duplication")),
        );
}

#[test]
fn evaluate_writes_one_entry_per_grid_point_with_sample_size_samples() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report_path = dir.path().join("sweep.json");

    synrec()
        .args(["evaluate", "--output", report_path.to_str().expect("utf-8 path")])
        .args(["--base", "a b c", "--depth", "{2,3}", "--p-dup", "0.4"])
        .args(["--sample-size", "3", "--jobs", "2"])
        .args(["--metrics", "dlscore", "--metrics", "duration"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("read report"))
            .expect("valid json");
    let points = json.as_array().expect("array");
    assert_eq!(points.len(), 2);
    for point in points {
        assert_eq!(point["params"]["base"], "a b c");
        assert_eq!(point["dlscore"].as_array().expect("dlscore").len(), 3);
        assert_eq!(point["duration"].as_array().expect("duration").len(), 3);
        for difference in point["dlscore"].as_array().expect("dlscore") {
            assert!(difference.as_i64().expect("integer") >= 0);
        }
    }
}

#[test]
fn evaluate_supports_the_unordered_engine_and_single_metrics() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report_path = dir.path().join("sweep.json");

    synrec()
        .args(["evaluate", "--unordered"])
        .args(["--output", report_path.to_str().expect("utf-8 path")])
        .args(["--base", "a b c d", "--depth", "3", "--p-loss", "{0.1,0.4}"])
        .args(["--sample-size", "2", "--jobs", "1", "--metrics", "duration"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("read report"))
            .expect("valid json");
    let points = json.as_array().expect("array");
    assert_eq!(points.len(), 2);
    for point in points {
        // Only the requested metric appears.
        assert!(point.get("dlscore").is_none());
        assert_eq!(point["duration"].as_array().expect("duration").len(), 2);
    }
}

#[test]
fn reconcile_output_feeds_viz() {
    let reconciled = synrec()
        .arg("reconcile")
        .write_stdin("(a b c,a c)a b c[&&NHX:event=speciation];\n")
        .output()
        .expect("reconcile");
    assert!(reconciled.status.success());

    synrec()
        .arg("viz")
        .write_stdin(reconciled.stdout)
        .assert()
        .success()
        .stdout(predicate::str::contains("style=dashed"));
}

#[test]
fn completions_emit_a_script_for_each_shell() {
    for shell in ["bash", "zsh", "fish"] {
        synrec()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("synrec"));
    }
}

#[test]
fn evaluate_rejects_malformed_axes() {
    synrec()
        .args(["evaluate", "--output", "-", "--p-dup", "[0.9:0.1]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("range"));
}
