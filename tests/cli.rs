use assert_cmd::Command;
use std::fs;
use std::path::Path;

mod common;

fn yolocheck() -> Command {
    Command::cargo_bin("yolocheck").unwrap()
}

/// Build a small dataset: one good pair plus one undersized pair.
fn build_dataset(root: &Path) {
    common::write_textured_png(&root.join("images/keeper.png"), 100, 100);
    common::write_labels(&root.join("labels/keeper.txt"), "0 0.5 0.5 0.2 0.2\n");
    common::write_gray_png(&root.join("images/runt.png"), 10, 10, 0);
    common::write_labels(&root.join("labels/runt.txt"), "1 0.5 0.5 0.2 0.2\n");
    fs::write(root.join("data.yaml"), "names:\n  - ct\n  - t\n").expect("write data.yaml");
}

#[test]
fn runs() {
    let mut cmd = yolocheck();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = yolocheck();
    cmd.arg("-V");
    cmd.assert()
        .success()
        .stdout(predicates::str::starts_with("yolocheck"));
}

// Labels subcommand tests

#[test]
fn labels_valid_dataset_succeeds() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_labels(
        &temp.path().join("labels/a.txt"),
        "0 0.5 0.5 0.2 0.2\n1 0.25 0.75 0.1 0.3\n",
    );

    let mut cmd = yolocheck();
    cmd.args(["labels", "--classes", "6"]);
    cmd.arg(temp.path().join("labels"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("All annotations are valid"));
}

#[test]
fn labels_invalid_dataset_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_labels(&temp.path().join("labels/a.txt"), "9 0.5 0.5 0.2 0.2\n");

    let mut cmd = yolocheck();
    cmd.args(["labels", "--classes", "6"]);
    cmd.arg(temp.path().join("labels"));
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("InvalidClassId"));
}

#[test]
fn labels_discovers_class_count_from_data_yaml() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());

    let mut cmd = yolocheck();
    cmd.arg("labels");
    cmd.arg(temp.path().join("labels"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("All annotations are valid"));
}

#[test]
fn labels_without_class_source_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_labels(&temp.path().join("labels/a.txt"), "0 0.5 0.5 0.2 0.2\n");

    let mut cmd = yolocheck();
    cmd.arg("labels");
    cmd.arg(temp.path().join("labels"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("class count unknown"));
}

#[test]
fn labels_json_output_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_labels(&temp.path().join("labels/a.txt"), "9 0.5 0.5 0.2 0.2\n");

    let mut cmd = yolocheck();
    cmd.args(["labels", "--classes", "6", "--output", "json"]);
    cmd.arg(temp.path().join("labels"));
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("\"issues\""))
        .stdout(predicates::str::contains("\"InvalidClassId\""));
}

#[test]
fn labels_expect_class_flags_other_ids() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_labels(&temp.path().join("labels/a.txt"), "1 0.5 0.5 0.2 0.2\n");

    let mut cmd = yolocheck();
    cmd.args(["labels", "--classes", "6", "--expect-class", "3"]);
    cmd.arg(temp.path().join("labels"));
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("ClassMismatch"));
}

// Duplicates subcommand tests

#[test]
fn duplicates_reports_colliding_names() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_labels(&temp.path().join("a/x.txt"), "");
    common::write_labels(&temp.path().join("b/x.txt"), "");

    let mut cmd = yolocheck();
    cmd.arg("duplicates");
    cmd.arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("x.txt"))
        .stdout(predicates::str::contains("1 set(s)"));
}

#[test]
fn duplicates_strict_fails_on_collisions() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_labels(&temp.path().join("a/x.txt"), "");
    common::write_labels(&temp.path().join("b/x.txt"), "");

    let mut cmd = yolocheck();
    cmd.args(["duplicates", "--strict"]);
    cmd.arg(temp.path());
    cmd.assert().failure();
}

// Integrity subcommand tests

#[test]
fn integrity_flags_unreadable_images() {
    let temp = tempfile::tempdir().expect("create temp dir");
    fs::create_dir_all(temp.path().join("images")).expect("create images");
    fs::write(temp.path().join("images/broken.jpg"), b"not an image").expect("write junk");

    let mut cmd = yolocheck();
    cmd.arg("integrity");
    cmd.arg(temp.path().join("images"));
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("Unreadable"));
}

#[test]
fn integrity_reports_pairing_gaps() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_textured_png(&temp.path().join("images/lonely.png"), 64, 64);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");

    let mut cmd = yolocheck();
    cmd.arg("integrity");
    cmd.arg(temp.path().join("images"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("missing a label file"));
}

// Quality subcommand tests

#[test]
fn quality_reports_flagged_images() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());

    let mut cmd = yolocheck();
    cmd.arg("quality");
    cmd.arg(temp.path().join("images"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("too_small"))
        .stdout(predicates::str::contains("runt.png"));
}

#[test]
fn quality_dry_run_deletes_nothing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());

    let mut cmd = yolocheck();
    cmd.args(["quality", "--delete", "too_small", "--dry-run"]);
    cmd.arg(temp.path().join("images"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Dry run"));

    assert!(temp.path().join("images/runt.png").exists());
    assert!(temp.path().join("labels/runt.txt").exists());
}

#[test]
fn quality_declined_prompt_deletes_nothing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());

    let mut cmd = yolocheck();
    cmd.args(["quality", "--delete", "too_small"]);
    cmd.arg(temp.path().join("images"));
    cmd.write_stdin("no\n");
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Deletion cancelled"));

    assert!(temp.path().join("images/runt.png").exists());
    assert!(temp.path().join("labels/runt.txt").exists());
}

#[test]
fn quality_confirmed_deletion_removes_matching_pairs_only() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());

    let mut cmd = yolocheck();
    cmd.args(["quality", "--delete", "too_small", "--yes"]);
    cmd.arg(temp.path().join("images"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Deleted 1 image(s)"));

    assert!(!temp.path().join("images/runt.png").exists());
    assert!(!temp.path().join("labels/runt.txt").exists());
    assert!(temp.path().join("images/keeper.png").exists());
    assert!(temp.path().join("labels/keeper.txt").exists());
}

#[test]
fn quality_rejects_unknown_issue_kind() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());

    let mut cmd = yolocheck();
    cmd.args(["quality", "--delete", "too_shiny"]);
    cmd.arg(temp.path().join("images"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("unknown issue kind"));
}

// Sizes subcommand tests

#[test]
fn sizes_reports_target_distribution() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());

    let mut cmd = yolocheck();
    cmd.arg("sizes");
    cmd.arg(temp.path().join("images"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Target size check (640x640)"))
        .stdout(predicates::str::contains("Size categories:"));
}

#[test]
fn sizes_dry_run_keeps_oversized_pairs() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_textured_png(&temp.path().join("images/big.png"), 1000, 1000);
    common::write_labels(&temp.path().join("labels/big.txt"), "");

    let mut cmd = yolocheck();
    cmd.args(["sizes", "--delete-oversized", "--dry-run"]);
    cmd.arg(temp.path().join("images"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Dry run"));

    assert!(temp.path().join("images/big.png").exists());
    assert!(temp.path().join("labels/big.txt").exists());
}

// Remap subcommand tests

#[test]
fn remap_rewrites_mapped_ids() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_labels(
        &temp.path().join("labels/a.txt"),
        "1 0.5 0.5 0.2 0.2\n0 0.1 0.1 0.1 0.1\n",
    );

    let mut cmd = yolocheck();
    cmd.args(["remap", "--map", "1=3"]);
    cmd.arg(temp.path().join("labels"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Remapped 1 line(s)"));

    let content = fs::read_to_string(temp.path().join("labels/a.txt")).expect("read back");
    assert_eq!(content, "3 0.5 0.5 0.2 0.2\n0 0.1 0.1 0.1 0.1\n");
}

// Check subcommand tests

#[test]
fn check_runs_every_pass() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());

    let mut cmd = yolocheck();
    cmd.arg("check");
    cmd.arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("== Duplicate filenames =="))
        .stdout(predicates::str::contains("== Label format =="))
        .stdout(predicates::str::contains("== Image quality =="));
}

#[test]
fn check_fails_on_label_errors() {
    let temp = tempfile::tempdir().expect("create temp dir");
    build_dataset(temp.path());
    common::write_labels(&temp.path().join("labels/bad.txt"), "7 0.5 0.5 0.2 0.2\n");
    common::write_textured_png(&temp.path().join("images/bad.png"), 100, 100);

    let mut cmd = yolocheck();
    cmd.arg("check");
    cmd.arg(temp.path());
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("InvalidClassId"));
}

#[test]
fn check_missing_root_fails() {
    let mut cmd = yolocheck();
    cmd.args(["check", "definitely_not_a_dataset"]);
    cmd.assert().failure();
}
