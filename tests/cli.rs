//! Tests running the `pdf` binary in a scratch directory

use assert_cmd::Command;
use pdfpages::utils;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn pdf(work_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pdf").unwrap();
    cmd.current_dir(work_dir)
        .env_remove("PDF_ATOMIC")
        .env_remove("PDF_EXIT_CODE")
        .env_remove("RUST_LOG");
    cmd
}

fn work_dir_with(docs: &[(&str, u8)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (file_name, num_pages) in docs {
        utils::write_basic_pdf(dir.path().join(file_name), *num_pages).unwrap();
    }
    dir
}

fn labels_of(path: &Path) -> Vec<String> {
    utils::page_labels(&lopdf::Document::load(path).unwrap()).unwrap()
}

#[test]
fn no_subcommand_prints_help() {
    let dir = TempDir::new().unwrap();

    pdf(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("merge").and(predicate::str::contains("cut")));
}

#[test]
fn merge_writes_default_output() {
    let dir = work_dir_with(&[("a.pdf", 1), ("b.pdf", 2)]);

    pdf(dir.path())
        .args(["merge", "a.pdf", "b.pdf"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert_eq!(
        labels_of(&dir.path().join("merged.pdf")),
        vec!["a.pdf Page 1 of 1", "b.pdf Page 1 of 2", "b.pdf Page 2 of 2"]
    );
}

#[test]
fn merge_overwrites_named_output() {
    let dir = work_dir_with(&[("a.pdf", 2)]);
    std::fs::write(dir.path().join("out.pdf"), b"stale").unwrap();

    pdf(dir.path())
        .args(["merge", "-n", "out", "a.pdf"])
        .assert()
        .success();

    assert_eq!(
        labels_of(&dir.path().join("out.pdf")),
        vec!["a.pdf Page 1 of 2", "a.pdf Page 2 of 2"]
    );
}

#[test]
fn missing_file_exits_zero_by_default() {
    let dir = work_dir_with(&[("a.pdf", 1)]);

    pdf(dir.path())
        .args(["merge", "a.pdf", "ghost.pdf"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "pdf: 'ghost.pdf' is not found in the current directory.",
        ));

    assert!(!dir.path().join("merged.pdf").exists());
}

#[test]
fn missing_file_fails_with_exit_code_flag() {
    let dir = work_dir_with(&[("a.pdf", 1)]);

    pdf(dir.path())
        .args(["--exit-code", "merge", "a.pdf", "ghost.pdf"])
        .assert()
        .code(1);
}

#[test]
fn exit_code_from_environment() {
    let dir = TempDir::new().unwrap();

    pdf(dir.path())
        .env("PDF_EXIT_CODE", "true")
        .arg("merge")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no files provided."));
}

#[test]
fn corrupt_file_is_omitted() {
    let dir = work_dir_with(&[("good.pdf", 1)]);
    std::fs::write(dir.path().join("corrupt.pdf"), b"not a pdf").unwrap();

    pdf(dir.path())
        .args(["merge", "good.pdf", "corrupt.pdf"])
        .assert()
        .success()
        .stderr(predicate::str::contains("omitted file provided: 'corrupt.pdf'"));

    assert_eq!(
        labels_of(&dir.path().join("merged.pdf")),
        vec!["good.pdf Page 1 of 1"]
    );
}

#[test]
fn atomic_merge_writes_nothing() {
    let dir = work_dir_with(&[("good.pdf", 1)]);
    std::fs::write(dir.path().join("corrupt.pdf"), b"not a pdf").unwrap();

    pdf(dir.path())
        .args(["merge", "--atomic", "good.pdf", "corrupt.pdf"])
        .assert()
        .success()
        .stderr(predicate::str::contains("merge aborted"));

    assert!(!dir.path().join("merged.pdf").exists());
}

#[test]
fn cut_page_run() {
    let dir = work_dir_with(&[("file.pdf", 5)]);

    pdf(dir.path())
        .args(["cut", "-n", "part", "file.pdf", "1", "3"])
        .assert()
        .success();

    assert_eq!(
        labels_of(&dir.path().join("part.pdf")),
        vec![
            "file.pdf Page 2 of 5",
            "file.pdf Page 3 of 5",
            "file.pdf Page 4 of 5"
        ]
    );
}

#[test]
fn cut_with_negative_start_counts_from_end() {
    let dir = work_dir_with(&[("file.pdf", 4)]);

    pdf(dir.path())
        .args(["cut", "file.pdf", "-3", "2"])
        .assert()
        .success();

    assert_eq!(
        labels_of(&dir.path().join("cut.pdf")),
        vec!["file.pdf Page 2 of 4", "file.pdf Page 3 of 4"]
    );
}

#[test]
fn cut_with_too_many_positions_is_silent() {
    let dir = work_dir_with(&[("file.pdf", 5)]);

    pdf(dir.path())
        .args(["cut", "file.pdf", "1", "2", "3"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert!(!dir.path().join("cut.pdf").exists());
}

#[test]
fn cut_non_pdf_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"plain text").unwrap();

    pdf(dir.path())
        .args(["cut", "notes.txt", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("'notes.txt' is not a pdf file."));

    assert!(!dir.path().join("cut.pdf").exists());
}
