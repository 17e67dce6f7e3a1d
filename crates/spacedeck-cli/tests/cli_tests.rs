//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's config and progress files.
fn spacedeck(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("spacedeck").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("SPACEDECK_GEMINI_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn data_file(dir: &TempDir) -> PathBuf {
    dir.path().join("progress.json")
}

fn saved(dir: &TempDir) -> serde_json::Value {
    let raw = std::fs::read_to_string(data_file(dir)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn stats_on_fresh_deck() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .arg("stats")
        .arg("--data")
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("word"))
        .stdout(predicate::str::contains("12"))
        .stdout(predicate::str::contains("19 items: 0 mastered, 19 pending"))
        .stdout(predicate::str::contains(
            "Only 7 sentence(s) available for the next session",
        ));
}

#[test]
fn stats_as_json() {
    let dir = TempDir::new().unwrap();
    let output = spacedeck(dir.path())
        .args(["stats", "--json", "--data"])
        .arg(data_file(&dir))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["word"]["total"], 12);
    assert_eq!(report["sentence"]["unseen"], 7);
    assert_eq!(report["overall"]["pending"], 19);
    assert_eq!(report["settings"]["words"]["cardsPerSession"], 10);
}

#[test]
fn list_filters_by_kind() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["list", "--kind", "sentence", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("s1"))
        .stdout(predicate::str::contains("I am learning English"))
        .stdout(predicate::str::contains("7 item(s)"))
        .stdout(predicate::str::contains("casa").not());
}

#[test]
fn add_and_delete_items() {
    let dir = TempDir::new().unwrap();

    spacedeck(dir.path())
        .args(["add-word", "--prompt", "mesa", "--answer", "table", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Added word w100"));

    spacedeck(dir.path())
        .args(["add-sentence", "--prompt", "Eu sou", "--answer", "I am", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Added sentence s101"));

    spacedeck(dir.path())
        .args(["delete", "w1", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted w1 (casa)"));

    let snapshot = saved(&dir);
    assert_eq!(snapshot["version"], 2);
    assert_eq!(snapshot["catalog"]["nextId"], 102);

    spacedeck(dir.path())
        .args(["list", "--kind", "word", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("table"))
        .stdout(predicate::str::contains("12 item(s)"));
}

#[test]
fn add_rejects_empty_text() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["add-word", "--prompt", "  ", "--answer", "table", "--data"])
        .arg(data_file(&dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("prompt text must not be empty"));
}

#[test]
fn delete_unknown_item_fails() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["delete", "w999", "--data"])
        .arg(data_file(&dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown item: w999"));
}

#[test]
fn settings_are_clamped_and_saved() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["settings", "--words", "0", "--sentences", "-4", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Words per session: 1"))
        .stdout(predicate::str::contains("Sentences per session: 1"));

    spacedeck(dir.path())
        .args(["settings", "--words", "5", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Words per session: 5"))
        .stdout(predicate::str::contains("Sentences per session: 1"));
}

#[test]
fn theme_round_trip() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["theme", "dark", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));

    spacedeck(dir.path())
        .args(["theme", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));

    assert_eq!(saved(&dir)["theme"], "dark");
}

#[test]
fn study_answers_are_saved() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["settings", "--words", "1", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success();

    // The one-word queue always holds w1, the first unseen word.
    spacedeck(dir.path())
        .args(["study", "--kind", "word", "--seed", "3", "--data"])
        .arg(data_file(&dir))
        .write_stdin("house\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/1] word: casa"))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("1 answered, 1 correct, 0 to review"));

    let snapshot = saved(&dir);
    assert_eq!(snapshot["itemProgress"]["w1"]["mastered"], true);
    assert_eq!(snapshot["itemProgress"]["w1"]["correctCount"], 1);

    spacedeck(dir.path())
        .args(["stats", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("19 items: 1 mastered, 18 pending"));
}

#[test]
fn study_quits_on_end_of_input() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["study", "--kind", "all", "--seed", "9", "--data"])
        .arg(data_file(&dir))
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/17]"))
        .stdout(predicate::str::contains("0 answered"));
}

#[test]
fn reset_clears_progress() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["study", "--kind", "word", "--seed", "1", "--data"])
        .arg(data_file(&dir))
        .write_stdin("wrong\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not quite."));

    spacedeck(dir.path())
        .args(["reset", "--kind", "word", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset progress for every word."));

    let snapshot = saved(&dir);
    let progress = snapshot["itemProgress"].as_object().unwrap();
    assert!(progress
        .values()
        .all(|p| p["attempts"] == 0 && p["seen"] == false));
}

#[test]
fn hint_uses_offline_text_without_key() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["hint", "w1", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("I like the house."));
}

#[test]
fn corrupt_progress_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(data_file(&dir), "{ not json").unwrap();
    spacedeck(dir.path())
        .args(["stats", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("19 items"))
        .stderr(predicate::str::contains("discarding saved progress"));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    spacedeck(dir.path())
        .args(["stats", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    spacedeck(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created spacedeck.toml"));
    assert!(dir.path().join("spacedeck.toml").exists());

    spacedeck(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    // The generated config must load cleanly.
    spacedeck(dir.path())
        .args(["stats", "--data"])
        .arg(data_file(&dir))
        .assert()
        .success();
}
