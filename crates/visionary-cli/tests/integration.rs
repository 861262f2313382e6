#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use visionary_core::capsule::{Capsule, NewCapsule};
use visionary_core::seal::NoteCipher;
use visionary_core::store::CapsuleDb;

const SECRET: &str = "cli-secret";

/// `visionary` with a clean environment rooted in `dir`.
fn visionary(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("visionary").unwrap();
    cmd.current_dir(dir.path()).env_clear();
    cmd
}

/// `visionary` with a complete configuration pointing at a temp database.
fn configured(dir: &TempDir) -> Command {
    let mut cmd = visionary(dir);
    cmd.env("VISIONARY_SECRET_KEY", SECRET)
        .env("GEMINI_API_KEY", "unused")
        .env("MAIL_API_KEY", "unused")
        .env("MAIL_FROM", "hello@visionary.test")
        .env("VISIONARY_DB_PATH", dir.path().join("capsules.redb"));
    cmd
}

fn seed_capsule(dir: &TempDir, note: &str) -> Capsule {
    let db = CapsuleDb::open(&dir.path().join("capsules.redb")).unwrap();
    let input = NewCapsule::new("ana@example.com", "Learn Portuguese", note).unwrap();
    let sealed = NoteCipher::new(SECRET).unwrap().seal(note).unwrap();
    let capsule = Capsule::new(
        &input,
        sealed,
        visionary_core::extract_roadmap(r#"{"January":"Duolingo daily"}"#),
        chrono::Utc::now(),
    );
    db.insert(&capsule).unwrap();
    capsule
}

// ---------------------------------------------------------------------------
// visionary extract
// ---------------------------------------------------------------------------

#[test]
fn extract_reads_stdin_and_finds_wrapped_object() {
    let dir = TempDir::new().unwrap();
    visionary(&dir)
        .arg("extract")
        .write_stdin("Sure! Here is your plan:\n```json\n{\"February\":\"B\",\"January\":\"A\"}\n```\nEnjoy!")
        .assert()
        .success()
        .stdout(predicate::str::contains("outcome: parsed"))
        .stdout(predicate::str::contains("January: A"))
        .stdout(predicate::str::contains("February: B"));
}

#[test]
fn extract_json_reports_fallback() {
    let dir = TempDir::new().unwrap();
    visionary(&dir)
        .args(["extract", "--json"])
        .write_stdin("The roadmap could not be generated this time.")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"fallback_used\""))
        .stdout(predicate::str::contains("\"December\": \"Goal achievement\""));
}

#[test]
fn extract_reads_file_argument() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("raw.txt");
    std::fs::write(&path, "{\"Foo\":\"Bar\"}").unwrap();
    visionary(&dir)
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Foo: Bar"));
}

#[test]
fn extract_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    visionary(&dir)
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// ---------------------------------------------------------------------------
// visionary list / open
// ---------------------------------------------------------------------------

#[test]
fn list_without_configuration_names_missing_variable() {
    let dir = TempDir::new().unwrap();
    visionary(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("VISIONARY_SECRET_KEY"));
}

#[test]
fn list_empty_store() {
    let dir = TempDir::new().unwrap();
    configured(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No capsules."));
}

#[test]
fn list_shows_seeded_capsule() {
    let dir = TempDir::new().unwrap();
    let capsule = seed_capsule(&dir, "obrigado");
    configured(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(capsule.id.to_string()))
        .stdout(predicate::str::contains("ana@example.com"))
        .stdout(predicate::str::contains("sealed"));
}

#[test]
fn open_prints_decrypted_note() {
    let dir = TempDir::new().unwrap();
    let capsule = seed_capsule(&dir, "Fala comigo em dezembro.");
    configured(&dir)
        .args(["open", &capsule.id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fala comigo em dezembro."));
}

#[test]
fn open_rejects_bad_and_unknown_ids() {
    let dir = TempDir::new().unwrap();
    configured(&dir)
        .args(["open", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a capsule id"));

    configured(&dir)
        .args(["open", "6f1c8d2e-0000-4000-8000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("capsule not found"));
}

// ---------------------------------------------------------------------------
// visionary delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_capsule_from_listing() {
    let dir = TempDir::new().unwrap();
    let capsule = seed_capsule(&dir, "never mind");
    let id = capsule.id.to_string();

    configured(&dir)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted capsule"));

    configured(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No capsules."));

    configured(&dir)
        .args(["delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("capsule not found"));
}
