// crates/lockout-probe-core/tests/tally.rs
// ============================================================================
// Module: Tally Inspector Tests
// Description: Verifies record observation, count parsing, and the sweep.
// ============================================================================
//! ## Overview
//! Ensures the inspector observes records without writing them, interprets
//! the `[Fails]` count conservatively, treats absent state as benign, and
//! sweeps only regular files.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;

use lockout_probe_core::RemoveStatus;
use lockout_probe_core::TallyError;
use lockout_probe_core::TallyInspector;
use tempfile::TempDir;

#[test]
fn record_exists_tracks_per_user_files() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path());

    assert!(!inspector.record_exists("user"));
    fs::write(dir.path().join("user"), "[Fails]\ncount = 1\n").unwrap();
    assert!(inspector.record_exists("user"));
    assert!(!inspector.record_exists("other"));
}

#[test]
fn read_count_parses_fails_table() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path());
    fs::write(dir.path().join("user"), "[Fails]\ncount = 4\n").unwrap();

    assert_eq!(inspector.read_count("user").unwrap(), Some(4));
}

#[test]
fn read_count_of_absent_record_is_none() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path());

    assert_eq!(inspector.read_count("user").unwrap(), None);
}

#[test]
fn read_count_rejects_malformed_records() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path());

    fs::write(dir.path().join("user"), "not a record").unwrap();
    assert!(matches!(inspector.read_count("user"), Err(TallyError::Malformed { .. })));

    fs::write(dir.path().join("user"), "[Fails]\ncount = -2\n").unwrap();
    assert!(matches!(inspector.read_count("user"), Err(TallyError::Malformed { .. })));
}

#[test]
fn remove_record_reports_removed_then_already_absent() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path());
    fs::write(dir.path().join("user"), "[Fails]\ncount = 1\n").unwrap();

    assert_eq!(inspector.remove_record("user").unwrap(), RemoveStatus::Removed);
    assert_eq!(inspector.remove_record("user").unwrap(), RemoveStatus::AlreadyAbsent);
}

#[test]
fn clear_removes_every_regular_file() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path());
    fs::write(dir.path().join("alice"), "[Fails]\ncount = 1\n").unwrap();
    fs::write(dir.path().join("bob"), "[Fails]\ncount = 2\n").unwrap();

    let report = inspector.clear().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.removed, 2);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn clear_skips_directories() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path());
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("user"), "[Fails]\ncount = 1\n").unwrap();

    let report = inspector.clear().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.removed, 1);
    assert!(dir.path().join("nested").is_dir());
}

#[test]
fn clear_of_missing_directory_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path().join("missing"));

    let report = inspector.clear().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.removed, 0);
}

#[test]
fn clear_of_empty_directory_reports_success() {
    let dir = TempDir::new().unwrap();
    let inspector = TallyInspector::new(dir.path());

    let report = inspector.clear().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.removed, 0);
}
