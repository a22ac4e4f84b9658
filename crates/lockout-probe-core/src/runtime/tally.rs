// crates/lockout-probe-core/src/runtime/tally.rs
// ============================================================================
// Module: Tally Inspector
// Description: Observes and resets the module under test's tally directory.
// Purpose: Verify lockout side effects and restore a clean state directory.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The module under test persists one tally record per user identity under a
//! fixed state directory. The harness never writes records; it observes
//! existence, reads the failure count for assertions, and deletes records to
//! reset state between scenarios. Clearing is a best-effort sweep: every
//! entry is attempted and all failures are collected instead of aborting at
//! the first one, so a partial failure is visible as a set. A directory that
//! does not exist yet is a benign no-op.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::runtime::fixture::RemoveStatus;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while inspecting or clearing the tally directory.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Filesystem operation failed.
    #[error("tally i/o failed for {path}: {source}")]
    Io {
        /// Path the operation targeted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A tally record existed but its content could not be interpreted.
    #[error("malformed tally record at {path}: {detail}")]
    Malformed {
        /// Path of the malformed record.
        path: String,
        /// Parse failure detail.
        detail: String,
    },
}

// ============================================================================
// SECTION: Sweep Report
// ============================================================================

/// One entry the sweep failed to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    /// Path of the entry that could not be deleted.
    pub path: String,
    /// Deletion failure detail.
    pub detail: String,
}

/// Result of a best-effort sweep over the tally directory.
///
/// # Invariants
/// - `failures` lists every entry that survived the sweep, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SweepReport {
    /// Number of entries removed.
    pub removed: usize,
    /// Entries that could not be removed.
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    /// Returns true when every entry was removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// SECTION: Tally Inspector
// ============================================================================

/// Read-and-reset view over the module under test's state directory.
///
/// # Invariants
/// - Records are created and updated only by the module under test.
/// - Record file names equal the user identity they belong to.
#[derive(Debug, Clone)]
pub struct TallyInspector {
    /// State directory holding one record per user identity.
    tally_dir: PathBuf,
}

impl TallyInspector {
    /// Creates an inspector over the given state directory.
    #[must_use]
    pub fn new(tally_dir: impl Into<PathBuf>) -> Self {
        Self {
            tally_dir: tally_dir.into(),
        }
    }

    /// Returns the record path for a user identity.
    #[must_use]
    pub fn record_path(&self, user: &str) -> PathBuf {
        self.tally_dir.join(user)
    }

    /// Returns true when a tally record exists for the user identity.
    #[must_use]
    pub fn record_exists(&self, user: &str) -> bool {
        self.record_path(user).is_file()
    }

    /// Reads the failure count from a user's tally record.
    ///
    /// The record body is owned by the module under test; only the `[Fails]`
    /// table's `count` key is interpreted here.
    ///
    /// # Errors
    /// Returns a [`TallyError`] when the record exists but cannot be read or
    /// interpreted. An absent record yields `Ok(None)`.
    pub fn read_count(&self, user: &str) -> Result<Option<u32>, TallyError> {
        let path = self.record_path(user);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_error(&path, source)),
        };
        let doc: TallyRecordDoc =
            toml::from_str(&content).map_err(|err| TallyError::Malformed {
                path: path.display().to_string(),
                detail: err.to_string(),
            })?;
        let count = doc.fails.and_then(|fails| fails.count).ok_or_else(|| {
            TallyError::Malformed {
                path: path.display().to_string(),
                detail: "missing [Fails] count".to_string(),
            }
        })?;
        let count = u32::try_from(count).map_err(|_| TallyError::Malformed {
            path: path.display().to_string(),
            detail: format!("negative failure count: {count}"),
        })?;
        Ok(Some(count))
    }

    /// Removes the tally record for one user identity.
    ///
    /// # Errors
    /// Returns a [`TallyError`] on I/O failure; an absent record yields
    /// [`RemoveStatus::AlreadyAbsent`].
    pub fn remove_record(&self, user: &str) -> Result<RemoveStatus, TallyError> {
        let path = self.record_path(user);
        match fs::remove_file(&path) {
            Ok(()) => Ok(RemoveStatus::Removed),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Ok(RemoveStatus::AlreadyAbsent)
            }
            Err(source) => Err(io_error(&path, source)),
        }
    }

    /// Sweeps the state directory, deleting every regular file in it.
    ///
    /// Deletion failures are collected into the report instead of aborting
    /// the sweep, so callers see the full set of surviving entries. A state
    /// directory that does not exist yet yields an empty report.
    ///
    /// # Errors
    /// Returns a [`TallyError`] only when the directory itself cannot be
    /// enumerated.
    pub fn clear(&self) -> Result<SweepReport, TallyError> {
        let entries = match fs::read_dir(&self.tally_dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(SweepReport::default());
            }
            Err(source) => return Err(io_error(&self.tally_dir, source)),
        };

        let mut report = SweepReport::default();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => return Err(io_error(&self.tally_dir, source)),
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => report.removed += 1,
                Err(source) => report.failures.push(SweepFailure {
                    path: path.display().to_string(),
                    detail: source.to_string(),
                }),
            }
        }
        Ok(report)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Subset of the record body the harness interprets; the rest is opaque.
#[derive(Debug, Deserialize)]
struct TallyRecordDoc {
    /// Failure table maintained by the module under test.
    #[serde(rename = "Fails")]
    fails: Option<FailsTable>,
}

/// Failure table fields the harness reads.
#[derive(Debug, Deserialize)]
struct FailsTable {
    /// Persisted failure count.
    count: Option<i64>,
}

/// Wraps an I/O error with the path it targeted.
fn io_error(path: &Path, source: io::Error) -> TallyError {
    TallyError::Io {
        path: path.display().to_string(),
        source,
    }
}
