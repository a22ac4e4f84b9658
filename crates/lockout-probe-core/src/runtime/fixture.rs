// crates/lockout-probe-core/src/runtime/fixture.rs
// ============================================================================
// Module: Fixture Writer
// Description: Materializes service policies under the service-config root.
// Purpose: Create and remove the policy file the authentication stack loads.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The fixture writer owns the service-config root and persists rendered
//! policies there, one file per service name. Writes are create-or-truncate
//! with exact byte content. Destination paths are bounded by a fixed budget
//! and rejected deterministically when they exceed it. Removal of an absent
//! file is surfaced as a status rather than an error so scenario cleanup
//! stays idempotent.

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

use crate::core::policy::ServiceName;
use crate::core::policy::ServicePolicy;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum byte length of a rendered service-policy path.
pub const MAX_SERVICE_PATH_BYTES: usize = 128;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while writing or removing policy fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The rendered destination path exceeded the fixed budget.
    #[error("service path exceeds {MAX_SERVICE_PATH_BYTES} bytes: {path}")]
    PathTooLong {
        /// Rendered path that exceeded the budget.
        path: String,
    },
    /// Filesystem operation failed.
    #[error("fixture i/o failed for {path}: {source}")]
    Io {
        /// Path the operation targeted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// SECTION: Removal Status
// ============================================================================

/// Outcome of removing a persisted artifact.
///
/// # Invariants
/// - `AlreadyAbsent` is a status, not a failure; removal is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveStatus {
    /// The artifact existed and was removed.
    Removed,
    /// No artifact existed at removal time.
    AlreadyAbsent,
}

// ============================================================================
// SECTION: Fixture Writer
// ============================================================================

/// Writer for service-policy files under a fixed service-config root.
///
/// # Invariants
/// - One file per service name; writing again under the same name overwrites.
/// - Every written policy must be removed by the scenario that created it.
#[derive(Debug, Clone)]
pub struct FixtureWriter {
    /// Service-config root the stack loads policies from.
    config_dir: PathBuf,
}

impl FixtureWriter {
    /// Creates a writer rooted at the given service-config directory.
    #[must_use]
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Returns the destination path for a service name, enforcing the budget.
    ///
    /// # Errors
    /// Returns [`FixtureError::PathTooLong`] when the rendered path exceeds
    /// [`MAX_SERVICE_PATH_BYTES`].
    pub fn service_path(&self, service: &ServiceName) -> Result<PathBuf, FixtureError> {
        let path = self.config_dir.join(service.as_str());
        if path.as_os_str().len() > MAX_SERVICE_PATH_BYTES {
            return Err(FixtureError::PathTooLong {
                path: path.display().to_string(),
            });
        }
        Ok(path)
    }

    /// Persists a rendered policy, creating or truncating the target file.
    ///
    /// # Errors
    /// Returns a [`FixtureError`] when the path exceeds the budget or the
    /// write fails.
    pub fn write_policy(&self, policy: &ServicePolicy) -> Result<(), FixtureError> {
        let path = self.service_path(&policy.service)?;
        fs::write(&path, policy.render()).map_err(|source| io_error(&path, source))
    }

    /// Removes the persisted policy for a service name.
    ///
    /// # Errors
    /// Returns a [`FixtureError`] on I/O failure; an absent file yields
    /// [`RemoveStatus::AlreadyAbsent`].
    pub fn remove_policy(&self, service: &ServiceName) -> Result<RemoveStatus, FixtureError> {
        let path = self.service_path(service)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(RemoveStatus::Removed),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Ok(RemoveStatus::AlreadyAbsent)
            }
            Err(source) => Err(io_error(&path, source)),
        }
    }

    /// Returns true when a policy file exists for the service name.
    #[must_use]
    pub fn policy_exists(&self, service: &ServiceName) -> bool {
        self.config_dir.join(service.as_str()).is_file()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Wraps an I/O error with the path it targeted.
fn io_error(path: &Path, source: io::Error) -> FixtureError {
    FixtureError::Io {
        path: path.display().to_string(),
        source,
    }
}
