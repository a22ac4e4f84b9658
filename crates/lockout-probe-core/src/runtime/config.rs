// crates/lockout-probe-core/src/runtime/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Fixed paths, identities, and thresholds for a harness run.
// Purpose: Load TOML configuration with complete defaults.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! One [`HarnessConfig`] is instantiated per test process and passed
//! explicitly to the components that need it; nothing reads process-wide
//! state. Every field has a default matching the module under test's stock
//! deployment, so an empty or absent configuration file yields a working
//! harness.

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

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while loading the harness configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("failed to parse config {path}: {detail}")]
    Parse {
        /// Path of the configuration file.
        path: String,
        /// Parse failure detail.
        detail: String,
    },
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Harness configuration with defaults for the stock module deployment.
///
/// # Invariants
/// - `free_tries` mirrors the module under test's configured threshold; the
///   bounce scenario drives at least that many failing attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Service-config root the authentication stack loads policies from.
    pub service_dir: PathBuf,
    /// Service name used for the harness's policy fixture.
    pub service_name: String,
    /// State directory the module under test keeps tally records in.
    pub tally_dir: PathBuf,
    /// Module reference written into policy directives.
    pub module: String,
    /// User identity the suite authenticates as.
    pub user: String,
    /// Correct password for the test user.
    pub password: String,
    /// Deliberately wrong password for failing attempts.
    pub wrong_password: String,
    /// Lockout threshold configured in the module under test.
    pub free_tries: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            service_dir: PathBuf::from("/etc/pam.d"),
            service_name: "test-lockout-probe".to_string(),
            tally_dir: PathBuf::from("/var/run/authramp"),
            module: "libpam_authramp.so".to_string(),
            user: "user".to_string(),
            password: "user".to_string(),
            wrong_password: "INVALID".to_string(),
            free_tries: 6,
        }
    }
}

impl HarnessConfig {
    /// Loads the configuration, falling back to defaults without a path.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            detail: err.to_string(),
        })
    }
}
