// crates/lockout-probe-core/src/core/outcome.rs
// ============================================================================
// Module: Authentication Outcome
// Description: Phase-reached outcome for a single authentication attempt.
// Purpose: Preserve raw stack result codes for diagnostic reporting.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! One driver attempt walks open, authenticate, and account-check phases in
//! order, each gated on the previous one succeeding. The outcome records the
//! furthest phase reached and the raw result code of the phase that stopped
//! it. Session-close failure is carried separately because it is orthogonal
//! to the business outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::interfaces::SERVICE_SUCCESS;
use crate::interfaces::ServiceError;

// ============================================================================
// SECTION: Phases
// ============================================================================

/// Furthest phase reached by a single authentication attempt.
///
/// # Invariants
/// - Variants are stable for serialization and report matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// Opening the session failed.
    OpenFailed,
    /// Credential verification failed.
    AuthFailed,
    /// Account-validity evaluation failed.
    AcctCheckFailed,
    /// All phases succeeded.
    Success,
}

impl AuthPhase {
    /// Returns a stable label for the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenFailed => "open failed",
            Self::AuthFailed => "authentication failed",
            Self::AcctCheckFailed => "account check failed",
            Self::Success => "success",
        }
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Outcome of one attempt through the authentication stack.
///
/// # Invariants
/// - `code` is the raw result code of the phase recorded in `phase`
///   (`SERVICE_SUCCESS` when the attempt succeeded).
/// - `close_failure` never overwrites the phase outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    /// Furthest phase reached.
    pub phase: AuthPhase,
    /// Raw result code reported by the stack.
    pub code: i32,
    /// Diagnostic detail for a failed phase.
    pub detail: Option<String>,
    /// Session-release failure detail, when closing the session failed.
    pub close_failure: Option<String>,
}

impl AuthOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            phase: AuthPhase::Success,
            code: SERVICE_SUCCESS,
            detail: None,
            close_failure: None,
        }
    }

    /// Creates a failed outcome for the given phase.
    #[must_use]
    pub fn failed(phase: AuthPhase, error: ServiceError) -> Self {
        Self {
            phase,
            code: error.code,
            detail: Some(error.detail),
            close_failure: None,
        }
    }

    /// Returns true when every phase succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.phase == AuthPhase::Success
    }
}
