// crates/lockout-probe-core/src/interfaces/mod.rs
// ============================================================================
// Module: Authentication Service Interfaces
// Description: Trait seam between the harness and the authentication stack.
// Purpose: Keep the stack swappable between a live binding and test doubles.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The authentication stack is consumed as a black box: open a session,
//! authenticate, evaluate account validity, close. These traits are the only
//! seam the driver and scenario runner see; the live PAM binding and the
//! hermetic test doubles both implement them. Raw stack result codes travel
//! through [`ServiceError`] untouched so reports can show exactly what the
//! stack returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::credentials::Credential;
use crate::core::policy::ServiceName;

// ============================================================================
// SECTION: Result Codes
// ============================================================================

/// Raw result code reported by the stack for a successful phase.
pub const SERVICE_SUCCESS: i32 = 0;

/// Failure reported by the authentication stack for one phase.
///
/// # Invariants
/// - `code` is the stack's raw result code, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail} (code {code})")]
pub struct ServiceError {
    /// Raw result code from the stack.
    pub code: i32,
    /// Human-readable failure detail.
    pub detail: String,
}

impl ServiceError {
    /// Creates a service error from a raw code and detail text.
    #[must_use]
    pub fn new(code: i32, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

/// Result of one phase call into the stack.
pub type PhaseResult = Result<(), ServiceError>;

// ============================================================================
// SECTION: Session
// ============================================================================

/// One open interaction with the authentication stack.
///
/// # Invariants
/// - Exactly one session is open at a time in this harness.
/// - Every session must be closed on every exit path; close failure is a
///   reportable defect, never a fatal one.
pub trait Session {
    /// Submits credentials for verification.
    fn authenticate(&mut self) -> PhaseResult;

    /// Evaluates whether the account may be used at this time.
    fn check_account(&mut self) -> PhaseResult;

    /// Closes the session, releasing underlying resources.
    ///
    /// # Errors
    /// Returns a [`ServiceError`] when releasing the session failed.
    fn close(self: Box<Self>) -> Result<(), ServiceError>;
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Factory opening sessions against the authentication stack.
pub trait AuthService {
    /// Opens a session bound to a service policy and a credential.
    ///
    /// # Errors
    /// Returns a [`ServiceError`] when the session could not be opened.
    fn open(
        &self,
        service: &ServiceName,
        credential: &Credential,
    ) -> Result<Box<dyn Session>, ServiceError>;
}
