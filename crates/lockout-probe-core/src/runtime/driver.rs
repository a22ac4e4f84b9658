// crates/lockout-probe-core/src/runtime/driver.rs
// ============================================================================
// Module: Authentication Driver
// Description: Drives one attempt through the authentication stack.
// Purpose: Walk open, authenticate, account-check, close with gated phases.
// Dependencies: none beyond crate interfaces
// ============================================================================

//! ## Overview
//! The driver performs exactly one authentication attempt per call: open a
//! session, submit credentials, evaluate account validity, close. Each phase
//! runs only when the previous one succeeded; closing runs on every path.
//! The driver never retries internally — retry counting is precisely the
//! behavior under test and must stay externally observable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::credentials::Credential;
use crate::core::outcome::AuthOutcome;
use crate::core::outcome::AuthPhase;
use crate::core::policy::ServiceName;
use crate::interfaces::AuthService;

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Runs one attempt through the stack for a service policy and credential.
///
/// Close failure is recorded in the outcome's `close_failure` field and never
/// overwrites the phase outcome determined by the gated sequence.
#[must_use]
pub fn run_attempt(
    service: &dyn AuthService,
    name: &ServiceName,
    credential: &Credential,
) -> AuthOutcome {
    let mut session = match service.open(name, credential) {
        Ok(session) => session,
        Err(error) => return AuthOutcome::failed(AuthPhase::OpenFailed, error),
    };

    let mut outcome = match session.authenticate() {
        Ok(()) => match session.check_account() {
            Ok(()) => AuthOutcome::success(),
            Err(error) => AuthOutcome::failed(AuthPhase::AcctCheckFailed, error),
        },
        Err(error) => AuthOutcome::failed(AuthPhase::AuthFailed, error),
    };

    if let Err(error) = session.close() {
        outcome.close_failure = Some(error.to_string());
    }
    outcome
}
