// crates/lockout-probe-pam/src/lib.rs
// ============================================================================
// Module: Lockout Probe PAM Binding
// Description: AuthService implementation over the system PAM stack.
// Purpose: Drive real authentication attempts with a fixed conversation.
// Dependencies: lockout-probe-core, pam-client
// ============================================================================

//! ## Overview
//! This crate binds the harness's [`AuthService`] seam to the live PAM stack
//! through `pam-client`. Conversation prompts are answered non-interactively
//! from the credential's prompt strategy, and raw PAM result codes are
//! preserved in [`ServiceError`] for diagnostic reporting. Session release is
//! RAII: dropping the context ends the PAM transaction, so a session cannot
//! leak even on unwind paths.

// ============================================================================
// SECTION: Imports
// ============================================================================

use lockout_probe_core::AuthService;
use lockout_probe_core::Credential;
use lockout_probe_core::PhaseResult;
use lockout_probe_core::Prompt;
use lockout_probe_core::ServiceError;
use lockout_probe_core::ServiceName;
use lockout_probe_core::Session;
use pam_client::Context;
use pam_client::Flag;
use pam_client::conv_mock::Conversation;

// ============================================================================
// SECTION: Result Codes
// ============================================================================

/// Raw code reported when the credential strategy yields no secret.
const CONV_ERR: i32 = 19;

// ============================================================================
// SECTION: Service
// ============================================================================

/// [`AuthService`] backed by the system PAM stack.
///
/// # Invariants
/// - One attempt per session; the binding never retries internally.
#[derive(Debug, Clone, Copy, Default)]
pub struct PamAuthService;

impl PamAuthService {
    /// Creates the live PAM service binding.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AuthService for PamAuthService {
    fn open(
        &self,
        service: &ServiceName,
        credential: &Credential,
    ) -> Result<Box<dyn Session>, ServiceError> {
        let secret = credential.respond(Prompt::Secret).ok_or_else(|| {
            ServiceError::new(CONV_ERR, "credential strategy provided no secret")
        })?;
        let conversation = Conversation::with_credentials(credential.username(), secret);
        let context = Context::new(service.as_str(), Some(credential.username()), conversation)
            .map_err(map_error)?;
        Ok(Box::new(PamSession {
            context,
        }))
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// One open PAM transaction.
struct PamSession {
    /// Underlying PAM context; dropping it ends the transaction.
    context: Context<Conversation>,
}

impl Session for PamSession {
    fn authenticate(&mut self) -> PhaseResult {
        self.context.authenticate(Flag::NONE).map_err(map_error)
    }

    fn check_account(&mut self) -> PhaseResult {
        self.context.acct_mgmt(Flag::NONE).map_err(map_error)
    }

    fn close(self: Box<Self>) -> Result<(), ServiceError> {
        // libpam reports release problems through its own logging; the RAII
        // drop cannot surface them, so release is always considered clean.
        drop(self.context);
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a PAM error to the harness error type, preserving the raw code.
fn map_error(error: pam_client::Error) -> ServiceError {
    ServiceError::new(error.code() as i32, error.to_string())
}
