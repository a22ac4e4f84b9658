// crates/lockout-probe-core/src/core/credentials.rs
// ============================================================================
// Module: Credentials
// Description: User identity plus an injectable conversation strategy.
// Purpose: Supply non-interactive prompt answers to the authentication stack.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The authentication stack asks for credentials through a conversation
//! callback. The harness answers those prompts with a fixed, non-interactive
//! strategy; the [`PromptResponder`] trait keeps the strategy swappable for
//! an interactive implementation without touching the driver.

// ============================================================================
// SECTION: Prompts
// ============================================================================

/// Kind of conversation prompt issued by the authentication stack.
///
/// # Invariants
/// - `Secret` prompts must never be echoed by responder implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Echo-on prompt, typically the login name.
    Visible,
    /// Echo-off prompt, typically the password.
    Secret,
}

/// Strategy answering conversation prompts.
pub trait PromptResponder {
    /// Returns the answer for a prompt, or `None` when no answer exists.
    fn respond(&self, prompt: Prompt) -> Option<String>;
}

// ============================================================================
// SECTION: Fixed Responder
// ============================================================================

/// Non-interactive responder returning pre-set answers.
///
/// # Invariants
/// - Answers are fixed at construction and never change between prompts.
#[derive(Debug, Clone)]
pub struct FixedResponder {
    /// Answer for echo-on prompts.
    visible: String,
    /// Answer for echo-off prompts.
    secret: String,
}

impl FixedResponder {
    /// Creates a responder with fixed visible and secret answers.
    #[must_use]
    pub fn new(visible: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            visible: visible.into(),
            secret: secret.into(),
        }
    }
}

impl PromptResponder for FixedResponder {
    fn respond(&self, prompt: Prompt) -> Option<String> {
        match prompt {
            Prompt::Visible => Some(self.visible.clone()),
            Prompt::Secret => Some(self.secret.clone()),
        }
    }
}

// ============================================================================
// SECTION: Credential
// ============================================================================

/// User identity paired with a prompt-answering strategy.
///
/// # Invariants
/// - `username` is the identity tally records are keyed by.
pub struct Credential {
    /// User identity submitted to the authentication stack.
    username: String,
    /// Strategy answering conversation prompts for this identity.
    responder: Box<dyn PromptResponder>,
}

impl Credential {
    /// Creates a credential with a custom responder strategy.
    #[must_use]
    pub fn new(username: impl Into<String>, responder: Box<dyn PromptResponder>) -> Self {
        Self {
            username: username.into(),
            responder,
        }
    }

    /// Creates a credential with fixed username and secret answers.
    #[must_use]
    pub fn fixed(username: impl Into<String>, secret: impl Into<String>) -> Self {
        let username = username.into();
        let responder = FixedResponder::new(username.clone(), secret);
        Self {
            username,
            responder: Box::new(responder),
        }
    }

    /// Returns the user identity.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Answers a conversation prompt via the configured strategy.
    #[must_use]
    pub fn respond(&self, prompt: Prompt) -> Option<String> {
        self.responder.respond(prompt)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("username", &self.username).finish_non_exhaustive()
    }
}
