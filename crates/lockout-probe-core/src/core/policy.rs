// crates/lockout-probe-core/src/core/policy.rs
// ============================================================================
// Module: Service Policy Model
// Description: Ordered policy directives and their rendered file form.
// Purpose: Model the configuration consumed by the authentication stack.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A service policy is an ordered list of directives, each naming a phase, a
//! control qualifier, and a target module. Policies render to the plain-text
//! line format the authentication stack loads from its service-config root.
//! Column alignment in the rendered form is cosmetic; only the token order is
//! semantically required.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Service Name
// ============================================================================

/// Name of a policy configuration under the service-config root.
///
/// # Invariants
/// - Non-empty, no path separators, no parent-directory references.
/// - Exactly one persisted file maps to a name at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// # Errors
    /// Returns a [`ServiceNameError`] when the name is empty or would escape
    /// the service-config root.
    pub fn new(name: impl Into<String>) -> Result<Self, ServiceNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ServiceNameError::Empty);
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ServiceNameError::PathSeparator {
                name,
            });
        }
        if name == "." || name == ".." {
            return Err(ServiceNameError::ParentRef {
                name,
            });
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures for service names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceNameError {
    /// The name was empty.
    #[error("service name must not be empty")]
    Empty,
    /// The name contained a path separator.
    #[error("service name must not contain path separators: {name}")]
    PathSeparator {
        /// Offending name.
        name: String,
    },
    /// The name referenced the current or parent directory.
    #[error("service name must not reference parent directories: {name}")]
    ParentRef {
        /// Offending name.
        name: String,
    },
}

// ============================================================================
// SECTION: Directives
// ============================================================================

/// Phase of the authentication stack a directive applies to.
///
/// # Invariants
/// - Variants render to the stable phase tokens the stack parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServicePhase {
    /// Credential verification phase.
    Auth,
    /// Account-validity phase.
    Account,
    /// Credential update phase.
    Password,
    /// Session setup and teardown phase.
    Session,
}

impl ServicePhase {
    /// Returns the stable phase token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Account => "account",
            Self::Password => "password",
            Self::Session => "session",
        }
    }
}

/// Control qualifier deciding how a directive's result is combined.
///
/// # Invariants
/// - `DieOnFailure` renders in the bracketed `[default=die]` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlFlag {
    /// Failure is recorded but the stack keeps evaluating.
    Required,
    /// Success short-circuits the remaining directives.
    Sufficient,
    /// Failure terminates the stack immediately.
    DieOnFailure,
}

impl ControlFlag {
    /// Returns the stable control token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Sufficient => "sufficient",
            Self::DieOnFailure => "[default=die]",
        }
    }
}

/// One policy line: phase, control, module reference, and module arguments.
///
/// # Invariants
/// - `module` is passed through verbatim; the harness never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Phase the directive applies to.
    pub phase: ServicePhase,
    /// Control qualifier for the directive.
    pub control: ControlFlag,
    /// Module reference loaded by the stack.
    pub module: String,
    /// Arguments appended verbatim after the module reference.
    pub args: Vec<String>,
}

impl Directive {
    /// Creates a directive without module arguments.
    #[must_use]
    pub fn new(phase: ServicePhase, control: ControlFlag, module: impl Into<String>) -> Self {
        Self {
            phase,
            control,
            module: module.into(),
            args: Vec::new(),
        }
    }

    /// Creates a directive with module arguments.
    #[must_use]
    pub fn with_args(
        phase: ServicePhase,
        control: ControlFlag,
        module: impl Into<String>,
        args: &[&str],
    ) -> Self {
        Self {
            phase,
            control,
            module: module.into(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    /// Renders the directive as one policy line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut line = format!("{:<12}{:<45}{}", self.phase.as_str(), self.control.as_str(), self.module);
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

// ============================================================================
// SECTION: Service Policy
// ============================================================================

/// Ordered policy directives persisted under one service name.
///
/// # Invariants
/// - Directive order is preserved; the stack evaluates top to bottom.
/// - A policy must not outlive the scenario that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePolicy {
    /// Service name the policy is persisted under.
    pub service: ServiceName,
    /// Ordered directive lines.
    pub directives: Vec<Directive>,
}

impl ServicePolicy {
    /// Creates a policy for the given service name.
    #[must_use]
    pub const fn new(service: ServiceName, directives: Vec<Directive>) -> Self {
        Self {
            service,
            directives,
        }
    }

    /// Renders the policy to the exact byte content persisted on disk.
    #[must_use]
    pub fn render(&self) -> String {
        let mut content = String::new();
        for directive in &self.directives {
            content.push_str(&directive.render());
            content.push('\n');
        }
        content
    }
}
