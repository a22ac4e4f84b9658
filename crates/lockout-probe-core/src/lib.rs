// crates/lockout-probe-core/src/lib.rs
// ============================================================================
// Module: Lockout Probe Core
// Description: Policy fixtures, tally inspection, and scenario orchestration.
// Purpose: Drive an external lockout PAM module and verify its tally contract.
// Dependencies: serde, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate contains the portable core of the lockout-probe harness: the
//! service policy model, the fixture writer that materializes policies for
//! the authentication stack, the tally inspector that observes the module
//! under test's persisted counters, the single-attempt authentication driver,
//! and the scenario runner that composes them into hermetic test cases.
//! The crate never links against libpam; live bindings implement the
//! [`AuthService`] seam in a separate crate.
//! Invariants:
//! - Scenarios execute strictly serially and clean up on every exit path.
//! - The harness only observes and deletes tally records, never writes them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::credentials::Credential;
pub use crate::core::credentials::FixedResponder;
pub use crate::core::credentials::Prompt;
pub use crate::core::credentials::PromptResponder;
pub use crate::core::outcome::AuthOutcome;
pub use crate::core::outcome::AuthPhase;
pub use crate::core::policy::ControlFlag;
pub use crate::core::policy::Directive;
pub use crate::core::policy::ServiceName;
pub use crate::core::policy::ServiceNameError;
pub use crate::core::policy::ServicePhase;
pub use crate::core::policy::ServicePolicy;
pub use crate::interfaces::AuthService;
pub use crate::interfaces::PhaseResult;
pub use crate::interfaces::SERVICE_SUCCESS;
pub use crate::interfaces::ServiceError;
pub use crate::interfaces::Session;
pub use crate::runtime::config::ConfigError;
pub use crate::runtime::config::HarnessConfig;
pub use crate::runtime::driver::run_attempt;
pub use crate::runtime::fixture::FixtureError;
pub use crate::runtime::fixture::FixtureWriter;
pub use crate::runtime::fixture::MAX_SERVICE_PATH_BYTES;
pub use crate::runtime::fixture::RemoveStatus;
pub use crate::runtime::report::NoopReporter;
pub use crate::runtime::report::Reporter;
pub use crate::runtime::scenario::CheckResult;
pub use crate::runtime::scenario::CleanupReport;
pub use crate::runtime::scenario::CleanupStatus;
pub use crate::runtime::scenario::Expectation;
pub use crate::runtime::scenario::Scenario;
pub use crate::runtime::scenario::ScenarioReport;
pub use crate::runtime::scenario::ScenarioRunner;
pub use crate::runtime::scenario::Warmup;
pub use crate::runtime::suite::SuiteReport;
pub use crate::runtime::suite::builtin_scenarios;
pub use crate::runtime::suite::run_suite;
pub use crate::runtime::tally::SweepFailure;
pub use crate::runtime::tally::SweepReport;
pub use crate::runtime::tally::TallyError;
pub use crate::runtime::tally::TallyInspector;
