// crates/lockout-probe-core/src/runtime/scenario.rs
// ============================================================================
// Module: Scenario Runner
// Description: Hermetic scenario execution with unconditional cleanup.
// Purpose: Compose fixture, driver, and inspector into repeatable test cases.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A scenario writes one service policy, drives the stack through zero or
//! more warmup attempts plus a final attempt, inspects the tally state, and
//! evaluates the declared expectation. Cleanup (policy removal and tally
//! sweep) runs on every exit path, including panic unwinds, so a failed
//! assertion in one scenario never leaks fixtures into the next. Cleanup
//! failure is folded into the report as a dirty-state warning rather than
//! aborting the suite.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::credentials::Credential;
use crate::core::outcome::AuthOutcome;
use crate::core::policy::ServiceName;
use crate::core::policy::ServicePolicy;
use crate::interfaces::AuthService;
use crate::runtime::driver::run_attempt;
use crate::runtime::fixture::FixtureWriter;
use crate::runtime::fixture::RemoveStatus;
use crate::runtime::tally::TallyError;
use crate::runtime::tally::TallyInspector;

// ============================================================================
// SECTION: Scenario Definition
// ============================================================================

/// Repeated failing attempts executed before the final attempt.
///
/// # Invariants
/// - Warmup attempts use the driver unchanged; each is a full single attempt.
#[derive(Debug)]
pub struct Warmup {
    /// Credential used for the warmup attempts.
    pub credential: Credential,
    /// Number of warmup attempts to drive.
    pub attempts: u32,
}

/// Declared expectation a scenario is checked against.
///
/// # Invariants
/// - `tally_present` refers to the state immediately after the final attempt,
///   before cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    /// Whether the final attempt must succeed.
    pub success: bool,
    /// Whether a tally record for the user must exist afterward.
    pub tally_present: bool,
    /// Minimum failure count the tally record must carry, when set.
    pub min_tally_count: Option<u32>,
}

/// One independent, repeatable test case.
///
/// # Invariants
/// - The policy is written at scenario start and removed at scenario end.
#[derive(Debug)]
pub struct Scenario {
    /// Human-readable scenario label.
    pub label: String,
    /// Policy the scenario materializes for the stack.
    pub policy: ServicePolicy,
    /// Optional failing attempts before the final one.
    pub warmup: Option<Warmup>,
    /// Credential for the final attempt.
    pub credential: Credential,
    /// Expectation the scenario is checked against.
    pub expect: Expectation,
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Verdict for one checked condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Condition label.
    pub label: String,
    /// Whether the condition held.
    pub passed: bool,
    /// Diagnostic detail when the condition failed.
    pub detail: Option<String>,
}

/// Outcome of one cleanup step.
///
/// # Invariants
/// - `Failed` leaves shared state dirty for subsequent scenarios; it is
///   reported, not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupStatus {
    /// The artifact existed and was removed.
    Removed,
    /// Nothing needed to be removed.
    AlreadyClean,
    /// Cleanup failed; shared state may be dirty.
    Failed {
        /// Failure detail.
        detail: String,
    },
}

impl CleanupStatus {
    /// Returns true unless cleanup failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Cleanup outcomes for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Policy-file removal outcome.
    pub policy: CleanupStatus,
    /// Tally-sweep outcome.
    pub tally: CleanupStatus,
}

impl CleanupReport {
    /// Returns true when both cleanup steps left a clean state.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.policy.is_clean() && self.tally.is_clean()
    }
}

/// Full result of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario label.
    pub label: String,
    /// Outcomes of the warmup attempts, in order.
    pub warmup_outcomes: Vec<AuthOutcome>,
    /// Outcome of the final attempt, when one was driven.
    pub outcome: Option<AuthOutcome>,
    /// Verdicts for the checked conditions.
    pub checks: Vec<CheckResult>,
    /// Cleanup outcomes.
    pub cleanup: CleanupReport,
}

impl ScenarioReport {
    /// Returns true when every checked condition held.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }
}

// ============================================================================
// SECTION: Scenario Runner
// ============================================================================

/// Serial executor owning the shared fixture paths and the stack binding.
///
/// # Invariants
/// - Scenarios run strictly one at a time; the runner is never shared across
///   threads.
pub struct ScenarioRunner {
    /// Writer for the service-config root.
    fixture: FixtureWriter,
    /// Inspector for the tally state directory.
    tally: TallyInspector,
    /// Authentication stack binding.
    service: Box<dyn AuthService>,
}

impl ScenarioRunner {
    /// Creates a runner from its collaborators.
    #[must_use]
    pub fn new(
        fixture: FixtureWriter,
        tally: TallyInspector,
        service: Box<dyn AuthService>,
    ) -> Self {
        Self {
            fixture,
            tally,
            service,
        }
    }

    /// Returns the fixture writer.
    #[must_use]
    pub const fn fixture(&self) -> &FixtureWriter {
        &self.fixture
    }

    /// Returns the tally inspector.
    #[must_use]
    pub const fn tally(&self) -> &TallyInspector {
        &self.tally
    }

    /// Runs one scenario to completion, cleaning up on every exit path.
    pub fn run(&self, scenario: &Scenario) -> ScenarioReport {
        if let Err(error) = self.fixture.write_policy(&scenario.policy) {
            let cleanup = self.cleanup(&scenario.policy.service);
            return ScenarioReport {
                label: scenario.label.clone(),
                warmup_outcomes: Vec::new(),
                outcome: None,
                checks: vec![CheckResult {
                    label: "write service policy".to_string(),
                    passed: false,
                    detail: Some(error.to_string()),
                }],
                cleanup,
            };
        }

        let mut guard = CleanupGuard {
            runner: self,
            service: &scenario.policy.service,
            armed: true,
        };

        let mut warmup_outcomes = Vec::new();
        if let Some(warmup) = &scenario.warmup {
            for _ in 0 .. warmup.attempts {
                warmup_outcomes.push(run_attempt(
                    self.service.as_ref(),
                    &scenario.policy.service,
                    &warmup.credential,
                ));
            }
        }

        let outcome =
            run_attempt(self.service.as_ref(), &scenario.policy.service, &scenario.credential);

        let user = scenario.credential.username();
        let tally_present = self.tally.record_exists(user);
        let tally_count = self.tally.read_count(user);
        let checks = evaluate(scenario, &outcome, tally_present, &tally_count);

        guard.armed = false;
        let cleanup = self.cleanup(&scenario.policy.service);

        ScenarioReport {
            label: scenario.label.clone(),
            warmup_outcomes,
            outcome: Some(outcome),
            checks,
            cleanup,
        }
    }

    /// Removes the scenario's policy and sweeps the tally directory.
    fn cleanup(&self, service: &ServiceName) -> CleanupReport {
        let policy = match self.fixture.remove_policy(service) {
            Ok(RemoveStatus::Removed) => CleanupStatus::Removed,
            Ok(RemoveStatus::AlreadyAbsent) => CleanupStatus::AlreadyClean,
            Err(error) => CleanupStatus::Failed {
                detail: error.to_string(),
            },
        };
        let tally = match self.tally.clear() {
            Ok(report) if !report.is_clean() => CleanupStatus::Failed {
                detail: report
                    .failures
                    .iter()
                    .map(|failure| format!("{}: {}", failure.path, failure.detail))
                    .collect::<Vec<_>>()
                    .join("; "),
            },
            Ok(report) if report.removed > 0 => CleanupStatus::Removed,
            Ok(_) => CleanupStatus::AlreadyClean,
            Err(error) => CleanupStatus::Failed {
                detail: error.to_string(),
            },
        };
        CleanupReport {
            policy,
            tally,
        }
    }
}

// ============================================================================
// SECTION: Cleanup Guard
// ============================================================================

/// Scoped guard releasing shared fixture state on unwind paths.
///
/// # Invariants
/// - Disarmed before the regular cleanup so release never runs twice.
struct CleanupGuard<'run> {
    /// Runner owning the shared paths.
    runner: &'run ScenarioRunner,
    /// Service name whose policy must be removed.
    service: &'run ServiceName,
    /// Whether the guard still owns the cleanup obligation.
    armed: bool,
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.runner.fixture.remove_policy(self.service);
            let _ = self.runner.tally.clear();
        }
    }
}

// ============================================================================
// SECTION: Expectation Evaluation
// ============================================================================

/// Evaluates the declared expectation against the observed state.
fn evaluate(
    scenario: &Scenario,
    outcome: &AuthOutcome,
    tally_present: bool,
    tally_count: &Result<Option<u32>, TallyError>,
) -> Vec<CheckResult> {
    let expect = &scenario.expect;
    let mut checks = Vec::new();

    let outcome_passed = outcome.is_success() == expect.success;
    checks.push(CheckResult {
        label: "authentication outcome".to_string(),
        passed: outcome_passed,
        detail: (!outcome_passed).then(|| {
            let wanted = if expect.success { "success" } else { "rejection" };
            format!("expected {wanted}, observed {} (code {})", outcome.phase.as_str(), outcome.code)
        }),
    });

    let tally_passed = tally_present == expect.tally_present;
    checks.push(CheckResult {
        label: "tally record".to_string(),
        passed: tally_passed,
        detail: (!tally_passed).then(|| {
            let wanted = if expect.tally_present { "present" } else { "absent" };
            let observed = if tally_present { "present" } else { "absent" };
            format!("expected record {wanted}, observed {observed}")
        }),
    });

    if let Some(min) = expect.min_tally_count {
        let (passed, detail) = match tally_count {
            Ok(Some(count)) if *count >= min => (true, None),
            Ok(Some(count)) => (false, Some(format!("expected count >= {min}, observed {count}"))),
            Ok(None) => (false, Some(format!("expected count >= {min}, observed no record"))),
            Err(error) => (false, Some(error.to_string())),
        };
        checks.push(CheckResult {
            label: "tally count".to_string(),
            passed,
            detail,
        });
    }

    checks
}
