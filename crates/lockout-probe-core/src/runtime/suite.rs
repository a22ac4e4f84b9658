// crates/lockout-probe-core/src/runtime/suite.rs
// ============================================================================
// Module: Built-In Suite
// Description: Standard lockout scenarios and whole-suite execution.
// Purpose: Exercise the module under test's observable tally contract.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The built-in suite covers the module under test's externally observable
//! contract: a clean pass without a lockout directive, tally creation on a
//! rejected attempt, count growth across consecutive rejections, and the
//! bounce case where correct credentials are still rejected once the
//! threshold has been crossed. Scenarios are parameterized by the harness
//! configuration and run strictly in order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::credentials::Credential;
use crate::core::policy::ControlFlag;
use crate::core::policy::Directive;
use crate::core::policy::ServiceName;
use crate::core::policy::ServiceNameError;
use crate::core::policy::ServicePhase;
use crate::core::policy::ServicePolicy;
use crate::runtime::config::HarnessConfig;
use crate::runtime::report::Reporter;
use crate::runtime::scenario::Expectation;
use crate::runtime::scenario::Scenario;
use crate::runtime::scenario::ScenarioReport;
use crate::runtime::scenario::ScenarioRunner;
use crate::runtime::scenario::Warmup;

// ============================================================================
// SECTION: Suite Report
// ============================================================================

/// Aggregated result of one suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Timestamp supplied by the host, when available.
    pub generated_at: Option<String>,
    /// Scenario reports in execution order.
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Returns true when every scenario passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioReport::passed)
    }

    /// Returns the number of failed scenarios.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenarios.iter().filter(|report| !report.passed()).count()
    }
}

// ============================================================================
// SECTION: Built-In Scenarios
// ============================================================================

/// Builds the standard scenario list from the harness configuration.
///
/// # Errors
/// Returns a [`ServiceNameError`] when the configured service name is not a
/// valid configuration name.
pub fn builtin_scenarios(config: &HarnessConfig) -> Result<Vec<Scenario>, ServiceNameError> {
    let service = ServiceName::new(config.service_name.clone())?;
    Ok(vec![
        valid_auth(config, service.clone()),
        invalid_auth(config, service.clone()),
        consecutive_invalid(config, service.clone()),
        bounce_auth(config, service),
    ])
}

/// Policy without a lockout directive; correct credentials must pass cleanly.
fn valid_auth(config: &HarnessConfig, service: ServiceName) -> Scenario {
    Scenario {
        label: "valid-auth".to_string(),
        policy: ServicePolicy::new(service, vec![
            Directive::with_args(ServicePhase::Auth, ControlFlag::Required, config.module.as_str(), &[
                "preauth",
            ]),
            Directive::new(ServicePhase::Account, ControlFlag::Required, config.module.as_str()),
        ]),
        warmup: None,
        credential: Credential::fixed(&config.user, &config.password),
        expect: Expectation {
            success: true,
            tally_present: false,
            min_tally_count: None,
        },
    }
}

/// Lockout-enabled policy; a rejected attempt must leave a tally record.
fn invalid_auth(config: &HarnessConfig, service: ServiceName) -> Scenario {
    Scenario {
        label: "invalid-auth".to_string(),
        policy: lockout_policy(config, service),
        warmup: None,
        credential: Credential::fixed(&config.user, &config.wrong_password),
        expect: Expectation {
            success: false,
            tally_present: true,
            min_tally_count: None,
        },
    }
}

/// Consecutive rejections must grow the persisted failure count.
fn consecutive_invalid(config: &HarnessConfig, service: ServiceName) -> Scenario {
    Scenario {
        label: "consecutive-invalid".to_string(),
        policy: lockout_policy(config, service),
        warmup: Some(Warmup {
            credential: Credential::fixed(&config.user, &config.wrong_password),
            attempts: 1,
        }),
        credential: Credential::fixed(&config.user, &config.wrong_password),
        expect: Expectation {
            success: false,
            tally_present: true,
            min_tally_count: Some(2),
        },
    }
}

/// Crossing the threshold must reject even correct credentials.
fn bounce_auth(config: &HarnessConfig, service: ServiceName) -> Scenario {
    Scenario {
        label: "bounce-auth".to_string(),
        policy: lockout_policy(config, service),
        warmup: Some(Warmup {
            credential: Credential::fixed(&config.user, &config.wrong_password),
            attempts: config.free_tries,
        }),
        credential: Credential::fixed(&config.user, &config.password),
        expect: Expectation {
            success: false,
            tally_present: true,
            min_tally_count: None,
        },
    }
}

/// Policy wiring the module's preauth, lockout-on-failure, and account hooks.
fn lockout_policy(config: &HarnessConfig, service: ServiceName) -> ServicePolicy {
    ServicePolicy::new(service, vec![
        Directive::with_args(ServicePhase::Auth, ControlFlag::Required, config.module.as_str(), &[
            "preauth",
        ]),
        Directive::with_args(ServicePhase::Auth, ControlFlag::DieOnFailure, config.module.as_str(), &[
            "authfail",
        ]),
        Directive::new(ServicePhase::Account, ControlFlag::Required, config.module.as_str()),
    ])
}

// ============================================================================
// SECTION: Suite Execution
// ============================================================================

/// Runs scenarios strictly in order, reporting each as it completes.
pub fn run_suite(
    runner: &ScenarioRunner,
    scenarios: &[Scenario],
    reporter: &dyn Reporter,
) -> SuiteReport {
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        reporter.scenario_started(scenario);
        let report = runner.run(scenario);
        reporter.scenario_finished(&report);
        reports.push(report);
    }
    let suite = SuiteReport {
        generated_at: None,
        scenarios: reports,
    };
    reporter.suite_finished(&suite);
    suite
}
