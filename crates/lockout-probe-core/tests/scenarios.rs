// crates/lockout-probe-core/tests/scenarios.rs
// ============================================================================
// Module: Scenario Runner Tests
// Description: Runs the built-in suite hermetically against the fake module.
// ============================================================================
//! ## Overview
//! Drives the real runner and built-in scenarios against the fake lockout
//! module inside temporary directories, verifying verdicts, hermetic cleanup
//! on success and failure paths, and the fixture round-trip (directives take
//! effect only when present).

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod helpers;

use std::fs;

use helpers::Sandbox;
use lockout_probe_core::AuthPhase;
use lockout_probe_core::CleanupStatus;
use lockout_probe_core::Credential;
use lockout_probe_core::Expectation;
use lockout_probe_core::NoopReporter;
use lockout_probe_core::Scenario;
use lockout_probe_core::ServicePolicy;
use lockout_probe_core::builtin_scenarios;
use lockout_probe_core::run_suite;

#[test]
fn builtin_suite_passes_against_conforming_module() {
    let sandbox = Sandbox::new();
    let runner = sandbox.runner();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    let suite = run_suite(&runner, &scenarios, &NoopReporter);

    for report in &suite.scenarios {
        assert!(report.passed(), "{}: {:?}", report.label, report.checks);
        assert!(report.cleanup.is_clean(), "{}: {:?}", report.label, report.cleanup);
    }
    assert!(suite.passed());
    assert_eq!(suite.failed_count(), 0);
}

#[test]
fn suite_leaves_no_fixture_or_tally_state_behind() {
    let sandbox = Sandbox::new();
    let runner = sandbox.runner();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    let _ = run_suite(&runner, &scenarios, &NoopReporter);

    let policy_path = sandbox.config.service_dir.join(&sandbox.config.service_name);
    assert!(!policy_path.exists());
    let tally_entries = fs::read_dir(&sandbox.config.tally_dir)
        .map(|entries| entries.count())
        .unwrap_or_default();
    assert_eq!(tally_entries, 0);
}

#[test]
fn valid_auth_succeeds_and_leaves_no_tally() {
    let sandbox = Sandbox::new();
    let runner = sandbox.runner();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    let report = runner.run(&scenarios[0]);

    assert_eq!(report.label, "valid-auth");
    assert!(report.passed(), "{:?}", report.checks);
    let outcome = report.outcome.unwrap();
    assert_eq!(outcome.phase, AuthPhase::Success);
}

#[test]
fn invalid_auth_is_rejected_and_records_a_tally() {
    let sandbox = Sandbox::new();
    let runner = sandbox.runner();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    let report = runner.run(&scenarios[1]);

    assert_eq!(report.label, "invalid-auth");
    assert!(report.passed(), "{:?}", report.checks);
    assert!(!report.outcome.unwrap().is_success());
    // Cleanup swept the record the module created during the scenario.
    assert_eq!(report.cleanup.tally, CleanupStatus::Removed);
}

#[test]
fn consecutive_failures_grow_the_recorded_count() {
    let sandbox = Sandbox::new();
    let runner = sandbox.runner();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    let report = runner.run(&scenarios[2]);

    assert_eq!(report.label, "consecutive-invalid");
    assert!(report.passed(), "{:?}", report.checks);
    assert_eq!(report.warmup_outcomes.len(), 1);
}

#[test]
fn bounce_rejects_correct_credentials_after_threshold() {
    let sandbox = Sandbox::new();
    let runner = sandbox.runner();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    let report = runner.run(&scenarios[3]);

    assert_eq!(report.label, "bounce-auth");
    assert!(report.passed(), "{:?}", report.checks);
    let warmups = report.warmup_outcomes.len();
    assert_eq!(warmups, usize::try_from(sandbox.config.free_tries).unwrap());
    assert!(!report.outcome.unwrap().is_success());
}

#[test]
fn failed_assertion_still_cleans_up() {
    let sandbox = Sandbox::new();
    let runner = sandbox.runner();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    // Flip the valid-auth expectation so the scenario fails its checks.
    let scenario = Scenario {
        label: "deliberate-mismatch".to_string(),
        policy: scenarios[0].policy.clone(),
        warmup: None,
        credential: Credential::fixed(&sandbox.config.user, &sandbox.config.password),
        expect: Expectation {
            success: false,
            tally_present: true,
            min_tally_count: None,
        },
    };

    let report = runner.run(&scenario);

    assert!(!report.passed());
    assert!(report.cleanup.is_clean());
    let policy_path = sandbox.config.service_dir.join(&sandbox.config.service_name);
    assert!(!policy_path.exists());
}

#[test]
fn lockout_directive_only_takes_effect_when_present() {
    let sandbox = Sandbox::new();
    let runner = sandbox.runner();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    // Same wrong credential, but the valid-auth policy has no authfail hook:
    // the attempt is rejected without creating a tally record.
    let scenario = Scenario {
        label: "wrong-password-no-lockout".to_string(),
        policy: scenarios[0].policy.clone(),
        warmup: None,
        credential: Credential::fixed(&sandbox.config.user, &sandbox.config.wrong_password),
        expect: Expectation {
            success: false,
            tally_present: false,
            min_tally_count: None,
        },
    };

    let report = runner.run(&scenario);
    assert!(report.passed(), "{:?}", report.checks);
}

#[test]
fn unwritable_fixture_root_fails_the_scenario_gracefully() {
    let sandbox = Sandbox::new();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    let missing_root = sandbox.config.service_dir.join("missing");
    let broken = lockout_probe_core::ScenarioRunner::new(
        lockout_probe_core::FixtureWriter::new(missing_root),
        lockout_probe_core::TallyInspector::new(sandbox.config.tally_dir.clone()),
        Box::new(helpers::FakeLockoutService::from_config(&sandbox.config)),
    );

    let report = broken.run(&scenarios[0]);

    assert!(!report.passed());
    assert!(report.outcome.is_none());
    assert_eq!(report.checks.len(), 1);
    assert_eq!(report.checks[0].label, "write service policy");
}

#[test]
fn scenario_policies_render_distinct_fixtures() {
    let sandbox = Sandbox::new();
    let scenarios = builtin_scenarios(&sandbox.config).unwrap();

    let renders: Vec<String> =
        scenarios.iter().map(|scenario| ServicePolicy::render(&scenario.policy)).collect();
    assert!(!renders[0].contains("authfail"));
    assert!(renders[1].contains("authfail"));
    assert!(renders[3].contains("authfail"));
}
