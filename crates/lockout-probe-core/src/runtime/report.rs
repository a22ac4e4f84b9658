// crates/lockout-probe-core/src/runtime/report.rs
// ============================================================================
// Module: Reporting Sink
// Description: Observer interface for scenario and suite progress.
// Purpose: Keep output concerns out of the runner without hard deps.
// Dependencies: none beyond crate runtime types
// ============================================================================

//! ## Overview
//! The runner emits progress through a thin sink trait so hosts can plug in
//! console output, structured capture, or nothing at all without the core
//! growing an output dependency.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::runtime::scenario::Scenario;
use crate::runtime::scenario::ScenarioReport;
use crate::runtime::suite::SuiteReport;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for scenario and suite progress events.
pub trait Reporter {
    /// Called before a scenario starts executing.
    fn scenario_started(&self, scenario: &Scenario);
    /// Called after a scenario finished, cleanup included.
    fn scenario_finished(&self, report: &ScenarioReport);
    /// Called once after every scenario has run.
    fn suite_finished(&self, report: &SuiteReport);
}

/// No-op sink.
///
/// # Invariants
/// - Events are intentionally discarded.
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn scenario_started(&self, _scenario: &Scenario) {}

    fn scenario_finished(&self, _report: &ScenarioReport) {}

    fn suite_finished(&self, _report: &SuiteReport) {}
}
