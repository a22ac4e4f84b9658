// crates/lockout-probe-core/src/runtime/mod.rs
// ============================================================================
// Module: Harness Runtime
// Description: Fixture writing, tally inspection, driving, and scenarios.
// Purpose: Compose the core model into hermetic, repeatable test cases.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The runtime owns everything with side effects: the fixture writer that
//! materializes policies, the tally inspector that observes and resets the
//! module under test's counters, the single-attempt driver, and the scenario
//! runner with unconditional cleanup. Components own their fixed paths and
//! are passed explicitly; there is no process-wide state.

pub mod config;
pub mod driver;
pub mod fixture;
pub mod report;
pub mod scenario;
pub mod suite;
pub mod tally;
