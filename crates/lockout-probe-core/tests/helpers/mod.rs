// crates/lockout-probe-core/tests/helpers/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Fake lockout module and sandboxed harness fixtures.
// Purpose: Exercise the runner hermetically without a live PAM stack.
// Dependencies: lockout-probe-core, tempfile
// ============================================================================

//! ## Overview
//! The fake service reproduces the module under test's observable contract:
//! it loads the policy the fixture writer persisted, tallies rejected
//! attempts when the lockout directive is present, and bounces even correct
//! credentials once the threshold is crossed. Tests drive the real runner
//! against it inside temporary directories.

#![allow(dead_code, reason = "Helpers are shared across test binaries with different usage.")]
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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;

use lockout_probe_core::AuthService;
use lockout_probe_core::Credential;
use lockout_probe_core::FixtureWriter;
use lockout_probe_core::HarnessConfig;
use lockout_probe_core::PhaseResult;
use lockout_probe_core::Prompt;
use lockout_probe_core::ScenarioRunner;
use lockout_probe_core::ServiceError;
use lockout_probe_core::ServiceName;
use lockout_probe_core::Session;
use lockout_probe_core::TallyInspector;
use tempfile::TempDir;

// ============================================================================
// SECTION: Result Codes
// ============================================================================

/// Raw code the fake stack reports for a rejected credential or a lockout.
pub const AUTH_ERR: i32 = 7;
/// Raw code the fake stack reports when the policy file is missing.
pub const OPEN_ERR: i32 = 4;
/// Raw code the fake stack reports for a failed session release.
pub const CLOSE_ERR: i32 = 5;

// ============================================================================
// SECTION: Fake Service
// ============================================================================

/// In-process stand-in for the authentication stack plus lockout module.
pub struct FakeLockoutService {
    /// Service-config root the fake loads policies from.
    pub config_dir: PathBuf,
    /// State directory the fake keeps tally records in.
    pub tally_dir: PathBuf,
    /// Password the fake accepts.
    pub valid_password: String,
    /// Threshold after which even correct credentials bounce.
    pub free_tries: u32,
    /// When set, session release reports a failure.
    pub fail_close: bool,
}

impl FakeLockoutService {
    /// Creates a fake wired to the harness configuration's paths.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            config_dir: config.service_dir.clone(),
            tally_dir: config.tally_dir.clone(),
            valid_password: config.password.clone(),
            free_tries: config.free_tries,
            fail_close: false,
        }
    }
}

impl AuthService for FakeLockoutService {
    fn open(
        &self,
        service: &ServiceName,
        credential: &Credential,
    ) -> Result<Box<dyn Session>, ServiceError> {
        let policy_path = self.config_dir.join(service.as_str());
        let policy = fs::read_to_string(&policy_path).map_err(|err| {
            ServiceError::new(OPEN_ERR, format!("cannot load service {service}: {err}"))
        })?;
        Ok(Box::new(FakeSession {
            tally_dir: self.tally_dir.clone(),
            user: credential.username().to_string(),
            secret: credential.respond(Prompt::Secret),
            valid_password: self.valid_password.clone(),
            free_tries: self.free_tries,
            preauth: policy.contains("preauth"),
            authfail: policy.contains("authfail"),
            fail_close: self.fail_close,
        }))
    }
}

/// One fake session; mirrors the module's tally behavior on disk.
struct FakeSession {
    tally_dir: PathBuf,
    user: String,
    secret: Option<String>,
    valid_password: String,
    free_tries: u32,
    preauth: bool,
    authfail: bool,
    fail_close: bool,
}

impl FakeSession {
    fn count(&self) -> u32 {
        let path = self.tally_dir.join(&self.user);
        let Ok(content) = fs::read_to_string(path) else {
            return 0;
        };
        content
            .lines()
            .find_map(|line| line.strip_prefix("count = "))
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }

    fn record_failure(&self) {
        fs::create_dir_all(&self.tally_dir).expect("create tally dir");
        let path = self.tally_dir.join(&self.user);
        let next = self.count() + 1;
        fs::write(path, format!("[Fails]\ncount = {next}\n")).expect("write tally record");
    }
}

impl Session for FakeSession {
    fn authenticate(&mut self) -> PhaseResult {
        if self.preauth && self.count() >= self.free_tries {
            return Err(ServiceError::new(AUTH_ERR, "account locked"));
        }
        if self.secret.as_deref() == Some(self.valid_password.as_str()) {
            return Ok(());
        }
        if self.authfail {
            self.record_failure();
        }
        Err(ServiceError::new(AUTH_ERR, "credential rejected"))
    }

    fn check_account(&mut self) -> PhaseResult {
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), ServiceError> {
        if self.fail_close {
            return Err(ServiceError::new(CLOSE_ERR, "session release failed"));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Sandbox
// ============================================================================

/// Temporary-directory sandbox holding a complete harness wiring.
pub struct Sandbox {
    /// Root temp directory keeping the sandbox paths alive.
    pub root: TempDir,
    /// Configuration pointing into the sandbox.
    pub config: HarnessConfig,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    /// Creates a sandbox with a small lockout threshold for fast tests.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create sandbox");
        let service_dir = root.path().join("pam.d");
        fs::create_dir_all(&service_dir).expect("create service dir");
        let config = HarnessConfig {
            service_dir,
            tally_dir: root.path().join("tally"),
            module: "libpam_fake.so".to_string(),
            free_tries: 3,
            ..HarnessConfig::default()
        };
        Self {
            root,
            config,
        }
    }

    /// Builds a runner over a fake service wired to this sandbox.
    pub fn runner(&self) -> ScenarioRunner {
        self.runner_with(FakeLockoutService::from_config(&self.config))
    }

    /// Builds a runner over a custom fake service.
    pub fn runner_with(&self, service: FakeLockoutService) -> ScenarioRunner {
        ScenarioRunner::new(
            FixtureWriter::new(self.config.service_dir.clone()),
            TallyInspector::new(self.config.tally_dir.clone()),
            Box::new(service),
        )
    }

    /// Returns a validated service name from the configuration.
    pub fn service_name(&self) -> ServiceName {
        ServiceName::new(self.config.service_name.clone()).expect("valid service name")
    }
}
