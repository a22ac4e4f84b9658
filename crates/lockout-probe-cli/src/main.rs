// crates/lockout-probe-cli/src/main.rs
// ============================================================================
// Module: Lockout Probe CLI Entry Point
// Description: Command dispatcher for suite runs and state resets.
// Purpose: Run the harness against the live stack with CI-friendly output.
// Dependencies: clap, colored, lockout-probe-core, lockout-probe-pam,
// serde_json, thiserror, time, toml
// ============================================================================

//! ## Overview
//! The CLI wires the core runner to the live PAM binding, prints one colored
//! pass/fail line per checked condition, optionally writes a structured JSON
//! report, and exits non-zero when any scenario failed so CI can gate on it.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use colored::Colorize;
use lockout_probe_core::FixtureWriter;
use lockout_probe_core::HarnessConfig;
use lockout_probe_core::RemoveStatus;
use lockout_probe_core::Reporter;
use lockout_probe_core::Scenario;
use lockout_probe_core::ScenarioReport;
use lockout_probe_core::ScenarioRunner;
use lockout_probe_core::SuiteReport;
use lockout_probe_core::TallyInspector;
use lockout_probe_core::builtin_scenarios;
use lockout_probe_core::run_suite;
use lockout_probe_pam::PamAuthService;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "lockout-probe", version, about = "Lockout module test harness")]
struct Cli {
    /// Path to the harness configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the built-in scenario suite against the live stack.
    Run(RunCommand),
    /// Reset persisted tally state.
    Reset(ResetCommand),
    /// Configuration utilities.
    Config {
        /// Selected configuration subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `run` command.
#[derive(clap::Args, Debug)]
struct RunCommand {
    /// Only run scenarios whose label matches one of these values.
    #[arg(long = "scenario", value_name = "LABEL")]
    scenarios: Vec<String>,
    /// Write a structured JSON report to this path.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
}

/// Arguments for the `reset` command.
#[derive(clap::Args, Debug)]
struct ResetCommand {
    /// Reset only this user's tally record instead of sweeping the directory.
    #[arg(long, value_name = "USER")]
    user: Option<String>,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a rendered message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a rendered message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = HarnessConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;

    match cli.command {
        Commands::Run(command) => command_run(&config, &command),
        Commands::Reset(command) => command_reset(&config, &command),
        Commands::Config {
            command,
        } => command_config(&config, &command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(config: &HarnessConfig, command: &RunCommand) -> CliResult<ExitCode> {
    let scenarios = builtin_scenarios(config).map_err(|err| CliError::new(err.to_string()))?;
    let selected = select_scenarios(scenarios, &command.scenarios)?;

    let runner = ScenarioRunner::new(
        FixtureWriter::new(config.service_dir.clone()),
        TallyInspector::new(config.tally_dir.clone()),
        Box::new(PamAuthService::new()),
    );

    let mut suite = run_suite(&runner, &selected, &ConsoleReporter);
    suite.generated_at = OffsetDateTime::now_utc().format(&Rfc3339).ok();

    if let Some(path) = &command.json {
        let body = serde_json::to_string_pretty(&suite)
            .map_err(|err| CliError::new(format!("failed to encode report: {err}")))?;
        fs::write(path, body).map_err(|err| {
            CliError::new(format!("failed to write report {}: {err}", path.display()))
        })?;
    }

    Ok(exit_code_for(&suite))
}

/// Keeps only the scenarios named by the filters, preserving suite order.
fn select_scenarios(scenarios: Vec<Scenario>, filters: &[String]) -> CliResult<Vec<Scenario>> {
    if filters.is_empty() {
        return Ok(scenarios);
    }
    for filter in filters {
        if !scenarios.iter().any(|scenario| scenario.label == *filter) {
            return Err(CliError::new(format!("unknown scenario: {filter}")));
        }
    }
    Ok(scenarios.into_iter().filter(|scenario| filters.contains(&scenario.label)).collect())
}

/// Maps a suite verdict to the process exit code.
fn exit_code_for(suite: &SuiteReport) -> ExitCode {
    if suite.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

// ============================================================================
// SECTION: Reset Command
// ============================================================================

/// Executes the `reset` command.
fn command_reset(config: &HarnessConfig, command: &ResetCommand) -> CliResult<ExitCode> {
    let tally = TallyInspector::new(config.tally_dir.clone());
    match &command.user {
        Some(user) => {
            let status =
                tally.remove_record(user).map_err(|err| CliError::new(err.to_string()))?;
            let message = match status {
                RemoveStatus::Removed => format!("tally reset for user: {user}"),
                RemoveStatus::AlreadyAbsent => format!("no tally found for user: {user}"),
            };
            write_stdout_line(&message);
        }
        None => {
            let report = tally.clear().map_err(|err| CliError::new(err.to_string()))?;
            write_stdout_line(&format!("removed {} tally record(s)", report.removed));
            if !report.is_clean() {
                for failure in &report.failures {
                    write_stderr_line(&format!(
                        "{} {}: {}",
                        "Warning:".yellow(),
                        failure.path,
                        failure.detail
                    ));
                }
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes the `config` command.
fn command_config(config: &HarnessConfig, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Show => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|err| CliError::new(format!("failed to render config: {err}")))?;
            write_stdout_line(rendered.trim_end());
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Console Reporter
// ============================================================================

/// Reporter printing one colored line per checked condition.
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn scenario_started(&self, scenario: &Scenario) {
        write_stdout_line("------");
        write_stdout_line(&format!("{}:", scenario.label));
    }

    fn scenario_finished(&self, report: &ScenarioReport) {
        for check in &report.checks {
            let line = if check.passed {
                format!("{} {} {}", "Success:".green(), report.label, check.label)
            } else {
                let detail = check.detail.as_deref().unwrap_or("check failed");
                format!("{} {} {}: {detail}", "Error:".red(), report.label, check.label)
            };
            write_stdout_line(&line);
        }
        if let Some(close_failure) =
            report.outcome.as_ref().and_then(|outcome| outcome.close_failure.as_deref())
        {
            write_stderr_line(&format!(
                "{} {} failed to release session: {close_failure}",
                "Warning:".yellow(),
                report.label
            ));
        }
        if !report.cleanup.is_clean() {
            write_stderr_line(&format!(
                "{} {} left dirty state: {:?}",
                "Warning:".yellow(),
                report.label,
                report.cleanup
            ));
        }
    }

    fn suite_finished(&self, report: &SuiteReport) {
        write_stdout_line("------");
        write_stdout_line(&format!(
            "{} scenario(s), {} failed",
            report.scenarios.len(),
            report.failed_count()
        ));
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes one line to stdout, ignoring stream failures.
fn write_stdout_line(message: &str) {
    let mut stdout = std::io::stdout();
    let _ = writeln!(&mut stdout, "{message}");
}

/// Writes one line to stderr, ignoring stream failures.
fn write_stderr_line(message: &str) {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "{message}");
}

/// Emits an error line and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    write_stderr_line(&format!("{} {message}", "Error:".red()));
    ExitCode::FAILURE
}
