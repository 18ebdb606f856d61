//! Lifecycle driver for the external `terraform` binary.
//!
//! The driver maps harness-level commands 1:1 onto tool subcommands, runs
//! them in the configured module directory, and captures exit code, stdout,
//! stderr, and wall-clock duration. A non-zero exit surfaces as
//! [`HarnessError::Execution`] with stderr attached verbatim.
//!
//! Every state-changing command runs with `-input=false` so an unattended
//! run can never hang on an interactive prompt.

use crate::config::ScenarioConfig;
use crate::error::{HarnessError, Result};
use crate::output::OutputSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, error, info};

/// Subcommands of the external tool the harness drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCommand {
    /// `init -input=false`. Must run before plan or apply.
    Init,
    /// `validate`. Static well-formedness only; it does not evaluate
    /// variable values, so semantically bad inputs still pass.
    Validate,
    /// `plan -input=false`.
    Plan,
    /// `apply -input=false -auto-approve`. Creates real resources.
    Apply,
    /// `destroy -input=false -auto-approve`. Safe to run when nothing
    /// exists; the tool exits zero on an empty state.
    Destroy,
    /// `fmt -check`. Side-effect-free; non-zero exit means at least one
    /// file is not in canonical layout.
    FmtCheck,
    /// `output -json`. Feeds the output extractor.
    Output,
}

impl LifecycleCommand {
    /// Subcommand name as it appears in diagnostics and logs.
    pub fn name(self) -> &'static str {
        match self {
            LifecycleCommand::Init => "init",
            LifecycleCommand::Validate => "validate",
            LifecycleCommand::Plan => "plan",
            LifecycleCommand::Apply => "apply",
            LifecycleCommand::Destroy => "destroy",
            LifecycleCommand::FmtCheck => "fmt",
            LifecycleCommand::Output => "output",
        }
    }

    fn base_args(self) -> &'static [&'static str] {
        match self {
            LifecycleCommand::Init => &["init", "-input=false"],
            LifecycleCommand::Validate => &["validate"],
            LifecycleCommand::Plan => &["plan", "-input=false"],
            LifecycleCommand::Apply => &["apply", "-input=false", "-auto-approve"],
            LifecycleCommand::Destroy => &["destroy", "-input=false", "-auto-approve"],
            LifecycleCommand::FmtCheck => &["fmt", "-check"],
            LifecycleCommand::Output => &["output", "-json"],
        }
    }

    /// Whether input variables are evaluated by this subcommand.
    fn takes_vars(self) -> bool {
        matches!(
            self,
            LifecycleCommand::Plan | LifecycleCommand::Apply | LifecycleCommand::Destroy
        )
    }

    /// `fmt` is the one subcommand without a `-no-color` flag.
    fn accepts_no_color(self) -> bool {
        !matches!(self, LifecycleCommand::FmtCheck)
    }
}

/// Captured result of one tool invocation. Produced once, never mutated.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

/// Drives the external `terraform` binary against a module directory.
#[derive(Debug, Clone)]
pub struct LifecycleDriver {
    binary: PathBuf,
}

impl Default for LifecycleDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleDriver {
    /// Driver resolving `terraform` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("terraform"),
        }
    }

    /// Driver using a specific binary instead of `terraform` from `PATH`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub(crate) fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run one lifecycle command in `config.terraform_dir`.
    pub async fn run(
        &self,
        command: LifecycleCommand,
        config: &ScenarioConfig,
    ) -> Result<CommandResult> {
        let args = build_args(command, config);
        debug!(
            command = command.name(),
            dir = %config.terraform_dir.display(),
            "running terraform"
        );

        let start = Instant::now();
        let output = Command::new(&self.binary)
            .args(&args)
            .envs(&config.env)
            .current_dir(&config.terraform_dir)
            .output()
            .await?;
        let duration = start.elapsed();

        let result = CommandResult {
            // A None exit code means the process died to a signal.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        };

        if result.exit_code != 0 {
            error!(
                command = command.name(),
                exit_code = result.exit_code,
                stderr = %result.stderr,
                "terraform command failed"
            );
            return Err(HarnessError::Execution {
                command: command.name().to_string(),
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }

        info!(
            command = command.name(),
            elapsed_ms = duration.as_millis() as u64,
            "terraform command completed"
        );
        Ok(result)
    }

    pub async fn init(&self, config: &ScenarioConfig) -> Result<CommandResult> {
        self.run(LifecycleCommand::Init, config).await
    }

    pub async fn validate(&self, config: &ScenarioConfig) -> Result<CommandResult> {
        self.run(LifecycleCommand::Validate, config).await
    }

    pub async fn plan(&self, config: &ScenarioConfig) -> Result<CommandResult> {
        self.run(LifecycleCommand::Plan, config).await
    }

    pub async fn apply(&self, config: &ScenarioConfig) -> Result<CommandResult> {
        self.run(LifecycleCommand::Apply, config).await
    }

    pub async fn destroy(&self, config: &ScenarioConfig) -> Result<CommandResult> {
        self.run(LifecycleCommand::Destroy, config).await
    }

    pub async fn fmt_check(&self, config: &ScenarioConfig) -> Result<CommandResult> {
        self.run(LifecycleCommand::FmtCheck, config).await
    }

    /// Init followed by apply, the common scenario entry sequence.
    pub async fn init_and_apply(&self, config: &ScenarioConfig) -> Result<CommandResult> {
        self.init(config).await?;
        self.apply(config).await
    }

    /// Raw `output -json` document for the extractor.
    pub async fn output_json(&self, config: &ScenarioConfig) -> Result<String> {
        Ok(self.run(LifecycleCommand::Output, config).await?.stdout)
    }

    /// Every declared output, extracted and typed.
    pub async fn output_all(&self, config: &ScenarioConfig) -> Result<OutputSet> {
        let json = self.output_json(config).await?;
        OutputSet::parse(&json)
    }
}

/// Assemble the full argument vector for one invocation.
fn build_args(command: LifecycleCommand, config: &ScenarioConfig) -> Vec<String> {
    let mut args: Vec<String> = command
        .base_args()
        .iter()
        .map(|arg| (*arg).to_string())
        .collect();

    if config.no_color && command.accepts_no_color() {
        args.push("-no-color".to_string());
    }
    if command.takes_vars() {
        args.extend(config.var_args());
    }
    args
}
