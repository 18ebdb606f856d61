//! Scenario orchestration: unique naming, apply, assert, guaranteed teardown.
//!
//! A scenario walks the module through init, apply (under the retry policy),
//! output extraction, assertions, and destroy. The one property everything
//! else bends around: once apply has run, destroy is attempted exactly once
//! on every exit path, including assertion panics and cancellation of the
//! scenario future. Parallel scenarios isolate themselves by unique resource
//! naming, not locking.

use crate::config::ScenarioConfig;
use crate::driver::LifecycleDriver;
use crate::error::{HarnessError, Result};
use crate::output::OutputSet;
use crate::retry::RetryPolicy;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::process::Command as StdCommand;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Length of the generated scenario suffix.
const UNIQUE_SUFFIX_LEN: usize = 6;

/// Collision-resistant lowercase token for per-scenario resource names.
///
/// Injected into the module's naming inputs (typically `environment`) so
/// scenarios sharing one provider account never collide.
pub fn unique_suffix() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id.get(..UNIQUE_SUFFIX_LEN).unwrap_or("000000").to_string()
}

/// Terminal result of one scenario.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub succeeded: bool,
    /// Extracted outputs; present whenever apply and extraction succeeded,
    /// even if a later assertion failed.
    pub outputs: Option<OutputSet>,
    pub error: Option<HarnessError>,
}

impl ScenarioOutcome {
    fn success(outputs: OutputSet) -> Self {
        Self {
            succeeded: true,
            outputs: Some(outputs),
            error: None,
        }
    }

    fn failure(error: HarnessError) -> Self {
        Self {
            succeeded: false,
            outputs: None,
            error: Some(error),
        }
    }

    fn failure_with_outputs(outputs: OutputSet, error: HarnessError) -> Self {
        Self {
            succeeded: false,
            outputs: Some(outputs),
            error: Some(error),
        }
    }

    /// Collapse into a `Result`, yielding the outputs on success.
    pub fn into_result(self) -> Result<OutputSet> {
        if self.succeeded {
            if let Some(outputs) = self.outputs {
                return Ok(outputs);
            }
        }
        Err(self.error.unwrap_or_else(|| {
            HarnessError::Assertion("scenario failed without a recorded error".to_string())
        }))
    }
}

/// Runs scenarios through the full lifecycle with teardown on every exit path.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    driver: LifecycleDriver,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self {
            driver: LifecycleDriver::new(),
        }
    }

    /// Runner using a specific driver (alternate binary location).
    pub fn with_driver(driver: LifecycleDriver) -> Self {
        Self { driver }
    }

    /// Run one scenario: init, apply under retry, extract outputs, assert,
    /// destroy.
    ///
    /// `assertions` receives the full extracted output set. It may return an
    /// error or panic (e.g. via `assert_eq!`); either way teardown still
    /// runs and the failure lands in the outcome as an assertion failure.
    pub async fn run<F>(&self, config: ScenarioConfig, assertions: F) -> ScenarioOutcome
    where
        F: FnOnce(&OutputSet) -> std::result::Result<(), String>,
    {
        info!(dir = %config.terraform_dir.display(), "starting scenario");

        // Nothing has been created yet, so an init failure aborts without
        // teardown.
        if let Err(init_error) = self.driver.init(&config).await {
            error!(%init_error, "scenario init failed");
            return ScenarioOutcome::failure(init_error);
        }

        // Armed before anything state-changing runs. If the scenario future
        // is dropped past this point, the guard destroys synchronously.
        let mut guard = TeardownGuard::new(&self.driver, &config);

        let policy = RetryPolicy::from_config(&config);
        let mut attempts = 0u32;
        let apply_result = policy
            .execute(|| {
                attempts += 1;
                self.driver.apply(&config)
            })
            .await;

        if let Err(apply_error) = apply_result {
            // A failed apply can still have created resources part-way.
            guard.disarm();
            if let Err(destroy_error) = self.driver.destroy(&config).await {
                warn!(%destroy_error, "best-effort destroy after failed apply also failed");
            }
            return ScenarioOutcome::failure(HarnessError::ApplyFailed {
                attempts,
                source: Box::new(apply_error),
            });
        }
        info!(attempts, "apply complete");

        let outputs = match self.driver.output_all(&config).await {
            Ok(outputs) => outputs,
            Err(extract_error) => {
                guard.disarm();
                if let Err(destroy_error) = self.driver.destroy(&config).await {
                    warn!(%destroy_error, "destroy failed after output extraction error");
                }
                return ScenarioOutcome::failure(extract_error);
            }
        };

        // Assertion failures and panics both still reach teardown.
        let assertion = catch_unwind(AssertUnwindSafe(|| assertions(&outputs)));

        guard.disarm();
        let destroy_result = self.driver.destroy(&config).await;

        match assertion {
            Ok(Ok(())) => match destroy_result {
                Ok(_) => {
                    info!("scenario succeeded");
                    ScenarioOutcome::success(outputs)
                }
                // The scenario itself passed, so the destroy failure is the
                // primary result rather than a footnote.
                Err(destroy_error) => {
                    error!(%destroy_error, "destroy failed after successful scenario");
                    ScenarioOutcome::failure_with_outputs(outputs, destroy_error)
                }
            },
            Ok(Err(message)) => {
                if let Err(destroy_error) = destroy_result {
                    warn!(%destroy_error, "destroy failed after assertion failure");
                }
                ScenarioOutcome::failure_with_outputs(outputs, HarnessError::Assertion(message))
            }
            Err(panic_payload) => {
                if let Err(destroy_error) = destroy_result {
                    warn!(%destroy_error, "destroy failed after assertion panic");
                }
                ScenarioOutcome::failure_with_outputs(
                    outputs,
                    HarnessError::Assertion(panic_message(panic_payload)),
                )
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "assertion panicked".to_string()
    }
}

/// Destroys scenario resources when the scenario body never reaches its own
/// destroy call (the future was dropped, or something between apply and
/// teardown panicked through).
///
/// The normal path disarms the guard immediately before its single async
/// destroy, so exactly one destroy attempt happens on every exit path.
struct TeardownGuard {
    binary: PathBuf,
    terraform_dir: PathBuf,
    var_args: Vec<String>,
    env: BTreeMap<String, String>,
    no_color: bool,
    armed: bool,
}

impl TeardownGuard {
    fn new(driver: &LifecycleDriver, config: &ScenarioConfig) -> Self {
        Self {
            binary: driver.binary().to_path_buf(),
            terraform_dir: config.terraform_dir.clone(),
            var_args: config.var_args(),
            env: config.env.clone(),
            no_color: config.no_color,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // The async destroy never ran; fall back to a blocking invocation so
        // cancellation cannot orphan droplets.
        warn!(
            dir = %self.terraform_dir.display(),
            "scenario interrupted, destroying leftover resources"
        );
        let mut command = StdCommand::new(&self.binary);
        command.arg("destroy").arg("-input=false").arg("-auto-approve");
        if self.no_color {
            command.arg("-no-color");
        }
        command
            .args(&self.var_args)
            .envs(&self.env)
            .current_dir(&self.terraform_dir);

        match command.output() {
            Ok(output) if output.status.success() => {
                info!("leftover resources destroyed");
            }
            Ok(output) => {
                error!(
                    exit_code = output.status.code().unwrap_or(-1),
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "fallback destroy failed"
                );
            }
            Err(spawn_error) => {
                error!(%spawn_error, "fallback destroy could not start");
            }
        }
    }
}
