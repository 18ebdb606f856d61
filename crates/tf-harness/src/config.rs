//! Scenario configuration.
//!
//! A [`ScenarioConfig`] describes one scenario run: the module root to drive,
//! the input variables to pass, and the retry budget for apply. It is built
//! up front and never mutated once the scenario starts.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default apply retry budget, matching the heavyweight scenarios' needs.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay between apply retries. Fixed, not exponential: provider
/// rate limits and eventual-consistency lag clear on the order of seconds.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Immutable description of one scenario run.
///
/// Variable keys are unique by construction (`BTreeMap`), and the map's
/// ordering keeps the generated `-var` flags deterministic across runs.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Directory containing the module root to drive.
    pub terraform_dir: PathBuf,

    /// Input variables, passed as `-var key=value` on state-changing commands.
    pub vars: BTreeMap<String, String>,

    /// Extra environment variables for the external tool (provider
    /// credentials are usually inherited from the parent process instead).
    pub env: BTreeMap<String, String>,

    /// Disable ANSI color in tool output. On by default so captured stderr
    /// stays readable in logs and failure messages.
    pub no_color: bool,

    /// Maximum number of apply retries after the first attempt.
    pub max_retries: u32,

    /// Delay between apply retries.
    pub retry_interval: Duration,
}

impl ScenarioConfig {
    /// Create a configuration for the module rooted at `terraform_dir`.
    pub fn new(terraform_dir: impl Into<PathBuf>) -> Self {
        Self {
            terraform_dir: terraform_dir.into(),
            vars: BTreeMap::new(),
            env: BTreeMap::new(),
            no_color: true,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Set an input variable. Setting the same key twice keeps the last value.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Set an environment variable for the external tool's process.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Override the retry budget and interval for apply.
    pub fn with_retries(mut self, max_retries: u32, interval: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_interval = interval;
        self
    }

    /// Re-enable colored tool output.
    pub fn with_color_output(mut self) -> Self {
        self.no_color = false;
        self
    }

    /// Render the variables as `-var key=value` argument pairs.
    pub(crate) fn var_args(&self) -> Vec<String> {
        self.vars
            .iter()
            .flat_map(|(key, value)| ["-var".to_string(), format!("{}={}", key, value)])
            .collect()
    }
}
