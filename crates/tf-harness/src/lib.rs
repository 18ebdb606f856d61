//! # tf-harness
//!
//! End-to-end conformance harness for declarative infrastructure modules
//! driven through the `terraform` CLI.
//!
//! The harness owns the glue the module itself cannot provide:
//!
//! - [`driver`] — lifecycle commands (init/validate/plan/apply/destroy/fmt)
//!   against a module directory, with captured output and typed errors
//! - [`output`] — typed extraction of `output -json` (scalar/list/map,
//!   fail-fast shape checks)
//! - [`scenario`] — one full test scenario with unique resource naming and
//!   teardown guaranteed on every exit path
//! - [`retry`] — bounded fixed-interval retry for transient provisioning
//!   failures
//!
//! # Prerequisites
//!
//! - `terraform` (>= 1.5) in `PATH`
//! - Provider credentials in the environment (`DIGITALOCEAN_TOKEN` for the
//!   droplet module)
//!
//! # Usage
//!
//! ```rust,ignore
//! use tf_harness::{unique_suffix, ScenarioConfig, ScenarioRunner};
//!
//! #[tokio::test]
//! async fn droplet_comes_up() {
//!     let config = ScenarioConfig::new("terraform/demos/minimal")
//!         .with_var("environment", format!("test-{}", unique_suffix()));
//!
//!     let outcome = ScenarioRunner::new()
//!         .run(config, |outputs| {
//!             let ip = outputs.scalar("droplet_ip").map_err(|e| e.to_string())?;
//!             if ip.is_empty() {
//!                 return Err("droplet_ip should not be empty".to_string());
//!             }
//!             Ok(())
//!         })
//!         .await;
//!
//!     outcome.into_result().expect("minimal scenario should succeed");
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod retry;
pub mod scenario;

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test_support;

pub use config::{ScenarioConfig, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL};
pub use driver::{CommandResult, LifecycleCommand, LifecycleDriver};
pub use error::{HarnessError, Result};
pub use output::{OutputSet, OutputShape, OutputValue};
pub use retry::RetryPolicy;
pub use scenario::{unique_suffix, ScenarioOutcome, ScenarioRunner};
