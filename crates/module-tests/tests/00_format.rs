//! Static checks: canonical formatting.
//!
//! `fmt -check` is side-effect-free and exits non-zero if any file would be
//! rewritten, so a passing run proves the checked-in sources are already in
//! canonical layout.

#![cfg(feature = "validate")]

use module_tests::fixtures::modules::{all_format_roots, module_root};
use tf_harness::{LifecycleDriver, ScenarioConfig};

#[tokio::test]
async fn test_terraform_files_are_formatted() {
    let driver = LifecycleDriver::new();

    for root in all_format_roots() {
        let config = ScenarioConfig::new(&root);
        driver.fmt_check(&config).await.unwrap_or_else(|error| {
            panic!(
                "terraform files under {} should be canonically formatted: {}",
                root.display(),
                error
            )
        });
    }
}

#[tokio::test]
async fn test_format_check_is_idempotent() {
    let driver = LifecycleDriver::new();
    let config = ScenarioConfig::new(module_root());

    // Already-canonical source stays canonical; a second check sees the
    // same tree and must agree.
    for _ in 0..2 {
        driver
            .fmt_check(&config)
            .await
            .expect("re-checking canonical sources should be a no-op");
    }
}
