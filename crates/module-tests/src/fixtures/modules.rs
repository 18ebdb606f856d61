//! Locations and declared contract of the droplet module and its demo roots.

use regex::Regex;
use std::path::PathBuf;

/// Variable every root accepts for unique per-scenario naming.
pub const ENVIRONMENT_VAR: &str = "environment";

/// Pattern an IPv4-shaped output must match.
pub const IPV4_PATTERN: &str = r"^(\d{1,3}\.){3}\d{1,3}$";

/// Whether a scalar output looks like an IPv4 address.
pub fn is_ipv4_shaped(value: &str) -> bool {
    Regex::new(IPV4_PATTERN)
        .expect("IPv4 pattern is valid")
        .is_match(value)
}

fn terraform_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../terraform")
}

/// Root of the reusable droplet module itself.
pub fn module_root() -> PathBuf {
    terraform_root()
}

/// Demo root: one droplet, defaults everywhere.
pub fn minimal_demo() -> PathBuf {
    terraform_root().join("demos/minimal")
}

/// Demo root: multiple droplets plus load balancer, every input exercised.
pub fn complete_demo() -> PathBuf {
    terraform_root().join("demos/complete")
}

/// Demo root: three droplets behind a load balancer.
pub fn load_balancer_demo() -> PathBuf {
    terraform_root().join("demos/with-load-balancer")
}

/// Every directory that must be in canonical formatting.
pub fn all_format_roots() -> Vec<PathBuf> {
    vec![
        module_root(),
        minimal_demo(),
        complete_demo(),
        load_balancer_demo(),
    ]
}
