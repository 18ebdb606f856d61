//! Test fixtures describing the module under test.

pub mod modules;

pub use modules::{is_ipv4_shaped, ENVIRONMENT_VAR, IPV4_PATTERN};
