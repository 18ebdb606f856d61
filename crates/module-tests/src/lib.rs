//! Droplet Module Conformance Suite
//!
//! Integration tests for the DigitalOcean droplet module under `terraform/`.
//! Static checks run against the checked-in sources; deploy scenarios spin up
//! real infrastructure through the module's demo roots, assert on declared
//! outputs, and tear everything down.
//!
//! # Features
//!
//! - `validate`: fmt + init + validate checks (network for provider
//!   downloads, no resources created)
//! - `deploy`: full apply/assert/destroy scenarios (creates real droplets
//!   and load balancers, costs money)
//! - `all`: enable every test category
//!
//! # Prerequisites
//!
//! 1. `terraform` (>= 1.5) in `PATH`
//! 2. `DIGITALOCEAN_TOKEN` exported for the `deploy` feature
//!
//! # Usage
//!
//! ```bash
//! # From repo root - runs 0 module-tests (no default features)
//! cargo test
//!
//! # Static checks only (fast, free)
//! cargo test -p module-tests --features validate
//!
//! # Full conformance run (~10min, provisions real resources)
//! cargo test -p module-tests --features all
//! ```
//!
//! Deploy scenarios are isolated from each other by unique environment
//! names, not locks; they are safe to run in parallel against one
//! DigitalOcean account.

pub mod fixtures;
