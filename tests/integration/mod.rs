//! Integration test suite for assetpipe
//!
//! End-to-end tests that run the compiled binary against temporary sites.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **build**: full builds, task selection and failure reporting
//! - **clean**: per-kind and full cleaning
//! - **partials**: partial listing and configuration discovery
//! - **tasks**: task graph listing

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod build;
mod clean;
mod partials;
mod tasks;
