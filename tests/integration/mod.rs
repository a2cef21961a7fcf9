//! Integration test suite for agenticc
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **cli**: argument handling, help and error reporting
//! - **binary_strategy**: patching prebuilt template binaries end to end
//! - **source_strategy**: specialization and building through the toolchain seam

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod binary_strategy;
mod cli;
mod source_strategy;
