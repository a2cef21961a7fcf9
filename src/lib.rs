//! agenticc - agentic C compiler
//!
//! agenticc "compiles" a C program by embedding its text, together with a model
//! identifier, into an agent template program. The resulting executable asks the
//! model what the program would print and prints the answer.
//!
//! # Architecture Overview
//!
//! Two injection strategies share one template:
//!
//! - **Source**: rewrite the template's slot lines with string literals, then
//!   build the specialized source with cargo in a throwaway workspace
//! - **Binary**: overwrite the fixed-size marker regions of an already compiled
//!   template, no toolchain needed when a base binary is supplied
//!
//! # Core Modules
//!
//! ## Pipeline stages
//! - [`template`] - Template resolution, slot location and source specialization
//! - [`binary`] - Marker region patching of compiled templates
//! - [`build`] - Workspace management and toolchain orchestration
//! - [`toolchain`] - The toolchain seam and its cargo implementation
//! - [`installer`] - Writing the final executable
//! - [`pipeline`] - The end-to-end flow for one request
//!
//! ## Supporting modules
//! - [`cli`] - Command-line parsing and argument normalization
//! - [`config`] - Optional user config file (`~/.agenticc/config.toml`)
//! - [`core`] - Errors and the build request
//! - [`utils`] - File system, platform and progress helpers
//!
//! # Example
//!
//! ```bash
//! # Produces ./fibonacci
//! agenticc fibonacci.c
//!
//! # Different model, explicit output
//! agenticc -m gpt-4o -o fib fibonacci.c
//!
//! # Patch a prebuilt template binary
//! agenticc --base-binary ./agent-template fibonacci.c
//! ```
//!
//! # Library usage
//!
//! ```rust,no_run
//! use agenticc::build::BuildOrchestrator;
//! use agenticc::core::BuildRequest;
//! use agenticc::pipeline::{Pipeline, PipelineOptions};
//! use agenticc::template::TemplateResolver;
//! use agenticc::toolchain::CargoToolchain;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let request = BuildRequest::new("fib.c", "int main(){return 0;}", "gpt-4", "fib");
//! let pipeline = Pipeline::new(
//!     TemplateResolver::new(),
//!     BuildOrchestrator::new(CargoToolchain::locate(None)?),
//!     PipelineOptions::default(),
//! );
//! let installed = pipeline.run(&request).await?;
//! println!("{} ({})", installed.path.display(), installed.checksum);
//! # Ok(())
//! # }
//! ```

// Pipeline stages
pub mod binary;
pub mod build;
pub mod installer;
pub mod pipeline;
pub mod template;
pub mod toolchain;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
