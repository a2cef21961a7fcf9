//! Command-line interface for agenticc
//!
//! ```text
//! agenticc [OPTIONS] <INPUT>
//! ```
//!
//! Compiles `INPUT` into an executable that hands the program text to a
//! language model. Options may appear before or after the input file.
//!
//! # Examples
//!
//! ```bash
//! # Output defaults to the input without its .c suffix
//! agenticc fibonacci.c
//!
//! # Choose the output and model
//! agenticc -o fib -m gpt-4o fibonacci.c
//!
//! # Patch a prebuilt template binary instead of compiling
//! agenticc --strategy binary --base-binary ./agent-template fibonacci.c
//! ```
//!
//! Settings resolve in this order: command-line flag, environment variable,
//! config file (see [`crate::config`]), built-in default.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::build::BuildOrchestrator;
use crate::config::AgenticcConfig;
use crate::constants::DEFAULT_MODEL;
use crate::core::{BuildRequest, Strategy, derive_output_path};
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::template::{SlotPolicy, TemplateResolver};
use crate::toolchain::CargoToolchain;
use crate::utils::platform::get_cargo_command;

/// Runtime settings derived from the global flags.
///
/// Threaded through explicitly; nothing is written to the process
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,

    /// Suppress the status lines on stdout
    pub quiet: bool,

    pub no_progress: bool,

    pub config_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            quiet: false,
            no_progress: false,
            config_path: None,
        }
    }
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over [`CliConfig::log_level`]. ANSI styling
    /// is used only when stderr is a terminal.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "agenticc",
    about = "Agentically compile C programs into LLM-backed executables",
    version,
    long_about = "agenticc embeds a C program and a model name into an agent template and \
                  builds it into a standalone executable. When run, the executable sends the \
                  program to the model and prints what the model says the program outputs."
)]
pub struct Cli {
    /// C source file to compile
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output binary (default: INPUT without its .c suffix, or INPUT.out when it has none)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Model identifier embedded in the binary (default: gpt-4)
    #[arg(short, long, env = "AGENTICC_MODEL", value_name = "MODEL")]
    model: Option<String>,

    /// How the program is injected into the template
    #[arg(long, value_enum, default_value = "source")]
    strategy: Strategy,

    /// Prebuilt template binary to patch (implies --strategy binary)
    #[arg(long, value_name = "PATH")]
    base_binary: Option<PathBuf>,

    /// Template source to use instead of the bundled one
    #[arg(long, env = "AGENTICC_TEMPLATE", value_name = "PATH")]
    template: Option<PathBuf>,

    /// Fail when a template slot is missing instead of warning
    #[arg(long)]
    strict_slots: bool,

    /// Path to the config file (default: ~/.agenticc/config.toml)
    #[arg(long, env = "AGENTICC_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable progress spinners
    #[arg(long)]
    no_progress: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Parse the process arguments after em-dash normalization.
    #[must_use]
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            quiet: self.quiet,
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Strategy after applying `--base-binary`.
    fn effective_strategy(&self) -> Strategy {
        if self.base_binary.is_some() {
            Strategy::Binary
        } else {
            self.strategy
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let settings = AgenticcConfig::load(config.config_path.clone()).await?;

        let model = self
            .model
            .clone()
            .or_else(|| settings.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let output = self.output.clone().unwrap_or_else(|| derive_output_path(&self.input));
        let request = BuildRequest::from_input_file(&self.input, model, output)?;

        let template_override = match &self.template {
            Some(path) => Some(path.clone()),
            None => settings.template_override()?,
        };
        let resolver = TemplateResolver::new()
            .with_override(template_override)
            .with_leading_candidates(settings.template_candidates()?);

        let strategy = self.effective_strategy();
        let toolchain = if strategy == Strategy::Binary && self.base_binary.is_some() {
            // Patching a given binary never runs the toolchain
            CargoToolchain::with_program(get_cargo_command())
        } else {
            CargoToolchain::locate(settings.cargo_path()?.as_deref())?
        };

        let options = PipelineOptions {
            strategy,
            base_binary: self.base_binary.clone(),
            slot_policy: if self.strict_slots || settings.strict_slots {
                SlotPolicy::Strict
            } else {
                SlotPolicy::WarnAndContinue
            },
            print_status: !config.quiet,
        };

        let orchestrator = BuildOrchestrator::new(toolchain).with_progress(!config.no_progress);
        Pipeline::new(resolver, orchestrator, options).run(&request).await?;
        Ok(())
    }
}

/// Replace a leading em dash (`—`) in each argument with ASCII dashes.
///
/// Typographic autocorrection turns `-o` into `—o` and `--model` into
/// `—model`. A single option letter gets `-`; a longer name gets `--`.
/// Arguments after a literal `--` are left alone, as are arguments that are
/// not valid UTF-8. The first argument (the program name) is never changed.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut end_of_options = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || end_of_options {
                return arg;
            }
            if arg == "--" {
                end_of_options = true;
                return arg;
            }
            match arg.to_str().and_then(normalize_dash) {
                Some(fixed) => fixed.into(),
                None => arg,
            }
        })
        .collect()
}

fn normalize_dash(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('\u{2014}')?;
    if rest.is_empty() {
        return None;
    }
    if rest.starts_with('-') {
        return Some(format!("-{rest}"));
    }
    let name = rest.split('=').next().unwrap_or(rest);
    let dashes = if name.chars().count() == 1 { "-" } else { "--" };
    Some(format!("{dashes}{rest}"))
}
