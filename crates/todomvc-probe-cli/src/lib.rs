//! todoprobe CLI library
//!
//! Command-line front end for the todomvc-probe scenario suite.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    BackendArg, Cli, ColorArg, Commands, ConfigArgs, FormatArg, ListArgs, ProbeArgs, RunArgs,
};
pub use config::{resolve_probe_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{
    render_json, render_scenario_list, render_scenario_list_json, OutputFormat, ProgressReporter,
};
pub use runner::TestRunner;
