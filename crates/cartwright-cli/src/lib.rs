//! Cartwright CLI library
//!
//! Command-line front end for the cartwright storefront harness: scenario
//! selection, the runner, and report rendering.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;
pub mod scenarios;

pub use commands::{Cli, ColorArg, Commands, DriverArg, FormatArg, ParseMoneyArgs, RunArgs};
pub use config::{load_harness_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_json, render_money, render_scenario_list, OutputFormat, ProgressReporter};
pub use runner::{connect, RunReport, ScenarioReport, ScenarioRunner};
pub use scenarios::{Check, ScenarioInfo, SCENARIOS};
