//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cartwright: drive an e-commerce storefront to verified states
#[derive(Parser, Debug)]
#[command(name = "cartwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Harness configuration file (YAML)
    #[arg(long, global = true, env = "CARTWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run acceptance scenarios against a storefront
    Run(RunArgs),

    /// List available scenarios
    List,

    /// Show the effective harness configuration
    Config,

    /// Parse storefront currency text
    ParseMoney(ParseMoneyArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenarios to run, in order (default: all)
    pub scenarios: Vec<String>,

    /// Driver behind the interaction surface
    #[arg(short, long, default_value = "mock")]
    pub driver: DriverArg,

    /// Report format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,

    /// Storefront root URL (overrides config and environment)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,
}

/// Arguments for the parse-money command
#[derive(Parser, Debug)]
pub struct ParseMoneyArgs {
    /// Currency texts, e.g. "Rs. 1,200"
    #[arg(required = true)]
    pub inputs: Vec<String>,
}

/// Driver selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// In-memory storefront
    #[default]
    Mock,
    /// Real Chromium over CDP (requires the `browser` feature)
    Chromium,
}

impl DriverArg {
    /// Name used in reports
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Chromium => "chromium",
        }
    }
}

/// Report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
