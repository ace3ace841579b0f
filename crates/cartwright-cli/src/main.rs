//! Cartwright CLI: acceptance scenarios for the storefront
//!
//! ## Usage
//!
//! ```bash
//! cartwright list                          # Show scenarios
//! cartwright run                           # Run all scenarios on the mock
//! cartwright run login empty-cart -f json  # Selected scenarios, JSON report
//! cartwright run -d chromium               # Real browser (browser feature)
//! cartwright parse-money "Rs. 1,200"       # Check currency parsing
//! ```

use cartwright::Money;
use cartwright_cli::{
    connect, load_harness_config, render_json, render_money, render_scenario_list, scenarios,
    Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, DriverArg, OutputFormat,
    ParseMoneyArgs, ProgressReporter, RunArgs, ScenarioRunner, Verbosity, SCENARIOS,
};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => run_scenarios(&config, cli.config.as_deref(), &args),
        Commands::List => {
            print!("{}", render_scenario_list(SCENARIOS));
            Ok(())
        }
        Commands::Config => show_config(cli.config.as_deref()),
        Commands::ParseMoney(args) => parse_money(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_scenarios(config: &CliConfig, path: Option<&Path>, args: &RunArgs) -> CliResult<()> {
    let selected = scenarios::select(&args.scenarios)?;
    let harness = load_harness_config(path, args.base_url.as_deref(), args.driver)?;
    let format: OutputFormat = args.format.into();

    // JSON owns stdout
    let quiet = config.verbosity.is_quiet() || format == OutputFormat::Json;
    let mut reporter = ProgressReporter::new(config.color.should_color(), quiet);

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        let driver = connect(args.driver, &harness).await?;
        let runner = ScenarioRunner::new(driver, harness, args.driver.name())
            .with_fail_fast(args.fail_fast);
        let report = runner.run(&selected, &mut reporter).await;
        runner.close().await?;
        Ok::<_, CliError>(report)
    })?;

    match format {
        OutputFormat::Text => {
            for scenario in &report.scenarios {
                reporter.scenario(scenario);
            }
            reporter.summary(&report);
        }
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    report.verdict()
}

fn show_config(path: Option<&Path>) -> CliResult<()> {
    // Shown as a live run would see it, without the mock's pinned URL
    let harness = load_harness_config(path, None, DriverArg::Chromium)?;
    print!("{}", harness.to_yaml()?);
    Ok(())
}

fn parse_money(args: &ParseMoneyArgs) -> CliResult<()> {
    let results: Vec<_> = args
        .inputs
        .iter()
        .map(|input| (input.clone(), Money::parse(input)))
        .collect();
    print!("{}", render_money(&results));

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        return Err(CliError::invalid_argument(format!(
            "{failed} of {} inputs could not be parsed",
            results.len()
        )));
    }
    Ok(())
}
