//! todoprobe: run the TodoMVC end-to-end suite
//!
//! ## Usage
//!
//! ```bash
//! todoprobe run                                # Chromium against the default app
//! todoprobe run --backend webdriver            # chromedriver on localhost:4444
//! todoprobe run --backend memory --format json # in-process model, JSON results
//! todoprobe list --filter edit                 # scenarios matching "edit"
//! todoprobe config --config probe.yaml         # show the resolved configuration
//! ```

use clap::Parser;
use std::process::ExitCode;
use todomvc_probe::Scenario;
use todomvc_probe_cli::{
    render_json, render_scenario_list, render_scenario_list_json, resolve_probe_config, Cli,
    CliConfig, CliError, CliResult, ColorChoice, Commands, ConfigArgs, ListArgs, OutputFormat,
    ProgressReporter, RunArgs, TestRunner, Verbosity,
};
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
        Commands::Run(args) => run_suite(config, &args),
        Commands::List(args) => run_list(&args),
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn init_tracing(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_suite(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let probe = resolve_probe_config(&args.probe)?;
    let config = config
        .with_format(args.format.into())
        .with_fail_fast(args.fail_fast)
        .with_filter(args.filter.clone());
    let format = config.format;

    // JSON goes to stdout on its own; keep stderr quiet apart from failures
    let quiet = config.verbosity.is_quiet() || format == OutputFormat::Json;
    let mut reporter = ProgressReporter::new(config.color.should_color(), quiet);

    let runner = TestRunner::new(config, probe);
    let results = runner.run(&mut reporter)?;

    match format {
        OutputFormat::Json => println!("{}", render_json(&results)?),
        OutputFormat::Text => reporter.summary(
            results.passed_count(),
            results.failed_count(),
            results.duration,
        ),
    }

    if results.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: results.failed_count(),
            total: results.total(),
        })
    }
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    let scenarios: Vec<Scenario> = Scenario::all()
        .iter()
        .copied()
        .filter(|s| args.filter.as_deref().map_or(true, |p| s.matches(p)))
        .collect();

    match OutputFormat::from(args.format) {
        OutputFormat::Json => println!("{}", render_scenario_list_json(&scenarios)?),
        OutputFormat::Text => print!("{}", render_scenario_list(&scenarios)),
    }
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let probe = resolve_probe_config(&args.probe)?;
    print!("{}", probe.to_yaml()?);
    Ok(())
}
