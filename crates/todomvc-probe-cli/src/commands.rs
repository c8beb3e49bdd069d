//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use todomvc_probe::Backend;

/// todoprobe: run the TodoMVC end-to-end suite
#[derive(Parser, Debug)]
#[command(name = "todoprobe")]
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

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenario suite
    Run(RunArgs),

    /// List scenarios
    List(ListArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Where the probe configuration comes from
///
/// Layered as defaults, then `--config`, then environment, then these flags.
#[derive(Args, Debug, Default, Clone)]
pub struct ProbeArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend to drive the app with
    #[arg(short, long)]
    pub backend: Option<BackendArg>,

    /// URL of the TodoMVC app
    #[arg(long)]
    pub base_url: Option<String>,

    /// Fixture JSON file (`{"todos": [a, b, c]}`)
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Assertion timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chromium executable (cdp backend)
    #[arg(long)]
    pub chromium_path: Option<PathBuf>,

    /// WebDriver server URL (webdriver backend)
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Probe configuration
    #[command(flatten)]
    pub probe: ProbeArgs,

    /// Only run scenarios whose name or description contains this
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list scenarios whose name or description contains this
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Probe configuration
    #[command(flatten)]
    pub probe: ProbeArgs,
}

/// Backend selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendArg {
    /// Chromium over the DevTools protocol
    Cdp,
    /// W3C WebDriver server
    Webdriver,
    /// In-process app model
    Memory,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Cdp => Self::Cdp,
            BackendArg::Webdriver => Self::WebDriver,
            BackendArg::Memory => Self::Memory,
        }
    }
}

/// Result output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
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

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::try_parse_from(["todoprobe", "run"]).unwrap();
            assert_eq!(cli.verbose, 0);
            assert!(!cli.quiet);
            match cli.command {
                Commands::Run(args) => {
                    assert!(args.probe.backend.is_none());
                    assert!(args.filter.is_none());
                    assert!(!args.fail_fast);
                    assert_eq!(args.format, FormatArg::Text);
                }
                other => panic!("expected run, got {other:?}"),
            }
        }

        #[test]
        fn test_parse_run_with_flags() {
            let cli = Cli::try_parse_from([
                "todoprobe",
                "run",
                "--backend",
                "memory",
                "--base-url",
                "http://localhost:8080/",
                "--filter",
                "edit",
                "--fail-fast",
                "--timeout-ms",
                "1000",
                "--headed",
                "--format",
                "json",
            ])
            .unwrap();
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.probe.backend, Some(BackendArg::Memory));
            assert_eq!(args.probe.base_url.as_deref(), Some("http://localhost:8080/"));
            assert_eq!(args.filter.as_deref(), Some("edit"));
            assert!(args.fail_fast);
            assert_eq!(args.probe.timeout_ms, Some(1000));
            assert!(args.probe.headed);
            assert_eq!(args.format, FormatArg::Json);
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from(["todoprobe", "list", "-vv", "--color", "never"]).unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
        }

        #[test]
        fn test_parse_config_with_file() {
            let cli =
                Cli::try_parse_from(["todoprobe", "config", "--config", "probe.yaml"]).unwrap();
            let Commands::Config(args) = cli.command else {
                panic!("expected config");
            };
            assert_eq!(args.probe.config, Some(PathBuf::from("probe.yaml")));
        }

        #[test]
        fn test_unknown_backend_rejected() {
            assert!(Cli::try_parse_from(["todoprobe", "run", "--backend", "firefox"]).is_err());
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["todoprobe"]).is_err());
        }
    }

    mod conversion_tests {
        use super::*;
        use crate::config::ColorChoice;
        use crate::output::OutputFormat;

        #[test]
        fn test_backend_conversion() {
            assert_eq!(Backend::from(BackendArg::Cdp), Backend::Cdp);
            assert_eq!(Backend::from(BackendArg::Webdriver), Backend::WebDriver);
            assert_eq!(Backend::from(BackendArg::Memory), Backend::Memory);
        }

        #[test]
        fn test_format_conversion() {
            assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
            assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
        }

        #[test]
        fn test_color_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }
    }
}
