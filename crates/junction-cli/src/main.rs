#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use junction_core::{JunctionError, PipelineConfig, load_config, load_project_config};
use output::{CliError, OutputMode};
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "jt: junction trees for Bayesian networks",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format. Defaults to `FORMAT`, then pretty on a TTY and text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Pipeline config file (defaults to `.junction/config.toml` in the working directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip the acyclicity check (cycles are logged, not rejected).
    #[arg(long, global = true)]
    no_acyclic_check: bool,

    /// Skip re-verification of stage invariants.
    #[arg(long, global = true)]
    no_verify: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        let flag = if self.json {
            Some(OutputMode::Json)
        } else {
            self.format
        };
        output::resolve_output_mode(flag)
    }

    /// Resolve the config file, then apply command-line overrides.
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match self.config {
            Some(ref path) => load_config(path)?,
            None => load_project_config(&env::current_dir()?)?,
        };
        if self.no_acyclic_check {
            config.check_acyclic = false;
        }
        if self.no_verify {
            config.verify = false;
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Build the junction tree of a network",
        long_about = "Run moralization, triangulation, clique extraction and the maximum \
                      spanning forest, then print cliques and separators.",
        after_help = "EXAMPLES:\n    jt build asia.json\n\n    jt build --stages --format json asia.json\n\n    cat asia.json | jt build -"
    )]
    Build(cmd::build::BuildArgs),

    #[command(
        about = "Validate a network description",
        long_about = "Parse and validate a network without building its junction tree.",
        after_help = "EXAMPLES:\n    jt check asia.json\n\n    jt check --no-acyclic-check cyclic.json"
    )]
    Check(cmd::check::CheckArgs),
}

/// Default log filter when `JUNCTION_LOG` is unset.
///
/// Covers both the library (`junction_core`) and this binary (`jt`).
const fn default_filter(verbose: bool, debug_env: bool) -> &'static str {
    if verbose || debug_env {
        "junction=debug,jt=debug,info"
    } else {
        "junction=info,jt=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("JUNCTION_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_filter(verbose, env::var("DEBUG").is_ok()))
    });

    let format = env::var("JUNCTION_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let ansi = std::io::stderr().is_terminal();

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_ansi(ansi).with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print `err` in the active output mode, using its error code when it is a
/// [`JunctionError`].
fn report_failure(mode: OutputMode, err: &anyhow::Error) {
    let cli_err = err
        .downcast_ref::<JunctionError>()
        .map_or_else(|| CliError::new(format!("{err:#}")), CliError::from);
    if output::render_error(mode, &cli_err).is_err() {
        eprintln!("error: {err:#}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mode = cli.output_mode();
    let result = cli.pipeline_config().and_then(|config| {
        debug!(?config, "resolved pipeline config");
        match cli.command {
            Commands::Build(ref args) => cmd::build::run_build(args, &config, mode),
            Commands::Check(ref args) => cmd::check::run_check(args, &config, mode),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(mode, &err);
            ExitCode::FAILURE
        }
    }
}
