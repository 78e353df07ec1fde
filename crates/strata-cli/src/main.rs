mod cmd;
mod config;
mod output;
mod snapshot;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cmd::CommandContext;
use crate::config::{CliOverrides, EnvOverrides, resolve_config};
use crate::output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "strata: dependency cycles and component metrics",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Maximum number of cycles to report.
    #[arg(long, global = true, value_name = "N", allow_negative_numbers = true)]
    max_cycles: Option<i64>,

    /// Maximum number of dependencies shown per cycle step.
    #[arg(long, global = true, value_name = "N", allow_negative_numbers = true)]
    max_edges_per_step: Option<i64>,

    /// Project directory holding `.strata/config.toml` (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }

    const fn overrides(&self) -> CliOverrides {
        CliOverrides {
            max_cycles: self.max_cycles,
            max_edges_per_step: self.max_edges_per_step,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List dependency cycles between components",
        after_help = "EXAMPLES:\n    # Report up to 10 cycles\n    strata cycles snapshot.json --max-cycles 10\n\n    # Fail a CI job on any cycle\n    strata cycles snapshot.json --deny"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(about = "Lakos metrics: CCD, ACD, RACD, NCCD")]
    Lakos(cmd::metrics::MetricsArgs),

    #[command(about = "Martin metrics: coupling, instability, abstractness, distance")]
    Martin(cmd::metrics::MetricsArgs),

    #[command(about = "Visibility metrics: RV, ARV, GRV")]
    Visibility(cmd::metrics::MetricsArgs),

    #[command(about = "All metric families and cycles in one report")]
    Report(cmd::metrics::MetricsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("STRATA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "strata=debug,info"
        } else {
            "strata=info,warn"
        })
    });

    let format = env::var("STRATA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_root = match &cli.project {
        Some(dir) => dir.clone(),
        None => env::current_dir()?,
    };
    let config = resolve_config(&project_root, cli.overrides(), &EnvOverrides::from_env())?;
    debug!(?config, project = %project_root.display(), "configuration resolved");

    let ctx = CommandContext {
        output: cli.output_mode(),
        config,
    };

    match &cli.command {
        Commands::Cycles(args) => cmd::cycles::run_cycles(args, ctx),
        Commands::Lakos(args) => cmd::metrics::run_lakos(args, ctx),
        Commands::Martin(args) => cmd::metrics::run_martin(args, ctx),
        Commands::Visibility(args) => cmd::metrics::run_visibility(args, ctx),
        Commands::Report(args) => cmd::metrics::run_report(args, ctx),
    }
}
