mod config;
mod interactive;
mod output;
mod parse;
mod prompt;
mod rank;
mod simulate;
mod store;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tierduel_core::{Refinement, TierId};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::TierduelConfig;
use crate::rank::RankRequest;
use crate::simulate::SimulationOptions;

#[derive(Parser)]
#[command(name = "tierduel", version, about = "Rank a tier list by head-to-head comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file (default: ~/.config/tierduel/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compare items two at a time, then sort them into tiers
    Rank(RankArgs),
    /// Restore the tier list from before the last applied ranking
    Undo {
        /// Tier-list JSON file
        #[arg(long)]
        list: Option<PathBuf>,
    },
    /// Run the engine against a simulated judge with a known true order
    Simulate(SimulateArgs),
    /// Create a default config file at ~/.config/tierduel/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// Tier-list JSON file
    #[arg(long)]
    list: Option<PathBuf>,

    /// Destination tier ID (repeatable, best first). Default: every ranked tier.
    #[arg(long = "tier")]
    tiers: Vec<String>,

    /// Only compare each pair once; skip the refinement pass
    #[arg(long)]
    no_refine: bool,

    /// Show the result without writing it to the tier list
    #[arg(long)]
    dry_run: bool,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Number of items
    #[arg(long, default_value_t = 20)]
    items: usize,

    /// Number of tiers
    #[arg(long, default_value_t = 5)]
    tiers: usize,

    /// Probability the judge picks the worse item
    #[arg(long, default_value_t = 0.1)]
    noise: f64,

    /// Probability the judge skips a pair
    #[arg(long, default_value_t = 0.0)]
    skip_rate: f64,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Only compare each pair once; skip the refinement pass
    #[arg(long)]
    no_refine: bool,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };

    match cli.command {
        Commands::Rank(args) => {
            let cfg = config::load_config(&config_path)?;
            run_rank(args, cfg, &config_path)
        }
        Commands::Undo { list } => {
            let cfg = config::load_config(&config_path)?;
            let path = resolve_list_path(list, &cfg, &config_path)?;
            store::restore_snapshot(&path)?;
            println!("Restored {} to its state before the last ranking", path.display());
            Ok(())
        }
        Commands::Simulate(args) => {
            let cfg = config::load_config(&config_path)?;
            run_simulate(args, &cfg)
        }
        Commands::Init => {
            config::create_default_config(&config_path)?;
            println!("Created config at {}", config_path.display());
            println!("Edit it to set your default tier list, tiers, etc.");
            Ok(())
        }
    }
}

fn resolve_list_path(arg: Option<PathBuf>, cfg: &TierduelConfig, config_path: &Path) -> Result<PathBuf> {
    match arg.or_else(|| cfg.list.clone()) {
        Some(path) => Ok(path),
        None => bail!(
            "No tier list specified. Pass --list or set it in {}",
            config_path.display()
        ),
    }
}

/// Destination tiers: CLI flags > config file. Empty leaves the choice to the list.
fn requested_tiers(args: &RankArgs, cfg: &TierduelConfig) -> Vec<TierId> {
    if !args.tiers.is_empty() {
        args.tiers.clone()
    } else {
        cfg.default_tiers.clone().unwrap_or_default()
    }
}

fn run_rank(args: RankArgs, cfg: TierduelConfig, config_path: &Path) -> Result<()> {
    let list_path = resolve_list_path(args.list.clone(), &cfg, config_path)?;

    let mut engine_config = cfg.engine_config()?;
    if args.no_refine {
        engine_config.refinement = Refinement::Off;
    }

    let request = RankRequest {
        list_path: &list_path,
        tiers: requested_tiers(&args, &cfg),
        engine: engine_config,
        dry_run: args.dry_run,
    };

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        info!("reading answers from piped input");
    }
    let outcome = rank::run_rank(&request, &mut stdin.lock(), &mut io::stderr())
        .with_context(|| format!("Ranking {} failed", list_path.display()))?;
    info!(end = ?outcome.end, votes = outcome.votes, "session ended");

    let summary = outcome.summary();
    if args.json {
        println!("{}", output::render_json(&summary, &outcome.list)?);
    } else {
        output::print_table(&summary, &outcome.list);
        if outcome.applied() {
            println!("Saved to {}. Run `tierduel undo` to revert.", list_path.display());
        }
    }
    Ok(())
}

fn run_simulate(args: SimulateArgs, cfg: &TierduelConfig) -> Result<()> {
    let mut engine_config = cfg.engine_config()?;
    if args.no_refine {
        engine_config.refinement = Refinement::Off;
    }

    let options = SimulationOptions {
        items: args.items,
        tiers: args.tiers,
        noise: args.noise,
        skip_rate: args.skip_rate,
        seed: args.seed,
    };
    let report = simulate::run_simulation(&options, engine_config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        simulate::print_report(&report);
    }
    Ok(())
}
