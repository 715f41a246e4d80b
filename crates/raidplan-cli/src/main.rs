//! Command-line front-end: load the two CSV tables, run one solve, print
//! the metrics and the battle log.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use raidplan::{load_damage_csv, load_health_csv, solve, SolveParameters};

#[derive(Debug, Parser)]
#[command(name = "raidplan", version, about = "Schedule commanders across an ordered boss ladder")]
struct Cli {
    /// Boss health CSV: Level,<boss>,<boss>,... (column order is battle order)
    #[arg(long)]
    boss_health: PathBuf,

    /// Commander damage CSV: boss,level,<commander>,...
    #[arg(long)]
    commander_damage: PathBuf,

    /// Run parameters TOML; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Uses per commander
    #[arg(long)]
    attempts: Option<u32>,

    /// Search time budget in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Disable the parallel root split
    #[arg(long)]
    sequential: bool,
}

const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_TIME_LIMIT_SECS: f64 = 60.0;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut params = match &cli.config {
        Some(path) => SolveParameters::from_toml_file(path)?,
        None => SolveParameters::new(DEFAULT_ATTEMPTS, DEFAULT_TIME_LIMIT_SECS),
    };
    if let Some(attempts) = cli.attempts {
        params.attempts_per_commander = attempts;
    }
    if let Some(time_limit) = cli.time_limit {
        params.time_limit_seconds = time_limit;
    }
    if cli.sequential {
        params.parallel_root_split = false;
    }

    let health = load_health_csv(&cli.boss_health)?;
    let damage = load_damage_csv(&cli.commander_damage)?;

    println!("Boss order : {}", health.boss_names().join(", "));

    match solve(&health, &damage, &params)? {
        Some(report) => {
            println!("Found a(n) {} solution", report.quality);
            println!("Total bosses defeated : {:.2}", report.bosses_defeated);
            println!(
                "Total damage done (not including overkill) : {}",
                report.total_damage
            );
            println!("Damage efficiency : {:.2} %", report.damage_efficiency);
            println!();
            print!("{}", report.battle_log);
        }
        None => {
            println!(
                "No solution found within {} seconds; try a larger time limit",
                params.time_limit_seconds
            );
        }
    }
    Ok(())
}
