//! bb_sim CLI
//!
//! Headless pitcher-vs-batter runs, config schema export, arsenal listing.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "bb_sim")]
#[command(about = "Simulate Q-learning pitchers against a scripted batter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run seeded sessions and write a JSON report
    Run {
        /// First seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of consecutive seeds, run in parallel
        #[arg(long, default_value = "1")]
        seeds: u64,

        /// Half-innings per session
        #[arg(long, default_value = "9")]
        half_innings: u32,

        /// Engine config file (.json / .yaml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Arsenal file (.json / .yaml)
        #[arg(long)]
        arsenal: Option<PathBuf>,

        /// Starting exploration rate override
        #[arg(long)]
        epsilon: Option<f64>,

        /// Report output path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the engine config JSON schema
    Schema {
        /// Output path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List the pitch profiles of an arsenal
    Arsenal {
        /// Arsenal file (the embedded default when omitted)
        #[arg(long)]
        arsenal: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { seed, seeds, half_innings, config, arsenal, epsilon, out } => {
            let mut opts = bb_sim::RunOptions::from_paths(config.as_deref(), arsenal.as_deref())?;
            opts.half_innings = half_innings;
            opts.epsilon = epsilon;

            let seed_list: Vec<u64> = (0..seeds.max(1)).map(|i| seed.wrapping_add(i)).collect();
            tracing::info!(seeds = seed_list.len(), half_innings, "starting run");

            let report = bb_sim::run_all(&opts, &seed_list)?;
            tracing::info!(
                pitches = report.pitches,
                runs = report.runs_allowed,
                mean_reward = report.mean_reward,
                "run finished"
            );
            write_output(out.as_ref(), &serde_json::to_string_pretty(&report)?)?;
        }

        Commands::Schema { out } => {
            let schema = bb_core::EngineConfig::json_schema();
            write_output(out.as_ref(), &serde_json::to_string_pretty(&schema)?)?;
        }

        Commands::Arsenal { arsenal } => {
            let loaded;
            let arsenal = match arsenal {
                Some(path) => {
                    loaded = bb_core::Arsenal::load(&path)?;
                    &loaded
                }
                None => bb_core::default_arsenal(),
            };
            println!("{:<5} {:<20} {:>12} {:>9} {:>9} {:>6}", "LABEL", "NAME", "TRAVEL(ms)", "BREAK_X", "BREAK_Y", "ZONE");
            for p in arsenal.profiles() {
                println!(
                    "{:<5} {:<20} {:>5.0}-{:<6.0} {:>9.3} {:>9.3} {:>5.0}%",
                    p.label.as_str(),
                    p.name,
                    p.traveltime_ms.min,
                    p.traveltime_ms.max,
                    p.break_x,
                    p.break_y,
                    p.zone_rate * 100.0
                );
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn write_output(path: Option<&PathBuf>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{}", text),
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("bb_sim CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
