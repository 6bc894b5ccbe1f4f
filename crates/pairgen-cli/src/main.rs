//! CLI for pairgen: comparison pairs for budget-allocation surveys.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pairgen")]
#[command(about = "pairgen: comparison pairs for budget-allocation preference surveys")]
#[command(version = pairgen_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered strategy with its labels and pair count
    List,

    /// Check an ideal vector against strategy requirements.
    /// Without --strategy, reports every registered strategy.
    Check {
        /// Strategy name (see `pairgen list`)
        #[arg(long)]
        strategy: Option<String>,

        /// Ideal allocation, comma-separated (e.g. 20,30,50)
        #[arg(long)]
        ideal: String,
    },

    /// Generate comparison pairs for one ideal vector
    Generate {
        /// Strategy name (see `pairgen list`)
        #[arg(long, required_unless_present = "config")]
        strategy: Option<String>,

        /// Ideal allocation, comma-separated (e.g. 20,30,50)
        #[arg(long)]
        ideal: String,

        /// Requested pair count (ignored by fixed-count strategies)
        #[arg(long)]
        pairs: Option<usize>,

        /// Budget total the ideal must sum to
        #[arg(long)]
        total: Option<i32>,

        /// Seed for reproducible output; OS entropy when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Survey configuration JSON file
        #[arg(long, conflicts_with = "strategy")]
        config: Option<PathBuf>,

        /// Print the output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List => commands::list::run(),
        Commands::Check { strategy, ideal } => commands::check::run(strategy.as_deref(), &ideal),
        Commands::Generate {
            strategy,
            ideal,
            pairs,
            total,
            seed,
            config,
            json,
        } => commands::generate::run(commands::generate::GenerateArgs {
            strategy,
            ideal,
            pairs,
            total,
            seed,
            config,
            json,
        }),
    }
}
