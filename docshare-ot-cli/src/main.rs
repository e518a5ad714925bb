use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod scenario;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a two-site editing scenario and check that both sites converge
    Replay {
        /// Scenario file (JSON)
        scenario: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Replay { scenario, json } => replay_command(scenario, *json),
    }
}

fn replay_command(path: &Path, json: bool) {
    let outcome = match scenario::load(path).and_then(|s| scenario::replay(&s)) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(output) => println!("{output}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
    } else {
        println!("owner: {}", outcome.owner);
        println!("participant: {}", outcome.participant);
        if outcome.converged {
            println!("Converged.");
        } else {
            println!("Diverged.");
        }
    }

    if !outcome.converged {
        std::process::exit(2);
    }
}
