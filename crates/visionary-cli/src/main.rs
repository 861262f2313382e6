mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "visionary",
    about = "Visionary 2026: goal roadmaps and sealed notes that open at year end",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and the daily unseal scheduler
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one unseal sweep now and report what was delivered
    Sweep,

    /// Extract a roadmap from raw model output (file or stdin)
    Extract {
        /// File containing the raw text (default: stdin)
        file: Option<PathBuf>,
    },

    /// List stored capsules
    List,

    /// Decrypt and print the note of one capsule
    Open {
        /// Capsule id
        id: String,
    },

    /// Withdraw a capsule so it is never unsealed
    Delete {
        /// Capsule id
        id: String,
    },
}

fn main() {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Sweep => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve { port } => cmd::serve::run(port),
        Commands::Sweep => cmd::sweep::run(cli.json),
        Commands::Extract { file } => cmd::extract::run(file.as_deref(), cli.json),
        Commands::List => cmd::capsule::list(cli.json),
        Commands::Open { id } => cmd::capsule::open(&id, cli.json),
        Commands::Delete { id } => cmd::capsule::delete(&id, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
