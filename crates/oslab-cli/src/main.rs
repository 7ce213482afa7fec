//! oslab CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod screen;

#[derive(Parser)]
#[command(name = "oslab", version, about = "Interactive OS architecture lab")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive lab session
    Run {
        /// Path to a lab definition TOML (defaults to the built-in lab)
        #[arg(long)]
        lab: Option<PathBuf>,

        /// Directory where report files are written
        #[arg(long, default_value = "./oslab-results")]
        output: PathBuf,

        /// Report format: text, json, all
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate lab definition TOML files
    Validate {
        /// Path to a lab definition file or directory
        #[arg(long)]
        lab: PathBuf,
    },

    /// Create a starter lab definition
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("oslab=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            lab,
            output,
            format,
        } => commands::run::execute(lab, output, format).await,
        Commands::Validate { lab } => commands::validate::execute(lab),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
