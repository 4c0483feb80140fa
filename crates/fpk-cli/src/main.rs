mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fpk-compose-builder",
    about = "Build fnOS FPK packages from docker-compose files"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an FPK package from a directory containing compose.yaml and an optional icon
    Build {
        /// Input directory containing compose.yaml and icon.png
        #[arg(long, short = 'i', default_value = ".")]
        input: PathBuf,
        /// Output directory for the generated FPK structure [default: ./dist]
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Enable verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Skip the fnpack step and only generate the directory structure
        #[arg(long)]
        skip_fnpack: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Build { verbose, .. } => *verbose,
    };
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build {
            input,
            output,
            verbose: _,
            skip_fnpack,
        } => commands::build(&input, output.as_deref(), skip_fnpack)?,
    }

    Ok(())
}
