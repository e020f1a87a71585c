use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tsbind")]
#[command(about = "Collect TypeScript declaration surfaces into a binding model", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect a declaration snapshot into a program model (JSON)
    Collect {
        /// Recorded checker answers (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Collector config (TOML); defaults to every file in the snapshot
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Package name (defaults to the snapshot file name)
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Print the resolved overload names of every container
    Overloads {
        /// Recorded checker answers (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Collector config (TOML); defaults to every file in the snapshot
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Collect {
            snapshot,
            config,
            output,
            package,
        } => {
            tsbind::run_collect(&snapshot, config.as_deref(), &output, package.as_deref())?;
            Ok(())
        }
        Commands::Overloads { snapshot, config } => {
            let report = tsbind::run_overloads(&snapshot, config.as_deref())?;
            print!("{}", report);
            Ok(())
        }
    }
}
