//! pcgeo CLI - Command-line interface
//!
//! This binary provides a command-line interface to the pcgeo library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::join::JoinArgs;
use commands::region::{BuildArgs, InvalidateArgs, RegionsArgs};

#[derive(Parser)]
#[command(name = "pcgeo")]
#[command(version = pcgeo::VERSION)]
#[command(about = "Resolve UK postcodes to polygons and join them to tabular metrics", long_about = None)]
struct Cli {
    /// Enable debug logging regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and persist a region's polygon set
    Build(BuildArgs),

    /// Join a metrics file to its region's polygons
    Join(JoinArgs),

    /// List regions with a persisted polygon set
    Regions(RegionsArgs),

    /// Delete a region's persisted set so it is rebuilt next time
    Invalidate(InvalidateArgs),

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => commands::region::run_build(args, cli.debug),
        Commands::Join(args) => commands::join::run(args, cli.debug),
        Commands::Regions(args) => commands::region::run_regions(args),
        Commands::Invalidate(args) => commands::region::run_invalidate(args, cli.debug),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
