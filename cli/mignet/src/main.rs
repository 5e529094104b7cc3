//! mignet CLI: builds the binary migration networks read by the simulator.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use mignet_bin::BuildInfo;

use commands::build::BuildOptions;
use config::resolve_config;

#[derive(Parser)]
#[command(name = "mignet", version, about = "Spatial migration-network builder")]
struct Cli {
    /// Configuration file (default: mignet.toml in this or a parent directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a migration binary and its JSON header
    Build {
        /// Demographics JSON file defining the node roster
        #[arg(long, short = 'd')]
        demographics: PathBuf,
        /// Rate file: one `source destination rate` link per line
        #[arg(long, short = 'r')]
        rates: PathBuf,
        /// Binary output path
        #[arg(long, short = 'o')]
        output: PathBuf,
        /// Migration type: LOCAL, REGIONAL, SEA, or AIR (any unambiguous prefix)
        #[arg(long, short = 't')]
        migration_type: Option<String>,
        /// Header output path (default: <output>.json)
        #[arg(long)]
        header: Option<PathBuf>,
        /// Author recorded in the header
        #[arg(long)]
        author: Option<String>,
    },
    /// Decode a migration binary through its header
    Inspect {
        /// Binary file to read
        binary: PathBuf,
        /// Header file (default: <binary>.json)
        #[arg(long)]
        header: Option<PathBuf>,
        /// Grid resolution in arc-seconds, to print node coordinates
        #[arg(long)]
        resolution: Option<u32>,
        /// Show only this node
        #[arg(long)]
        node: Option<u32>,
    },
    /// Convert between node ids and coordinates
    Locate {
        /// Node id to place on the grid
        #[arg(long)]
        id: Option<u32>,
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Grid resolution in arc-seconds (30 or 150)
        #[arg(long)]
        resolution: Option<u32>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = resolve_config(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Build {
            demographics,
            rates,
            output,
            migration_type,
            header,
            author,
        } => {
            let options = BuildOptions {
                demographics,
                rates,
                output,
                header,
                migration_type: config.migration_type(migration_type.as_deref())?,
                build_info: BuildInfo {
                    tool: config.tool(),
                    author: config.author(author.as_deref()),
                    date_created: commands::build::utc_now(),
                },
            };
            commands::build::run(&options)
        }

        Commands::Inspect {
            binary,
            header,
            resolution,
            node,
        } => commands::inspect::run(
            &binary,
            header.as_deref(),
            config.resolution(resolution)?,
            node,
        ),

        Commands::Locate {
            id,
            lat,
            lon,
            resolution,
        } => commands::locate::run(id, lat, lon, config.resolution(resolution)?),
    }
}
