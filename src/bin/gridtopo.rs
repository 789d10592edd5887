use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gridtopo::{analyze, build_network, debug, load_network_dir};
use std::path::PathBuf;

/// Distribution network topology builder.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the topology from a directory of CSV tables.
    Build(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Directory with buses.csv, cables.csv, lines.csv and optionally
    /// transformers.csv, loads.csv.
    #[arg(required = true)]
    input: PathBuf,

    /// Reduce the multigraph to a simple graph, keeping the highest-capacity
    /// branch per bus pair.
    #[arg(long, default_value_t = false)]
    simple: bool,

    /// List every branch with its reduced parameters.
    #[arg(long, default_value_t = false)]
    list: bool,
}

fn main() {
    env_logger::Builder::from_default_env()
        .format_level(false)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(_) => {
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let Commands::Build(args) = &cli.command;

    let records = load_network_dir(&args.input)?;
    let (network, build_report) = build_network(&records)?;

    let network = if args.simple {
        network.to_simple()
    } else {
        network
    };

    println!("{}", network.stats());
    if !build_report.is_clean() {
        print!("{}", build_report);
    }

    let topology_report = analyze(&network);
    if !topology_report.is_clean() {
        print!("{}", topology_report);
    }

    if args.list {
        for br in network.branches() {
            println!("{}", debug::format_branch(&network, br));
        }
    }

    Ok(())
}
