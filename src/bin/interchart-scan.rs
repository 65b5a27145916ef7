//! Scans a plugin monorepo and prints the ecosystem graph as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use interchart::{
    GraphAssembler, ScanConfig, ScanOutput, Scanner, TracingConfig, TracingLevel, init_tracing,
};

#[derive(Parser, Debug)]
#[command(name = "interchart-scan")]
#[command(about = "Build the dependency and overlap graph of a plugin monorepo")]
struct Args {
    /// Monorepo root
    #[arg(value_name = "ROOT", default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to ROOT/interchart.json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip the overlap pass
    #[arg(long)]
    no_overlaps: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: Args) -> interchart::Result<()> {
    let config = ScanConfig::resolve(&args.root, args.config.as_deref())?;
    let scanner = Scanner::new(&args.root, config)?;

    let graph = if args.no_overlaps {
        scanner.assemble_with(GraphAssembler::without_overlaps())
    } else {
        scanner.scan()?
    };

    println!("{}", ScanOutput::new(graph).to_json(!args.compact)?);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(&TracingConfig::new(TracingLevel::from_verbosity(args.verbose))) {
        eprintln!("{e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Scan failed");
            eprintln!("interchart-scan: {e}");
            ExitCode::FAILURE
        }
    }
}
