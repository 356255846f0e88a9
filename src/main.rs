//! Runs every fixture table of an HTML page and writes the annotated page.

use clap::Parser;
use fit::{Context, FixtureRegistry, RunConfig, run_document};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fitgoodies")]
#[command(version)]
#[command(about = "Run fixture tables in an HTML page and annotate the results", long_about = None)]
struct Cli {
    /// Input page (reads from stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// Output path for the annotated page (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop running tables after the first one that fails
    #[arg(long)]
    fail_fast: bool,
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let input = read_input(cli.input.as_ref())?;
    let registry = FixtureRegistry::with_defaults();
    let mut context = Context::new();
    let config = RunConfig {
        fail_fast: cli.fail_fast,
    };
    let report = run_document(&input, &registry, &mut context, &config);

    match &cli.output {
        Some(path) => fs::write(path, &report.html)?,
        None => io::stdout().write_all(report.html.as_bytes())?,
    }
    log::info!(target: "fitgoodies", "{} tables: {}", report.tables.len(), report.counts);

    Ok(if report.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
