//! `sle`: reduce and solve a system of linear equations stored as JSON.
//!
//! ```text
//! sle system.json --format human
//! cat system.json | sle - --near-zero 1e-2
//! ```

mod config;

use crate::config::{NumericConfig, SystemFile};

use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde::Serialize;
use sle_geometry::errors::SleGeometryError;
use sle_geometry::sle::Solution;
use sle_geometry::system::LinearSystem;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sle", version, about = "Solve systems of linear equations exactly")]
struct Cli {
    /// JSON file with the system, or `-` to read standard input
    input: PathBuf,

    /// Significant digits used by every decimal operation
    #[arg(long = "precision", value_parser = clap::value_parser!(u32).range(1..))]
    precision: Option<u32>,

    /// Magnitude below which coefficients and constants count as zero
    #[arg(long = "near-zero")]
    near_zero: Option<f64>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error(transparent)]
    Geometry(#[from] SleGeometryError),
}

#[derive(Serialize)]
struct Report<'a> {
    system: &'a LinearSystem,
    rref: &'a LinearSystem,
    solution: &'a Solution,
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let to_error = |source| CliError::Read {
        path: path.display().to_string(),
        source,
    };

    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(to_error)?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(to_error)
}

fn render(report: &Report<'_>, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Human => format!(
            "{}\n\nReduced row-echelon form:\n{}\n\n{}",
            report.system, report.rref, report.solution
        ),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).map_err(SleGeometryError::from)?
        }
    })
}

fn run(cli: Cli) -> Result<String, CliError> {
    let text = read_input(&cli.input)?;
    let file = SystemFile::from_json(&text)?;
    let config = NumericConfig::resolve(&file, cli.precision, cli.near_zero);
    debug!("numeric configuration: {:?}", config);

    let system = file.into_system(&config)?;
    info!(
        "loaded {} equations in {} variables",
        system.len(),
        system.dimension()
    );

    let rref = system.rref();
    let solution = system.solve()?;
    render(
        &Report {
            system: &system,
            rref: &rref,
            solution: &solution,
        },
        cli.format,
    )
}

fn main() {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}
