//! Cache simulator CLI.
//!
//! This binary replays a valgrind memory trace against a set-associative cache
//! and prints the hit, miss and eviction counts. It performs:
//! 1. **Argument parsing:** `-s`, `-E`, `-b` geometry, `-t` trace, optional `-v` and a JSON `--config`.
//! 2. **Simulation:** Hands the merged configuration to `csim_core::sim::run`.
//! 3. **Reporting:** Prints `hits:<n> misses:<n> evictions:<n>` (or JSON with `--json`).
//!
//! Configuration errors print usage and exit with status 1 before any access is simulated.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use csim_core::common::{ConfigError, SimError};
use csim_core::config::{PartialGeometry, SimConfig};
use csim_core::sim;

#[derive(Parser, Debug)]
#[command(
    name = "csim",
    author,
    version,
    about = "Set-associative cache simulator with LRU replacement",
    long_about = "Replay a valgrind memory trace against a cache with 2^s sets of E lines and 2^b-byte blocks.\n\nExamples:\n  csim -s 4 -E 1 -b 4 -t traces/yi.trace\n  csim -v -s 8 -E 2 -b 4 -t traces/yi.trace\n  csim --config geometry.json -t traces/trans.trace"
)]
struct Cli {
    /// Number of set index bits (2^s sets).
    #[arg(short = 's', long = "set-bits", value_name = "num")]
    set_bits: Option<u32>,

    /// Number of lines per set (associativity).
    #[arg(short = 'E', long = "lines", value_name = "num")]
    lines_per_set: Option<usize>,

    /// Number of block offset bits (2^b-byte blocks).
    #[arg(short = 'b', long = "block-bits", value_name = "num")]
    block_bits: Option<u32>,

    /// Trace file.
    #[arg(short = 't', long = "trace", value_name = "file")]
    trace: Option<PathBuf>,

    /// Print the outcome of every trace record.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// JSON geometry file ({"s": .., "E": .., "b": ..}); flags override its values.
    #[arg(long, value_name = "file")]
    config: Option<PathBuf>,

    /// Print the summary as a JSON object.
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Geometry given on the command line, possibly incomplete.
    const fn flag_geometry(&self) -> PartialGeometry {
        PartialGeometry {
            set_bits: self.set_bits,
            lines_per_set: self.lines_per_set,
            block_bits: self.block_bits,
        }
    }

    /// Builds the run configuration: file geometry first, flags on top.
    fn sim_config(&self) -> Result<SimConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => PartialGeometry::from_json_file(path)?,
            None => PartialGeometry::default(),
        };
        SimConfig::new(
            base.merge(self.flag_geometry()),
            self.trace.clone(),
            self.verbose,
        )
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("csim: {e}");
            if matches!(e, SimError::Config(ConfigError::MissingArgument(_))) {
                eprintln!();
                eprintln!("{}", Cli::command().render_help());
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs the simulation and prints the summary.
fn execute(cli: &Cli) -> Result<(), SimError> {
    let config = cli.sim_config()?;
    tracing::debug!(?config, "resolved configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stats = sim::run(&config, &mut out)?;

    if cli.json {
        let json = stats
            .to_json()
            .map_err(|e| SimError::Output(io::Error::other(e)))?;
        writeln!(out, "{json}").map_err(SimError::Output)?;
    } else {
        writeln!(out, "{stats}").map_err(SimError::Output)?;
    }
    out.flush().map_err(SimError::Output)
}
