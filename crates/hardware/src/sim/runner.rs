//! Trace-driven simulation loop.
//!
//! This module replays a memory trace through a [`Simulator`]. It performs:
//! 1. **Trace opening:** Opens the trace file named in the run configuration.
//! 2. **Replay:** Feeds records in order, one at a time, until the trace ends.
//! 3. **Verbose output:** Optionally writes one line per data record with its outcomes.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use tracing::{info, warn};

use super::Simulator;
use crate::common::{SimError, SimResult};
use crate::config::SimConfig;
use crate::stats::Stats;
use crate::trace::TraceReader;

/// Replays every record of `reader` through `sim`.
///
/// When `verbose` is set, each data record is echoed as
/// `<op> <addr>,<size> <outcome>...`, e.g. `M 20,1 miss hit`.
///
/// # Errors
///
/// Returns [`SimError::TraceRead`] if reading the trace fails part way, or
/// [`SimError::Output`] if the verbose sink cannot be written.
///
/// # Returns
///
/// The counters accumulated by `sim` once the trace is exhausted.
pub fn run_trace<R, W>(
    reader: &mut TraceReader<R>,
    sim: &mut Simulator,
    mut verbose: Option<&mut W>,
) -> SimResult<Stats>
where
    R: BufRead,
    W: Write + ?Sized,
{
    for record in &mut *reader {
        let record = record?;
        let outcome = sim.apply(&record);

        if let Some(out) = verbose.as_deref_mut() {
            if outcome.is_empty() {
                continue;
            }
            write!(out, "{record}").map_err(SimError::Output)?;
            for access in outcome.iter() {
                write!(out, " {access}").map_err(SimError::Output)?;
            }
            writeln!(out).map_err(SimError::Output)?;
        }
    }

    if reader.skipped() > 0 {
        warn!(lines = reader.skipped(), "skipped malformed trace lines");
    }
    Ok(sim.stats)
}

/// Runs a whole simulation from a run configuration.
///
/// Builds a cold cache for `config.geometry`, opens `config.trace_file` and
/// replays it. Verbose lines go to `out` when `config.verbose` is set.
///
/// # Errors
///
/// Returns [`SimError::TraceOpen`] if the trace cannot be opened, an
/// allocation error if the cache cannot be built, or any error from
/// [`run_trace`]. No partial counters are returned on error.
pub fn run<W: Write + ?Sized>(config: &SimConfig, out: &mut W) -> SimResult<Stats> {
    let mut sim = Simulator::new(config.geometry)?;

    let file = File::open(&config.trace_file).map_err(|source| SimError::TraceOpen {
        path: config.trace_file.clone(),
        source,
    })?;
    let mut reader = TraceReader::new(BufReader::new(file));

    info!(
        trace = %config.trace_file.display(),
        s = config.geometry.set_bits,
        e = config.geometry.lines_per_set,
        b = config.geometry.block_bits,
        "starting simulation"
    );

    let verbose = if config.verbose { Some(out) } else { None };
    let stats = run_trace(&mut reader, &mut sim, verbose)?;

    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        "simulation finished"
    );
    Ok(stats)
}
