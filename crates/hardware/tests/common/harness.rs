use std::io::{Cursor, Write};

use csim_core::config::Geometry;
use csim_core::sim::{Simulator, run_trace};
use csim_core::stats::Stats;
use csim_core::trace::TraceReader;
use tempfile::NamedTempFile;

/// Routes `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("csim_core=trace")
        .try_init();
}

/// Builds a geometry, panicking on invalid parameters.
pub fn geometry(s: u32, e: usize, b: u32) -> Geometry {
    Geometry::new(s, e, b).unwrap()
}

/// Replays `trace` against a cold cache.
///
/// Returns the final counters and the verbose output.
pub fn run_str(geometry: Geometry, trace: &str) -> (Stats, String) {
    init_tracing();
    let mut sim = Simulator::new(geometry).unwrap();
    let mut reader = TraceReader::new(Cursor::new(trace.as_bytes()));
    let mut out: Vec<u8> = Vec::new();
    let stats = run_trace(&mut reader, &mut sim, Some(&mut out)).unwrap();
    (stats, String::from_utf8(out).unwrap())
}

/// Replays `trace` and returns only the counters.
pub fn stats_for(geometry: Geometry, trace: &str) -> Stats {
    run_str(geometry, trace).0
}

/// Writes `contents` to a fresh temporary file.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
