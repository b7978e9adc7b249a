//! Error definitions.
//!
//! This module defines the failure modes of a simulation run. It provides:
//! 1. **Configuration Errors:** Missing or inconsistent geometry parameters, caught before any access.
//! 2. **Run Errors:** Trace I/O failures and cache allocation failure.
//!
//! A well-formed geometry and an in-range set index never fail, so the access
//! path itself has no error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems with the cache geometry or run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required option (`s`, `E`, `b` or the trace file) was not supplied.
    #[error("missing required command line argument: {0}")]
    MissingArgument(&'static str),

    /// `E` was zero; every set needs at least one line.
    #[error("associativity (E) must be at least 1")]
    ZeroAssociativity,

    /// `s + b` exceeds the 64-bit address width.
    #[error("set bits ({set_bits}) + block bits ({block_bits}) exceed the 64-bit address width")]
    AddressBitsOverflow {
        /// Requested set-index bits.
        set_bits: u32,
        /// Requested block-offset bits.
        block_bits: u32,
    },

    /// `2^s` sets cannot be counted in a `usize`.
    #[error("2^{0} sets cannot be addressed on this platform")]
    TooManySets(u32),

    /// A geometry file was not valid JSON or had the wrong shape.
    #[error("invalid geometry config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A geometry file could not be read.
    #[error("could not read config '{path}': {source}")]
    Io {
        /// The file that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Fatal errors while setting up or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace file could not be opened.
    #[error("could not open trace '{path}': {source}")]
    TraceOpen {
        /// The trace path given on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading from an already open trace failed.
    #[error("error reading trace: {0}")]
    TraceRead(#[from] io::Error),

    /// Writing the verbose trace failed.
    #[error("error writing output: {0}")]
    Output(#[source] io::Error),

    /// The cache storage could not be allocated.
    #[error("could not allocate cache storage for {sets} sets x {lines} lines")]
    Allocation {
        /// Requested number of sets.
        sets: usize,
        /// Requested lines per set.
        lines: usize,
    },
}

/// Convenience alias for fallible simulator operations.
pub type SimResult<T> = Result<T, SimError>;
