//! Configuration system for the cache simulator.
//!
//! This module defines the cache geometry and the run configuration. It provides:
//! 1. **Defaults:** Baseline geometry used by `Geometry::default()`.
//! 2. **Geometry:** Validated `s`, `E`, `b` parameters and the derived set count and block size.
//! 3. **Layering:** A partial geometry that can come from a JSON file and be overridden by CLI flags.
//!
//! The geometry is immutable once built; the simulator only ever borrows it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::ConfigError;

/// Default geometry constants.
///
/// These values match the first usage example: 16 sets, direct-mapped, 16-byte blocks.
mod defaults {
    /// Default number of set-index bits (16 sets).
    pub const SET_BITS: u32 = 4;

    /// Default associativity (direct-mapped).
    pub const LINES_PER_SET: usize = 1;

    /// Default number of block-offset bits (16-byte blocks).
    pub const BLOCK_BITS: u32 = 4;
}

/// Cache geometry: `s` set-index bits, `E` lines per set, `b` block-offset bits.
///
/// Construct through [`Geometry::new`] or [`PartialGeometry::build`] so the
/// invariants below always hold:
/// - `lines_per_set >= 1`
/// - `set_bits + block_bits <= 64`
/// - `2^set_bits` fits in a `usize`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Number of set-index bits (`s`); there are `2^s` sets.
    pub set_bits: u32,
    /// Associativity (`E`); lines per set.
    pub lines_per_set: usize,
    /// Number of block-offset bits (`b`); blocks are `2^b` bytes.
    pub block_bits: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            set_bits: defaults::SET_BITS,
            lines_per_set: defaults::LINES_PER_SET,
            block_bits: defaults::BLOCK_BITS,
        }
    }
}

impl Geometry {
    /// Creates a validated geometry.
    ///
    /// # Arguments
    ///
    /// * `set_bits` - `s`, the number of set-index bits.
    /// * `lines_per_set` - `E`, the associativity.
    /// * `block_bits` - `b`, the number of block-offset bits.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `E == 0`, `s + b > 64`, or `2^s` overflows `usize`.
    pub fn new(set_bits: u32, lines_per_set: usize, block_bits: u32) -> Result<Self, ConfigError> {
        let geometry = Self {
            set_bits,
            lines_per_set,
            block_bits,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Checks the geometry invariants.
    ///
    /// # Errors
    ///
    /// See [`Geometry::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lines_per_set == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if u64::from(self.set_bits) + u64::from(self.block_bits) > u64::from(u64::BITS) {
            return Err(ConfigError::AddressBitsOverflow {
                set_bits: self.set_bits,
                block_bits: self.block_bits,
            });
        }
        if self.set_bits >= usize::BITS {
            return Err(ConfigError::TooManySets(self.set_bits));
        }
        Ok(())
    }

    /// Number of sets, `S = 2^s`.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        1usize << self.set_bits
    }

    /// Block size in bytes, `B = 2^b`. Informational only.
    ///
    /// Saturates at `u64::MAX` when `b == 64`.
    #[inline]
    pub const fn block_size(&self) -> u64 {
        if self.block_bits >= u64::BITS {
            u64::MAX
        } else {
            1u64 << self.block_bits
        }
    }

    /// Total number of lines, `S * E`, or `None` on overflow.
    #[inline]
    pub const fn total_lines(&self) -> Option<usize> {
        self.num_sets().checked_mul(self.lines_per_set)
    }

    /// Loads and validates a geometry from a JSON string.
    ///
    /// Accepts either long keys (`set_bits`, `lines_per_set`, `block_bits`)
    /// or the short ones (`s`, `E`, `b`). All three must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON, [`ConfigError::MissingArgument`]
    /// if a field is absent, or a validation error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        PartialGeometry::from_json_str(json)?.build()
    }

    /// Loads and validates a geometry from a JSON file.
    ///
    /// # Errors
    ///
    /// As [`Geometry::from_json_str`], plus [`ConfigError::Io`] if the file cannot be read.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        PartialGeometry::from_json_file(path)?.build()
    }
}

/// A geometry whose fields may still be missing.
///
/// Used to layer a JSON config file under command line flags: load the file,
/// [`merge`](PartialGeometry::merge) the flags on top, then [`build`](PartialGeometry::build).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialGeometry {
    /// Set-index bits (`s`).
    #[serde(default, alias = "s")]
    pub set_bits: Option<u32>,
    /// Lines per set (`E`).
    #[serde(default, alias = "E")]
    pub lines_per_set: Option<usize>,
    /// Block-offset bits (`b`).
    #[serde(default, alias = "b")]
    pub block_bits: Option<u32>,
}

impl PartialGeometry {
    /// Parses a partial geometry from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or unknown keys.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a partial geometry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, else as [`PartialGeometry::from_json_str`].
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Overlays `other` on `self`; fields set in `other` win.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            set_bits: match other.set_bits {
                Some(v) => Some(v),
                None => self.set_bits,
            },
            lines_per_set: match other.lines_per_set {
                Some(v) => Some(v),
                None => self.lines_per_set,
            },
            block_bits: match other.block_bits {
                Some(v) => Some(v),
                None => self.block_bits,
            },
        }
    }

    /// Turns the partial geometry into a validated [`Geometry`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingArgument`] naming the first absent field, or a validation error.
    pub fn build(self) -> Result<Geometry, ConfigError> {
        let set_bits = self.set_bits.ok_or(ConfigError::MissingArgument("-s"))?;
        let lines_per_set = self.lines_per_set.ok_or(ConfigError::MissingArgument("-E"))?;
        let block_bits = self.block_bits.ok_or(ConfigError::MissingArgument("-b"))?;
        Geometry::new(set_bits, lines_per_set, block_bits)
    }
}

/// Everything a single simulation run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Cache geometry.
    pub geometry: Geometry,
    /// Path to the memory trace to replay.
    pub trace_file: PathBuf,
    /// Print one line per trace record with its outcomes.
    pub verbose: bool,
}

impl SimConfig {
    /// Assembles a run configuration from a partial geometry and an optional trace path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingArgument`] if a geometry field or the trace path is absent.
    pub fn new(
        geometry: PartialGeometry,
        trace_file: Option<PathBuf>,
        verbose: bool,
    ) -> Result<Self, ConfigError> {
        let geometry = geometry.build()?;
        let trace_file = trace_file.ok_or(ConfigError::MissingArgument("-t"))?;
        Ok(Self {
            geometry,
            trace_file,
            verbose,
        })
    }
}
