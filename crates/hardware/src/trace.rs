//! Memory trace reader.
//!
//! Traces are text, one record per line, as written by valgrind's lackey tool:
//!
//! ```text
//! I 0400d7d4,8
//!  L 7ff0005b8,8
//!  S 7ff0005b0,8
//!  M 0421c7f0,4
//! ```
//!
//! Data records are indented by one space, instruction fetches are not. The
//! address is hexadecimal without a `0x` prefix and the size is decimal. Lines
//! that do not follow this shape are skipped without raising an error.

use std::fmt;
use std::io::BufRead;

use tracing::debug;

use crate::common::Address;

/// Widest hexadecimal address accepted (64 bits).
const MAX_HEX_DIGITS: usize = 16;

/// Kind of memory operation in a trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Instruction fetch (`I`); never reaches the data cache.
    Instruction,
    /// Data load (`L`).
    Load,
    /// Data store (`S`).
    Store,
    /// Load followed by a store to the same address (`M`).
    Modify,
}

impl Operation {
    /// Parses the single-letter trace code.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::Instruction),
            'L' => Some(Self::Load),
            'S' => Some(Self::Store),
            'M' => Some(Self::Modify),
            _ => None,
        }
    }

    /// The single-letter trace code.
    pub const fn as_char(self) -> char {
        match self {
            Self::Instruction => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
        }
    }

    /// Number of cache accesses the operation performs.
    pub const fn accesses(self) -> usize {
        match self {
            Self::Instruction => 0,
            Self::Load | Self::Store => 1,
            Self::Modify => 2,
        }
    }
}

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Operation kind.
    pub op: Operation,
    /// Byte address accessed.
    pub address: Address,
    /// Access size in bytes. Carried through for reporting only.
    pub size: u32,
}

impl fmt::Display for TraceRecord {
    /// Formats the record the way it appears in a trace, without indentation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.op.as_char(), self.address, self.size)
    }
}

/// Parses one trace line.
///
/// Accepts optional leading whitespace, an operation letter, whitespace, a
/// hex address, a comma and a decimal size. Trailing whitespace is ignored.
///
/// # Returns
///
/// `None` for blank or malformed lines.
pub fn parse_line(line: &str) -> Option<TraceRecord> {
    let line = line.trim();
    let mut chars = line.chars();
    let op = Operation::from_char(chars.next()?)?;

    let rest = chars.as_str();
    let body = rest.trim_start();
    if body.len() == rest.len() {
        // No separator between the letter and the address.
        return None;
    }

    let (addr, size) = body.split_once(',')?;
    if addr.is_empty() || addr.len() > MAX_HEX_DIGITS || !addr.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(TraceRecord {
        op,
        address: Address::new(u64::from_str_radix(addr, 16).ok()?),
        size: size.parse().ok()?,
    })
}

/// Streams [`TraceRecord`]s from a buffered reader.
///
/// Malformed lines are skipped and logged at `debug`; read errors end the
/// stream with an `Err` item.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    buf: String,
    line_no: u64,
    skipped: u64,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Number of non-blank lines skipped as malformed so far.
    pub const fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = std::io::Result<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            self.line_no += 1;

            if let Some(record) = parse_line(&self.buf) {
                return Some(Ok(record));
            }
            if !self.buf.trim().is_empty() {
                self.skipped += 1;
                debug!(line = self.line_no, text = self.buf.trim_end(), "skipping malformed trace line");
            }
        }
    }
}
