//! Address trace parsing.
//!
//! This module reads the plain-text traces consumed by the driver. It accepts:
//! 1. **Operations:** One per line, `<op> <addr>` with `op` in `R`, `W`, `B` (write-back),
//!    `I` (invalidate).
//! 2. **Addresses:** Hexadecimal with a `0x` prefix, or decimal.
//! 3. **Comments:** Blank lines and anything after `#` are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::{Addr, FillRequest, TraceError};

/// One trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOp {
    /// Demand read.
    Read(Addr),
    /// Store.
    Write(Addr),
    /// Write-back from an upper level.
    Writeback(Addr),
    /// Coherence invalidation.
    Invalidate(Addr),
}

impl TraceOp {
    /// Address the record refers to.
    pub const fn addr(&self) -> Addr {
        match *self {
            Self::Read(a) | Self::Write(a) | Self::Writeback(a) | Self::Invalidate(a) => a,
        }
    }

    /// Fill request for an access record, `None` for invalidations.
    pub const fn fill_request(&self) -> Option<FillRequest> {
        match *self {
            Self::Read(a) => Some(FillRequest::read(a)),
            Self::Write(a) => Some(FillRequest::write(a)),
            Self::Writeback(a) => Some(FillRequest::writeback(a)),
            Self::Invalidate(_) => None,
        }
    }
}

fn parse_addr(text: &str) -> Option<Addr> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => Addr::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => text.parse().ok(),
    }
}

/// Parses one trace line.
///
/// # Arguments
///
/// * `line` - The raw line.
/// * `number` - One-based line number, for error reporting.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] for unknown operations, missing or malformed
/// addresses, and trailing fields.
pub fn parse_line(line: &str, number: usize) -> Result<Option<TraceOp>, TraceError> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }
    let err = |reason: String| TraceError::Parse {
        line: number,
        reason,
    };

    let mut fields = content.split_whitespace();
    let op = fields.next().unwrap_or_default();
    let addr_text = fields
        .next()
        .ok_or_else(|| err(format!("missing address after '{op}'")))?;
    if let Some(extra) = fields.next() {
        return Err(err(format!("unexpected field '{extra}'")));
    }
    let addr = parse_addr(addr_text).ok_or_else(|| err(format!("bad address '{addr_text}'")))?;

    let record = match op.to_ascii_uppercase().as_str() {
        "R" => TraceOp::Read(addr),
        "W" => TraceOp::Write(addr),
        "B" | "WB" => TraceOp::Writeback(addr),
        "I" => TraceOp::Invalidate(addr),
        _ => return Err(err(format!("unknown operation '{op}'"))),
    };
    Ok(Some(record))
}

/// Parses a whole trace.
///
/// # Errors
///
/// Returns the first parse or I/O error.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TraceOp>, TraceError> {
    let mut ops = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(op) = parse_line(&line?, i + 1)? {
            ops.push(op);
        }
    }
    Ok(ops)
}

/// Reads and parses the trace file at `path`.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be opened or read, or the first
/// parse error.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceOp>, TraceError> {
    let file = File::open(path)?;
    parse_trace(BufReader::new(file))
}
