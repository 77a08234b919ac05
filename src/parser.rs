//! Streaming decoder for ngspice/SPICE3 rawfiles
//!
//! A rawfile is a hybrid container: newline-terminated header lines
//! followed, per plot, by a packed little-endian float64 payload behind a
//! `Binary:` marker. The decoder makes a single forward pass, switching
//! between line reads and positional binary reads, and never seeks.

use crate::types::{RawError, Result, SpicePlot, SpiceVector};
use byteorder::{LittleEndian, ReadBytesExt};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::mem;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// asctime-style export timestamp, e.g. `Thu Sep 26 10:43:42 2019`.
/// `%e` accepts the space-padded day of month.
const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

// ============================================================================
// Header directives
// ============================================================================

/// The closed set of header keys, matched case-insensitively.
///
/// Anything else maps to `Unknown` and is skipped, so headers gain fields
/// without breaking older readers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Directive {
    Title,
    Date,
    Plotname,
    Flags,
    NumVariables,
    NumPoints,
    Variables,
    Binary,
    Unknown,
}

impl Directive {
    fn from_key(key: &str) -> Self {
        match key.to_ascii_lowercase().as_str() {
            "title" => Directive::Title,
            "date" => Directive::Date,
            "plotname" => Directive::Plotname,
            "flags" => Directive::Flags,
            "no. variables" => Directive::NumVariables,
            "no. points" => Directive::NumPoints,
            "variables" => Directive::Variables,
            "binary" => Directive::Binary,
            _ => Directive::Unknown,
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Decode every plot from a rawfile on disk.
///
/// # Example
/// ```rust,no_run
/// let plots = rawspice::read_raw("bridge.raw").unwrap();
/// for plot in &plots {
///     println!("{}: {} points", plot.name, plot.n_points);
/// }
/// ```
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<Vec<SpicePlot>> {
    let file = File::open(path.as_ref())?;
    decode(BufReader::new(file))
}

/// Decode every plot from an in-memory or streamed rawfile.
///
/// One forward pass; returns the plots in file order. End of input while
/// expecting a header line is normal termination. End of input inside a
/// variable table or a binary payload is a [`RawError::Truncated`] error,
/// and any error discards the plots decoded so far.
pub fn decode<R: BufRead>(mut reader: R) -> Result<Vec<SpicePlot>> {
    let mut plots = Vec::new();
    let mut plot = SpicePlot::default();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            // A trailing plot that never reached its Binary: marker is
            // incomplete and dropped.
            return Ok(plots);
        }

        let trimmed = line.trim();
        let (key, value) = match trimmed.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (trimmed, ""),
        };

        match Directive::from_key(key) {
            Directive::Title => plot.title = value.to_string(),
            Directive::Date => {
                plot.date =
                    NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|source| {
                        RawError::Date {
                            value: value.to_string(),
                            source,
                        }
                    })?;
            }
            Directive::Plotname => plot.name = value.to_string(),
            Directive::Flags => parse_flags(value, &mut plot),
            Directive::NumVariables => plot.n_variables = parse_count(key, value)?,
            Directive::NumPoints => plot.n_points = parse_count(key, value)?,
            Directive::Variables => read_variable_table(&mut reader, &mut plot)?,
            Directive::Binary => {
                read_binary_payload(&mut reader, &mut plot)?;
                debug!(
                    plot = %plot.name,
                    variables = plot.n_variables,
                    points = plot.n_points,
                    real = plot.real,
                    "plot sealed"
                );
                plots.push(mem::take(&mut plot));
            }
            Directive::Unknown => {}
        }
    }
}

// ============================================================================
// Header sections
// ============================================================================

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value.parse().map_err(|_| {
        RawError::Parse(format!(
            "{}: expected a non-negative integer, got {:?}",
            key, value
        ))
    })
}

fn parse_flags(value: &str, plot: &mut SpicePlot) {
    for flag in value.split_whitespace() {
        match flag.to_ascii_lowercase().as_str() {
            "real" => plot.real = true,
            "complex" => plot.real = false,
            "padded" => plot.padded = true,
            "unpadded" => plot.padded = false,
            _ => {}
        }
    }
}

/// Consume exactly `n_variables` lines of the form `<index> <name> <unit>`.
///
/// The leading index is positional bookkeeping only; declaration order
/// defines the column order of the binary payload.
fn read_variable_table<R: BufRead>(reader: &mut R, plot: &mut SpicePlot) -> Result<()> {
    let mut line = String::new();
    for i in 0..plot.n_variables {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(RawError::Truncated(format!(
                "end of file inside variable table ({} of {} entries read)",
                i, plot.n_variables
            )));
        }

        let mut fields = line.split_whitespace();
        let _index = fields.next();
        match (fields.next(), fields.next()) {
            (Some(name), Some(unit)) => plot.vectors.push(SpiceVector::new(name, unit)),
            _ => {
                return Err(RawError::Parse(format!(
                    "variable line {:?} has too few fields",
                    line.trim()
                )))
            }
        }
    }
    Ok(())
}

// ============================================================================
// Binary payload
// ============================================================================

/// Decode the payload behind a `Binary:` marker.
///
/// Values are laid out row-major by point: for each point, one float64 per
/// vector in declaration order. Complex plots carry a doubled interleaved
/// real/imag region; it is consumed but not decoded so that any following
/// plot in the same file stays aligned.
fn read_binary_payload<R: BufRead>(reader: &mut R, plot: &mut SpicePlot) -> Result<()> {
    if plot.vectors.len() != plot.n_variables {
        return Err(RawError::Parse(format!(
            "binary section reached with {} of {} declared variables",
            plot.vectors.len(),
            plot.n_variables
        )));
    }

    if !plot.real {
        warn!(
            plot = %plot.name,
            "complex payload is not decoded; skipping it to keep the stream aligned"
        );
        skip_values(reader, 2 * plot.n_variables * plot.n_points)?;
        return Ok(());
    }

    for vector in &mut plot.vectors {
        vector.data = vec![0.0; plot.n_points];
    }
    for point in 0..plot.n_points {
        for var in 0..plot.n_variables {
            let value = reader
                .read_f64::<LittleEndian>()
                .map_err(map_payload_error)?;
            plot.vectors[var].data[point] = value;
        }
    }
    Ok(())
}

fn skip_values<R: BufRead>(reader: &mut R, count: usize) -> Result<()> {
    for _ in 0..count {
        reader
            .read_f64::<LittleEndian>()
            .map_err(map_payload_error)?;
    }
    Ok(())
}

fn map_payload_error(err: io::Error) -> RawError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        RawError::Truncated("end of file inside binary payload".into())
    } else {
        RawError::Io(err)
    }
}

// ============================================================================
// Tests
// ============================================================================
