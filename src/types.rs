//! Common types and errors for rawfile decoding

use chrono::NaiveDateTime;
use std::fmt;
use thiserror::Error;

/// Number of samples shown by the `Display` impls before truncating.
const DISPLAY_SAMPLE_LIMIT: usize = 10;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for rawfile decoding operations
#[derive(Debug, Error)]
pub enum RawError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid date {value:?}: {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("truncated file: {0}")]
    Truncated(String),
}

pub type Result<T> = std::result::Result<T, RawError>;

// ============================================================================
// Data Structures
// ============================================================================

/// One named data series within a plot.
///
/// `data` stays empty until the plot's `Binary:` section has been decoded;
/// afterwards it holds exactly `n_points` samples for real-valued plots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiceVector {
    /// Signal name, e.g. `time` or `v(out)`
    pub name: String,
    /// Unit tag from the variable table, stored verbatim (e.g. `voltage`)
    pub unit: String,
    /// Decoded samples, in point order
    pub data: Vec<f64>,
}

impl SpiceVector {
    pub fn new(name: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            data: Vec::new(),
        }
    }

    /// Sample at point index `i`.
    ///
    /// Out-of-range access is a caller bug and panics.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        self.data[i]
    }

    /// Number of decoded samples
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for SpiceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.data[..self.data.len().min(DISPLAY_SAMPLE_LIMIT)];
        write!(f, "{} ({}) = {:?}", self.name, self.unit, shown)?;
        if self.data.len() > DISPLAY_SAMPLE_LIMIT {
            write!(f, " ...")?;
        }
        Ok(())
    }
}

/// One simulation result set: header metadata plus its decoded vectors.
///
/// Every simulation command (`.tran`, `.dc`, `.tf`, ...) produces one plot;
/// a rawfile concatenates any number of them. Interpretation is left to the
/// caller: a `.dc` operating-point plot simply reports `n_points == 1`.
#[derive(Debug, Clone, Default)]
pub struct SpicePlot {
    /// Circuit title from the `Title:` line
    pub title: String,
    /// Export timestamp from the `Date:` line
    pub date: NaiveDateTime,
    /// Analysis name from the `Plotname:` line
    pub name: String,
    /// Declared vector count; authoritative for the variable table
    pub n_variables: usize,
    /// Samples per vector
    pub n_points: usize,
    /// `real` vs `complex` flag; only real payloads are decoded
    pub real: bool,
    /// Alignment flag, informational only
    pub padded: bool,
    /// Vectors in declaration order; column order of the binary payload
    pub vectors: Vec<SpiceVector>,
}

impl SpicePlot {
    /// Vector at declaration index `i`. Panics if out of range.
    #[inline]
    pub fn vector(&self, i: usize) -> &SpiceVector {
        &self.vectors[i]
    }

    /// Look up a vector by signal name
    pub fn get(&self, name: &str) -> Option<&SpiceVector> {
        self.vectors.iter().find(|v| v.name == name)
    }
}

impl fmt::Display for SpicePlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} variables, {} points)",
            self.name, self.n_variables, self.n_points
        )?;
        for vector in &self.vectors {
            writeln!(f, "  {}", vector)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
