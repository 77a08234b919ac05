//! # rawspice
//!
//! A decoder for ngspice/SPICE3 binary rawfiles.
//!
//! A rawfile is what the simulator's raw-data export writes: one or more
//! plots (one per simulation command), each a text header followed by a
//! packed little-endian float64 payload. This crate makes a single
//! streaming pass over the file and returns every plot with its named
//! vectors fully decoded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! let plots = rawspice::read_raw("bridge.raw").unwrap();
//!
//! for plot in &plots {
//!     println!("{} - {}", plot.name, plot.title);
//!
//!     // Access by name
//!     if let Some(time) = plot.get("time") {
//!         println!("time points: {}", time.len());
//!     }
//!
//!     // Access by declaration index (column order of the payload)
//!     for vector in &plot.vectors {
//!         println!("{}", vector);
//!     }
//! }
//! ```
//!
//! ## Scope
//!
//! Decode-only: there is no writer and no query layer. Complex-valued
//! plots (`Flags: complex`) are recognized and their payload is skipped so
//! that later plots in the same file decode correctly, but their samples
//! are not populated.
//!
//! ## Enabling Logging
//!
//! This library uses `tracing` for structured logging. To see log output,
//! initialize a tracing subscriber in your application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//!
//! let plots = rawspice::read_raw("bridge.raw").unwrap();
//! ```

mod parser;
mod types;

pub use parser::{decode, read_raw};
pub use types::{RawError, Result, SpicePlot, SpiceVector};
