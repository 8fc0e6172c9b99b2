//! tracediff - find where a decoder trace leaves its reference
//!
//! Compares an execution trace from a golden model (Spike, a Verilator
//! commit log, a joint-number log) against the trace reconstructed by a
//! hardware trace decoder, and reports the first position where they
//! disagree.
//!
//! # Example
//!
//! ```
//! use tracediff::{DiffConfig, TraceFile};
//!
//! let reference = TraceFile::from_lines("spike.log", ["10000", "10004", "10008"]);
//! let dump = TraceFile::from_lines("trace.dump", ["0x10000: auipc", "0x10004: addi"]);
//!
//! let outcome = DiffConfig::spike().run(&reference, &dump).unwrap();
//! let div = outcome.comparison.divergence.unwrap();
//! assert_eq!(div.key().unwrap().to_string(), "0x10008");
//! assert_eq!(outcome.comparison.matched, 2);
//! ```

pub mod diff;
pub mod error;
pub mod report;
pub mod trace;

pub use diff::{DiffConfig, Outcome, TraceFile, Tool};
pub use error::{Error, Result};
pub use report::ReportFormat;
pub use trace::{
    Alignment, Comparison, Divergence, DivergenceKind, Driver, MatchRule, TraceKey, TraceRecord,
};
