use std::path::PathBuf;

use thiserror::Error;

use crate::trace::TraceKey;

/// Trace comparison errors.
///
/// Every variant is fatal for the invocation that raised it. A divergence
/// between the two traces is a normal result and never shows up here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no line containing {marker:?} in {}", .path.display())]
    StartMarkerNotFound { marker: String, path: PathBuf },
    #[error(
        "offset {offset} from trace start at line {} is outside the reference ({lines} lines)",
        .start + 1
    )]
    OffsetOutOfRange {
        offset: i64,
        /// Zero-based line of the start marker.
        start: usize,
        lines: usize,
    },
    #[error(
        "no alignment found: {target} does not appear in {} at or after line {}",
        .path.display(),
        .from + 1
    )]
    AlignmentNotFound {
        target: TraceKey,
        /// Zero-based line the search started from.
        from: usize,
        path: PathBuf,
    },
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("pattern {0:?} has no capture group")]
    MissingCaptureGroup(String),
}

pub type Result<T> = std::result::Result<T, Error>;
