use regex::Regex;

use super::{TraceKey, TraceRecord};
use crate::error::{Error, Result};

/// Pulls a canonical key (and payload) out of one trace line.
///
/// Returning `None` means the line carries no record: headers, markers and
/// malformed lines are all skipped the same way.
pub trait KeyExtractor: std::fmt::Debug {
    fn extract(&self, line: &str) -> Option<(TraceKey, String)>;

    /// Build a record for the zero-based source line `index`.
    fn record(&self, index: usize, line: &str) -> Option<TraceRecord> {
        let (key, text) = self.extract(line)?;
        Some(TraceRecord {
            line: index,
            key,
            text,
        })
    }
}

/// One address per line, e.g. a Spike PC dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareAddress;

impl KeyExtractor for BareAddress {
    fn extract(&self, line: &str) -> Option<(TraceKey, String)> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some((TraceKey::parse(line)?, line.to_string()))
    }
}

/// Text between two delimiters, e.g. `pc=[0000000080000000]` in a
/// Verilator commit log:
///
/// `C0:  19 [1] pc=[0000000000010000] W[r10=0000000000010000][1] inst=[00000517] auipc a0, 0x0`
#[derive(Debug, Clone)]
pub struct Delimited {
    pub open: String,
    pub close: String,
}

impl Delimited {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// The `pc=[...]` field of a Verilator commit log.
    pub fn verilator_pc() -> Self {
        Self::new("pc=[", "]")
    }
}

impl KeyExtractor for Delimited {
    fn extract(&self, line: &str) -> Option<(TraceKey, String)> {
        let (_, rest) = line.split_once(self.open.as_str())?;
        let (field, _) = rest.split_once(self.close.as_str())?;
        Some((TraceKey::parse(field)?, line.trim().to_string()))
    }
}

/// First capture group of a regex, e.g. `[joint] 80000004`.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Reference joint numbers: `[joint] <hex>`.
    pub const JOINT: &'static str = r"\[joint\]\s*([0-9a-fA-F]+)";
    /// Decoder PC numbers: `pc: <hex>`.
    pub const PC: &'static str = r"pc:\s*([0-9a-fA-F]+)";

    /// Compile a pattern with at least one capture group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the regex does not compile and
    /// [`Error::MissingCaptureGroup`] if it has nothing to capture.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        if regex.captures_len() < 2 {
            return Err(Error::MissingCaptureGroup(pattern.to_string()));
        }
        Ok(Self { regex })
    }
}

impl KeyExtractor for Pattern {
    fn extract(&self, line: &str) -> Option<(TraceKey, String)> {
        let caps = self.regex.captures(line)?;
        let key = TraceKey::parse(caps.get(1)?.as_str())?;
        Some((key, line.trim().to_string()))
    }
}

/// Decoder dump lines of the form `<addr>: <instruction>`.
///
/// Lines without a colon, whose prefix is not a hex address (banners,
/// warnings), or containing the exclusion marker (timestamp packets in the
/// decoder output), carry no record.
#[derive(Debug, Clone, Default)]
pub struct AddressPrefixed {
    pub exclude: Option<String>,
}

impl AddressPrefixed {
    pub fn excluding(marker: impl Into<String>) -> Self {
        Self {
            exclude: Some(marker.into()),
        }
    }
}

impl KeyExtractor for AddressPrefixed {
    fn extract(&self, line: &str) -> Option<(TraceKey, String)> {
        if let Some(marker) = &self.exclude {
            if line.contains(marker.as_str()) {
                return None;
            }
        }
        let (address, payload) = line.split_once(':')?;
        Some((TraceKey::parse(address)?, payload.trim().to_string()))
    }
}

/// Extract records from every line, skipping the ones without a key.
pub fn parse_records<E: KeyExtractor + ?Sized>(
    lines: &[String],
    extractor: &E,
) -> Vec<TraceRecord> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| extractor.record(i, line))
        .collect()
}
