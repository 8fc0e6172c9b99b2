//! The align-compare pipeline shared by every trace format.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::trace::{
    self, AddressPrefixed, Alignment, BareAddress, Comparison, Delimited, Driver, KeyExtractor,
    MatchRule, Pattern, TraceKey, TraceRecord,
};

/// Marker line that precedes the first commit in a Verilator log.
pub const VERILATOR_START_MARKER: &str = "Writing";
/// Decoder dump lines carrying this text are timing packets, not addresses.
pub const TIMESTAMP_MARKER: &str = "timestamp";

/// Which reference/decoder pairing a comparison is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Spike PC list vs. address-keyed decoder dump.
    Spike,
    /// Verilator commit log vs. timestamped decoder dump.
    Verilator,
    /// Joint-number log vs. PC-number log.
    Joints,
}

impl Tool {
    /// What a single key is called in reports.
    pub fn unit(self) -> &'static str {
        match self {
            Tool::Spike | Tool::Verilator => "address",
            Tool::Joints => "joint",
        }
    }

    /// Plural of [`Tool::unit`].
    pub fn units(self) -> &'static str {
        match self {
            Tool::Spike | Tool::Verilator => "addresses",
            Tool::Joints => "joints",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Spike => write!(f, "spike"),
            Tool::Verilator => write!(f, "verilator"),
            Tool::Joints => write!(f, "joints"),
        }
    }
}

/// A trace file read into memory.
#[derive(Debug, Clone)]
pub struct TraceFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl TraceFile {
    /// Read a trace from disk (`.zst` files are decompressed).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            lines: trace::read_lines(path)?,
        })
    }

    /// Wrap lines that are already in memory; `path` is only used in messages.
    pub fn from_lines<S: Into<String>>(
        path: impl Into<PathBuf>,
        lines: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            path: path.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// How to parse, align and compare one reference/candidate pair.
#[derive(Debug)]
pub struct DiffConfig {
    pub tool: Tool,
    /// Key extraction for the reference trace.
    pub reference: Box<dyn KeyExtractor>,
    /// Key extraction for the candidate trace.
    pub candidate: Box<dyn KeyExtractor>,
    /// Line marking the start of the reference trace, if the format has one.
    pub start_marker: Option<String>,
    pub alignment: Alignment,
    pub rule: MatchRule,
    pub driver: Driver,
}

impl DiffConfig {
    /// Spike PC list against an `<addr>: <insn>` decoder dump.
    pub fn spike() -> Self {
        Self {
            tool: Tool::Spike,
            reference: Box::new(BareAddress),
            candidate: Box::new(AddressPrefixed::default()),
            start_marker: None,
            alignment: Alignment::Membership,
            rule: MatchRule::Exact,
            driver: Driver::Reference,
        }
    }

    /// Verilator commit log against a timestamped decoder dump.
    ///
    /// Without an explicit offset the start is found by searching for the
    /// decoder's first address.
    pub fn verilator(offset: Option<i64>) -> Self {
        Self {
            tool: Tool::Verilator,
            reference: Box::new(Delimited::verilator_pc()),
            candidate: Box::new(AddressPrefixed::excluding(TIMESTAMP_MARKER)),
            start_marker: Some(VERILATOR_START_MARKER.to_string()),
            alignment: offset.map_or(Alignment::TargetSearch, Alignment::Offset),
            rule: MatchRule::Contains,
            driver: Driver::Candidate,
        }
    }

    /// Joint-number log against a PC-number log, using the default patterns.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in patterns; kept fallible for symmetry
    /// with [`DiffConfig::joints_with_patterns`].
    pub fn joints() -> Result<Self> {
        Self::joints_with_patterns(Pattern::JOINT, Pattern::PC)
    }

    /// Joint-number comparison with custom reference/candidate regexes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] or [`Error::MissingCaptureGroup`]
    /// for a bad pattern.
    pub fn joints_with_patterns(reference: &str, candidate: &str) -> Result<Self> {
        Ok(Self {
            tool: Tool::Joints,
            reference: Box::new(Pattern::new(reference)?),
            candidate: Box::new(Pattern::new(candidate)?),
            start_marker: None,
            alignment: Alignment::Sequential,
            rule: MatchRule::Exact,
            driver: Driver::Reference,
        })
    }

    #[must_use]
    pub fn with_rule(mut self, rule: MatchRule) -> Self {
        self.rule = rule;
        self
    }

    #[must_use]
    pub fn with_start_marker(mut self, marker: impl Into<String>) -> Self {
        self.start_marker = Some(marker.into());
        self
    }

    #[must_use]
    pub fn with_candidate(mut self, candidate: impl KeyExtractor + 'static) -> Self {
        self.candidate = Box::new(candidate);
        self
    }

    /// Parse both traces, align them and find the first divergence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StartMarkerNotFound`], [`Error::OffsetOutOfRange`] or
    /// [`Error::AlignmentNotFound`] when no comparison range can be
    /// established. No partial result is produced in that case.
    pub fn run(&self, reference: &TraceFile, candidate: &TraceFile) -> Result<Outcome> {
        let candidate_records = trace::parse_records(&candidate.lines, self.candidate.as_ref());
        debug!(
            path = %candidate.path.display(),
            records = candidate_records.len(),
            "parsed candidate trace"
        );

        let start = match &self.start_marker {
            Some(marker) => {
                let start = trace::find_start_marker(&reference.lines, marker).ok_or_else(|| {
                    Error::StartMarkerNotFound {
                        marker: marker.clone(),
                        path: reference.path.clone(),
                    }
                })?;
                debug!(line = start, marker = %marker, "found start of trace");
                Some(start)
            }
            None => None,
        };
        let trace_start = start.unwrap_or(0);

        let (reference_records, start_line, comparison) = match self.alignment {
            Alignment::Membership => {
                let records = self.reference_records(reference, trace_start);
                let index = trace::index_by_key(&candidate_records);
                let comparison = trace::compare_membership(&records, &index);
                (records, start, comparison)
            }
            Alignment::Sequential => {
                let records = self.reference_records(reference, trace_start);
                let comparison = trace::compare_positional(
                    &records,
                    &candidate_records,
                    self.rule,
                    self.driver,
                );
                (records, start, comparison)
            }
            Alignment::Offset(offset) => {
                let begin = trace::offset_start(trace_start, offset, reference.lines.len())?;
                info!(line = begin + 1, offset, "aligned reference by offset");
                self.compare_window(reference, begin, &candidate_records)
            }
            Alignment::TargetSearch => {
                let from = trace_start.saturating_sub(1);
                let begin = match candidate_records.first() {
                    Some(first) => trace::search_target(
                        &reference.lines,
                        from,
                        self.reference.as_ref(),
                        &first.key,
                        self.rule,
                    )
                    .ok_or_else(|| Error::AlignmentNotFound {
                        target: first.key.clone(),
                        from,
                        path: reference.path.clone(),
                    })?,
                    None => from,
                };
                info!(line = begin + 1, "aligned reference at decoder's first address");
                self.compare_window(reference, begin, &candidate_records)
            }
        };

        Ok(Outcome {
            tool: self.tool,
            driver: self.driver,
            reference_path: reference.path.clone(),
            candidate_path: candidate.path.clone(),
            reference_records: reference_records.len(),
            candidate_records: candidate_records.len(),
            start_line,
            comparison,
        })
    }

    fn reference_records(&self, reference: &TraceFile, start: usize) -> Vec<TraceRecord> {
        let records = trace::window(
            &reference.lines,
            start,
            usize::MAX,
            self.reference.as_ref(),
        );
        debug!(
            path = %reference.path.display(),
            records = records.len(),
            "parsed reference trace"
        );
        records
    }

    fn compare_window(
        &self,
        reference: &TraceFile,
        begin: usize,
        candidate: &[TraceRecord],
    ) -> (Vec<TraceRecord>, Option<usize>, Comparison) {
        let records = trace::window(
            &reference.lines,
            begin,
            candidate.len(),
            self.reference.as_ref(),
        );
        let comparison = trace::compare_positional(&records, candidate, self.rule, self.driver);
        (records, Some(begin), comparison)
    }
}

/// Everything a report needs about one finished comparison.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub tool: Tool,
    /// Side whose length bounded the comparison.
    pub driver: Driver,
    pub reference_path: PathBuf,
    pub candidate_path: PathBuf,
    /// Reference records taking part in the comparison.
    pub reference_records: usize,
    pub candidate_records: usize,
    /// Zero-based reference line where comparison started, when aligned.
    pub start_line: Option<usize>,
    pub comparison: Comparison,
}

impl Outcome {
    /// The count printed next to a divergence.
    ///
    /// Joint logs report the one-based position of the diverging joint;
    /// the address tools report how many addresses matched.
    pub fn line_count(&self) -> usize {
        match (&self.comparison.divergence, self.tool) {
            (Some(div), Tool::Joints) => div.position(),
            _ => self.comparison.matched,
        }
    }

    /// The key a divergence is headlined with: the driving side's key, so
    /// the Verilator tool names the decoder address that went wrong.
    pub fn divergent_key(&self) -> Option<&TraceKey> {
        self.comparison
            .divergence
            .as_ref()
            .and_then(|div| div.key_for(self.driver))
    }
}
