//! Trace parsing, alignment and comparison.
//!
//! Reference traces (Spike PC lists, Verilator commit logs, joint logs) and
//! decoder dumps are reduced to sequences of [`TraceKey`]s, aligned, and
//! walked until the first position where they disagree.

mod align;
mod compare;
mod key;
mod parse;
mod source;

pub use align::{find_start_marker, offset_start, search_target, window};
pub use compare::{compare_membership, compare_positional, index_by_key};
pub use key::TraceKey;
pub use parse::{AddressPrefixed, BareAddress, Delimited, KeyExtractor, Pattern, parse_records};
pub use source::{lines_from, read_lines};

use serde::Serialize;

/// One keyed line of a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    /// Zero-based line number in the source file.
    pub line: usize,
    /// Canonical address.
    pub key: TraceKey,
    /// Instruction text for decoder dumps, the whole line otherwise.
    pub text: String,
}

/// Result of comparing two traces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Comparison {
    /// Number of positions that matched before the divergence (or in total).
    pub matched: usize,
    /// Last record that matched, if any.
    pub last_match: Option<TraceRecord>,
    /// First divergence, if any.
    pub divergence: Option<Divergence>,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.divergence.is_none()
    }
}

/// Where two traces stopped agreeing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Divergence {
    /// Zero-based position in the compared sequence.
    pub index: usize,
    pub kind: DivergenceKind,
    /// Reference record at `index` (absent if the reference ran out).
    pub reference: Option<TraceRecord>,
    /// Candidate record at `index` (absent if the candidate ran out or
    /// never contained the reference address).
    pub candidate: Option<TraceRecord>,
}

impl Divergence {
    /// One-based position of the divergence.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    /// The reference key at the divergence, or the candidate's if the
    /// reference is the side that ran out.
    pub fn key(&self) -> Option<&TraceKey> {
        self.key_for(Driver::Reference)
    }

    /// The key on the side that drove the comparison, falling back to the
    /// other side when the driver has no record here.
    pub fn key_for(&self, driver: Driver) -> Option<&TraceKey> {
        let (first, second) = match driver {
            Driver::Reference => (&self.reference, &self.candidate),
            Driver::Candidate => (&self.candidate, &self.reference),
        };
        first.as_ref().or(second.as_ref()).map(|r| &r.key)
    }
}

/// Type of divergence between traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceKind {
    /// Keys at the same position differ.
    Mismatch,
    /// Reference address never appears in the candidate.
    MissingInCandidate,
    /// Candidate ended before the reference.
    CandidateEnded,
    /// Reference ended before the candidate.
    ReferenceEnded,
}

impl std::fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DivergenceKind::Mismatch => write!(f, "address mismatch"),
            DivergenceKind::MissingInCandidate => write!(f, "address missing from decoder dump"),
            DivergenceKind::CandidateEnded => write!(f, "decoder trace ended early"),
            DivergenceKind::ReferenceEnded => write!(f, "reference trace ended early"),
        }
    }
}

/// How a candidate key is matched against a reference key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Canonical keys must be equal.
    Exact,
    /// The reference key must contain the candidate key.
    Contains,
}

impl MatchRule {
    pub fn matches(self, reference: &TraceKey, candidate: &TraceKey) -> bool {
        match self {
            MatchRule::Exact => reference == candidate,
            MatchRule::Contains => reference.contains(candidate),
        }
    }
}

/// Which side's length bounds a positional comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    /// Walk every reference record; a short candidate is a divergence.
    Reference,
    /// Walk every candidate record; a short reference is a divergence.
    Candidate,
}

/// Where the reference comparison window starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// No positional alignment: look each reference key up in the candidate.
    Membership,
    /// Both traces start at their first record (after the start marker).
    Sequential,
    /// Start `offset - 1` lines after the start marker.
    Offset(i64),
    /// Start at the first reference line matching the candidate's first key.
    TargetSearch,
}
