use rustc_hash::FxHashMap;
use tracing::debug;

use super::{Comparison, Divergence, DivergenceKind, Driver, MatchRule, TraceKey, TraceRecord};

/// Index a decoder dump by address.
///
/// A repeated address keeps its last record.
pub fn index_by_key(records: &[TraceRecord]) -> FxHashMap<TraceKey, TraceRecord> {
    records
        .iter()
        .map(|r| (r.key.clone(), r.clone()))
        .collect()
}

/// Walk the reference and stop at the first address the candidate never
/// produced.
///
/// There is no positional alignment here: the decoder may emit addresses
/// in any order, only their presence is checked.
pub fn compare_membership(
    reference: &[TraceRecord],
    candidate: &FxHashMap<TraceKey, TraceRecord>,
) -> Comparison {
    let mut matched = 0;
    let mut last_match = None;

    for (index, exp) in reference.iter().enumerate() {
        if candidate.contains_key(&exp.key) {
            last_match = Some(exp.clone());
            matched += 1;
            continue;
        }
        debug!(index, key = %exp.key, "reference address missing from candidate");
        return Comparison {
            matched,
            last_match,
            divergence: Some(Divergence {
                index,
                kind: DivergenceKind::MissingInCandidate,
                reference: Some(exp.clone()),
                candidate: None,
            }),
        };
    }

    Comparison {
        matched,
        last_match,
        divergence: None,
    }
}

/// Compare two aligned traces position by position.
///
/// `driver` picks the side whose length bounds the walk; running out of
/// the other side before the driver is a divergence, while extra entries
/// past the driver's end are ignored.
pub fn compare_positional(
    reference: &[TraceRecord],
    candidate: &[TraceRecord],
    rule: MatchRule,
    driver: Driver,
) -> Comparison {
    let len = match driver {
        Driver::Reference => reference.len(),
        Driver::Candidate => candidate.len(),
    };
    let mut matched = 0;
    let mut last_match = None;

    for index in 0..len {
        let exp = reference.get(index);
        let act = candidate.get(index);
        let kind = match (exp, act) {
            (Some(e), Some(a)) if rule.matches(&e.key, &a.key) => {
                last_match = Some(e.clone());
                matched += 1;
                continue;
            }
            (Some(_), Some(_)) => DivergenceKind::Mismatch,
            (Some(_), None) => DivergenceKind::CandidateEnded,
            (None, _) => DivergenceKind::ReferenceEnded,
        };
        debug!(index, %kind, "traces diverged");
        return Comparison {
            matched,
            last_match,
            divergence: Some(Divergence {
                index,
                kind,
                reference: exp.cloned(),
                candidate: act.cloned(),
            }),
        };
    }

    Comparison {
        matched,
        last_match,
        divergence: None,
    }
}
