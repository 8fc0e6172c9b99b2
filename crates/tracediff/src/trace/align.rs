use tracing::debug;

use super::{KeyExtractor, MatchRule, TraceKey, TraceRecord};
use crate::error::{Error, Result};

/// Find the first line containing `marker`.
pub fn find_start_marker(lines: &[String], marker: &str) -> Option<usize> {
    lines.iter().position(|line| line.contains(marker))
}

/// Resolve an explicit offset relative to the start marker.
///
/// The window starts at `start + offset - 1`, so offset 1 starts at the
/// marker line itself.
///
/// # Errors
///
/// Returns [`Error::OffsetOutOfRange`] if the resulting line lies outside
/// `0..=lines`.
pub fn offset_start(start: usize, offset: i64, lines: usize) -> Result<usize> {
    let out_of_range = || Error::OffsetOutOfRange {
        offset,
        start,
        lines,
    };
    let start_i = i64::try_from(start).map_err(|_| out_of_range())?;
    let index = start_i
        .checked_add(offset)
        .and_then(|i| i.checked_sub(1))
        .ok_or_else(out_of_range)?;
    let index = usize::try_from(index).map_err(|_| out_of_range())?;
    if index > lines {
        return Err(out_of_range());
    }
    Ok(index)
}

/// Scan forward from line `from` for the first record whose key matches
/// `target`.
///
/// Lines without a key are skipped. The scan stops at the end of the log
/// and returns `None` if no line matches.
pub fn search_target<E: KeyExtractor + ?Sized>(
    lines: &[String],
    from: usize,
    extractor: &E,
    target: &TraceKey,
    rule: MatchRule,
) -> Option<usize> {
    let mut skipped = 0usize;
    for (index, line) in lines.iter().enumerate().skip(from) {
        let Some((key, _)) = extractor.extract(line) else {
            skipped += 1;
            continue;
        };
        if rule.matches(&key, target) {
            debug!(line = index, skipped, target = %target, "found alignment target");
            return Some(index);
        }
    }
    debug!(from, skipped, target = %target, "alignment target not found");
    None
}

/// The first `len` records at or after line `start`.
pub fn window<E: KeyExtractor + ?Sized>(
    lines: &[String],
    start: usize,
    len: usize,
    extractor: &E,
) -> Vec<TraceRecord> {
    lines
        .iter()
        .enumerate()
        .skip(start)
        .filter_map(|(i, line)| extractor.record(i, line))
        .take(len)
        .collect()
}
