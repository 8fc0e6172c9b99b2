use std::fmt;

use serde::{Serialize, Serializer};

/// Canonical form of a trace address.
///
/// Reference models and decoders disagree on prefixes, case and zero
/// padding (`0000000000010000`, `0x10000`, `10000`). All of them collapse
/// to the same key: no `0x` prefix, lower-case hex digits, no leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceKey(String);

impl TraceKey {
    /// Canonicalize a raw address field.
    ///
    /// Idempotent: canonicalizing an already canonical key yields the same key.
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw)
            .trim_start();
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            if raw.is_empty() {
                return Self(String::new());
            }
            return Self("0".to_string());
        }
        Self(digits.to_ascii_lowercase())
    }

    /// Canonicalize a field that must be a hex address.
    ///
    /// Returns `None` for blank fields and anything with a non-hex digit,
    /// so banners like `Trace decoder: v1.2` never turn into keys.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self::new(digits))
    }

    /// Canonical digits without prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `other` occurs inside this key.
    pub fn contains(&self, other: &TraceKey) -> bool {
        self.0.contains(other.as_str())
    }
}

impl fmt::Display for TraceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0)
    }
}

impl Serialize for TraceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
