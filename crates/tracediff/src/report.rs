//! Rendering of comparison outcomes.

use std::fmt::Write as _;

use console::style;

use crate::diff::Outcome;
use crate::trace::TraceRecord;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable output (default)
    #[default]
    Text,
    /// Raw key-value output (for scripting)
    Raw,
    /// JSON output
    Json,
}

impl Outcome {
    /// Render the outcome in the requested format.
    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.render_text(),
            ReportFormat::Raw => self.render_raw(),
            ReportFormat::Json => self.render_json(),
        }
    }

    /// Human-readable report, one fact per line.
    pub fn render_text(&self) -> String {
        let unit = self.tool.unit();
        let cmp = &self.comparison;
        let mut out = String::new();

        if let Some(line) = self.start_line {
            let _ = writeln!(
                out,
                "{} Comparison starts at reference line {}",
                style("→").cyan(),
                line + 1
            );
        }

        let Some(div) = &cmp.divergence else {
            let _ = writeln!(
                out,
                "{} No divergence found. All {} match.",
                style("✓").green().bold(),
                self.tool.units()
            );
            let _ = writeln!(out, "  Everything matched up to the last line: {}", cmp.matched);
            let _ = writeln!(out, "  Last {unit}: {}", key_or_none(cmp.last_match.as_ref()));
            return out;
        };

        let key = self
            .divergent_key()
            .map_or_else(|| "none".to_string(), ToString::to_string);
        let _ = writeln!(
            out,
            "{} Most recent divergence found at {unit}: {key} ({})",
            style("✗").red().bold(),
            div.kind
        );
        let _ = writeln!(out, "  Most recent match: {}", key_or_none(cmp.last_match.as_ref()));
        let _ = writeln!(out, "  First divergence: {key}");
        let _ = writeln!(out, "  Reference: {}", describe(div.reference.as_ref()));
        let _ = writeln!(out, "  Candidate: {}", describe(div.candidate.as_ref()));
        let _ = writeln!(out, "  At line count: {}", self.line_count());
        out
    }

    /// `key=value` lines.
    pub fn render_raw(&self) -> String {
        let cmp = &self.comparison;
        let mut out = String::new();
        let _ = writeln!(out, "tool={}", self.tool);
        let _ = writeln!(out, "match={}", cmp.is_match());
        let _ = writeln!(out, "matched={}", cmp.matched);
        let _ = writeln!(out, "line_count={}", self.line_count());
        if let Some(line) = self.start_line {
            let _ = writeln!(out, "start_line={}", line + 1);
        }
        let _ = writeln!(out, "last_match={}", key_or_none(cmp.last_match.as_ref()));
        if let Some(div) = &cmp.divergence {
            let _ = writeln!(out, "divergence_index={}", div.index);
            let _ = writeln!(out, "divergence_kind={:?}", div.kind);
            let _ = writeln!(out, "reference={}", key_or_none(div.reference.as_ref()));
            let _ = writeln!(out, "candidate={}", key_or_none(div.candidate.as_ref()));
        }
        out
    }

    /// A single JSON object.
    pub fn render_json(&self) -> String {
        serde_json::json!({
            "tool": self.tool,
            "reference_path": self.reference_path,
            "candidate_path": self.candidate_path,
            "reference_records": self.reference_records,
            "candidate_records": self.candidate_records,
            "start_line": self.start_line,
            "match": self.comparison.is_match(),
            "line_count": self.line_count(),
            "comparison": self.comparison,
        })
        .to_string()
            + "\n"
    }
}

fn key_or_none(record: Option<&TraceRecord>) -> String {
    record.map_or_else(|| "none".to_string(), |r| r.key.to_string())
}

fn describe(record: Option<&TraceRecord>) -> String {
    match record {
        Some(r) if r.text.is_empty() => format!("{} (line {})", r.key, r.line + 1),
        Some(r) => format!("{} (line {}): {}", r.key, r.line + 1, r.text),
        None => "none".to_string(),
    }
}
