use std::io::Write;
use std::path::Path;

use tracediff::trace::AddressPrefixed;
use tracediff::{DiffConfig, MatchRule, ReportFormat, TraceFile};
use tracing::{error, info};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, TraceArgs};
use crate::terminal::{self, Spinner};

/// Settings shared by every diff command.
pub struct RunOptions {
    pub format: ReportFormat,
    pub quiet: bool,
    pub fail_on_divergence: bool,
}

/// Spike PC list vs. address-keyed decoder dump.
pub fn cmd_spike(traces: &TraceArgs, opts: &RunOptions) -> i32 {
    run(&DiffConfig::spike(), traces, opts)
}

/// Verilator commit log vs. timestamped decoder dump.
pub fn cmd_verilator(
    traces: &TraceArgs,
    offset: Option<i64>,
    marker: &str,
    exclude: &str,
    rule: MatchRule,
    opts: &RunOptions,
) -> i32 {
    let candidate = if exclude.is_empty() {
        AddressPrefixed::default()
    } else {
        AddressPrefixed::excluding(exclude)
    };
    let config = DiffConfig::verilator(offset)
        .with_start_marker(marker)
        .with_candidate(candidate)
        .with_rule(rule);
    run(&config, traces, opts)
}

/// Joint-number log vs. PC-number log.
pub fn cmd_joints(
    traces: &TraceArgs,
    ref_pattern: &str,
    dut_pattern: &str,
    rule: MatchRule,
    opts: &RunOptions,
) -> i32 {
    match DiffConfig::joints_with_patterns(ref_pattern, dut_pattern) {
        Ok(config) => run(&config.with_rule(rule), traces, opts),
        Err(e) => {
            error!(error = %e, "invalid pattern");
            terminal::error(&e.to_string());
            EXIT_FAILURE
        }
    }
}

fn run(config: &DiffConfig, traces: &TraceArgs, opts: &RunOptions) -> i32 {
    let Some(reference) = load(&traces.ref_file, "reference trace", opts) else {
        return EXIT_FAILURE;
    };
    let Some(candidate) = load(&traces.decoder_dump, "decoder dump", opts) else {
        return EXIT_FAILURE;
    };

    let outcome = match config.run(&reference, &candidate) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(tool = %config.tool, error = %e, "comparison failed");
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    };
    info!(
        tool = %config.tool,
        matched = outcome.comparison.matched,
        diverged = !outcome.comparison.is_match(),
        "comparison finished"
    );

    let report = outcome.render(opts.format);
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(report.as_bytes()).and_then(|()| stdout.flush()) {
        terminal::error(&format!("failed to write report: {e}"));
        return EXIT_FAILURE;
    }

    if opts.fail_on_divergence && !outcome.comparison.is_match() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

fn load(path: &Path, what: &str, opts: &RunOptions) -> Option<TraceFile> {
    let spinner = if opts.quiet || opts.format != ReportFormat::Text {
        Spinner::hidden()
    } else {
        Spinner::new(format!("Reading {what} {}", path.display()))
    };
    match TraceFile::read(path) {
        Ok(file) => {
            spinner.finish_with_success(&format!(
                "Read {what} {} ({} lines)",
                path.display(),
                file.lines.len()
            ));
            Some(file)
        }
        Err(e) => {
            spinner.finish_with_failure(&e.to_string());
            None
        }
    }
}
