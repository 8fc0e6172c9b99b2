//! Command implementations.
//!
//! Each command builds a [`tracediff::DiffConfig`] and hands it to the
//! shared runner in [`diff`].

mod diff;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    let opts = diff::RunOptions {
        format: cli.format.into(),
        quiet: cli.silent,
        fail_on_divergence: cli.fail_on_divergence,
    };

    match &cli.command {
        Commands::Spike { traces } => diff::cmd_spike(traces, &opts),
        Commands::Verilator {
            traces,
            offset,
            marker,
            exclude,
            rule,
        } => diff::cmd_verilator(traces, *offset, marker, exclude, (*rule).into(), &opts),
        Commands::Joints {
            traces,
            ref_pattern,
            dut_pattern,
            rule,
        } => diff::cmd_joints(traces, ref_pattern, dut_pattern, (*rule).into(), &opts),
    }
}

#[cfg(test)]
mod tests;
