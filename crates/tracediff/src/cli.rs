//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracediff::diff::{TIMESTAMP_MARKER, VERILATOR_START_MARKER};
use tracediff::trace::Pattern;
use tracediff::{MatchRule, ReportFormat};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "tracediff")]
#[command(about = "Find the first divergence between a reference trace and a decoder trace")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    /// Report format
    #[arg(long, value_enum, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Exit with a failure status when the traces diverge
    #[arg(long, global = true)]
    pub fail_on_divergence: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a Spike PC list against an address-keyed decoder dump
    Spike {
        #[command(flatten)]
        traces: TraceArgs,
    },
    /// Compare a Verilator commit log against a decoder dump
    Verilator {
        #[command(flatten)]
        traces: TraceArgs,

        /// Start comparing this many lines after the start marker
        /// (1 = the marker line). Searches for the decoder's first
        /// address when omitted.
        #[arg(short, long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Text of the line that marks the start of the trace
        #[arg(long, default_value = VERILATOR_START_MARKER)]
        marker: String,

        /// Skip decoder dump lines containing this text
        #[arg(long, default_value = TIMESTAMP_MARKER)]
        exclude: String,

        /// How decoder addresses are matched against reference PCs
        #[arg(long = "match", value_enum, default_value = "contains")]
        rule: MatchRuleArg,
    },
    /// Compare joint numbers against decoder PC numbers
    Joints {
        #[command(flatten)]
        traces: TraceArgs,

        /// Regex extracting the joint number (first capture group)
        #[arg(long, default_value = Pattern::JOINT)]
        ref_pattern: String,

        /// Regex extracting the decoder PC (first capture group)
        #[arg(long, default_value = Pattern::PC)]
        dut_pattern: String,

        /// How decoder PCs are matched against joint numbers
        #[arg(long = "match", value_enum, default_value = "exact")]
        rule: MatchRuleArg,
    },
}

/// Input trace paths shared by every command.
#[derive(clap::Args, Clone, Debug)]
pub struct TraceArgs {
    /// Path to the reference trace file
    #[arg(short = 'r', long = "ref_file", visible_alias = "ref-file", value_name = "PATH")]
    pub ref_file: PathBuf,

    /// Path to the decoder dump file
    #[arg(
        short = 'd',
        long = "decoder_dump",
        visible_alias = "decoder-dump",
        value_name = "PATH"
    )]
    pub decoder_dump: PathBuf,
}

/// Key matching rule.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MatchRuleArg {
    /// Addresses must be equal
    Exact,
    /// The reference field must contain the decoder address
    Contains,
}

impl From<MatchRuleArg> for MatchRule {
    fn from(arg: MatchRuleArg) -> Self {
        match arg {
            MatchRuleArg::Exact => MatchRule::Exact,
            MatchRuleArg::Contains => MatchRule::Contains,
        }
    }
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Text,
    /// Raw key-value output (for scripting)
    Raw,
    /// JSON output
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(arg: OutputFormat) -> Self {
        match arg {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Raw => ReportFormat::Raw,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tracediff").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_short_and_underscore_spellings() {
        for args in [
            ["spike", "-r", "ref.log", "-d", "trace.dump"],
            ["spike", "--ref_file", "ref.log", "--decoder_dump", "trace.dump"],
            ["spike", "--ref-file", "ref.log", "--decoder-dump", "trace.dump"],
        ] {
            let Commands::Spike { traces } = parse(&args).command else {
                panic!("expected spike command");
            };
            assert_eq!(traces.ref_file, PathBuf::from("ref.log"));
            assert_eq!(traces.decoder_dump, PathBuf::from("trace.dump"));
        }
    }

    #[test]
    fn test_verilator_offset_and_defaults() {
        let cli = parse(&["verilator", "-r", "v.log", "-d", "t.dump", "-o", "-2"]);
        let Commands::Verilator {
            offset,
            marker,
            exclude,
            rule,
            ..
        } = cli.command
        else {
            panic!("expected verilator command");
        };
        assert_eq!(offset, Some(-2));
        assert_eq!(marker, VERILATOR_START_MARKER);
        assert_eq!(exclude, TIMESTAMP_MARKER);
        assert_eq!(MatchRule::from(rule), MatchRule::Contains);

        let cli = parse(&["verilator", "-r", "v.log", "-d", "t.dump", "--offset", "3"]);
        assert!(matches!(
            cli.command,
            Commands::Verilator {
                offset: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_joints_defaults_and_global_flags() {
        let cli = parse(&[
            "joints",
            "-r",
            "j.log",
            "-d",
            "pc.log",
            "--format",
            "json",
            "--fail-on-divergence",
        ]);
        assert!(cli.fail_on_divergence);
        assert_eq!(ReportFormat::from(cli.format), ReportFormat::Json);
        let Commands::Joints {
            ref_pattern,
            dut_pattern,
            rule,
            ..
        } = cli.command
        else {
            panic!("expected joints command");
        };
        assert_eq!(ref_pattern, Pattern::JOINT);
        assert_eq!(dut_pattern, Pattern::PC);
        assert_eq!(MatchRule::from(rule), MatchRule::Exact);
    }

    #[test]
    fn test_missing_required_paths_rejected() {
        assert!(Cli::try_parse_from(["tracediff", "spike", "-r", "ref.log"]).is_err());
        assert!(Cli::try_parse_from(["tracediff", "joints", "-d", "pc.log"]).is_err());
    }

    #[test]
    fn test_offset_only_on_verilator() {
        let args = ["tracediff", "spike", "-r", "a", "-d", "b", "-o", "1"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_silent() {
        let args = ["tracediff", "-v", "-s", "spike", "-r", "a", "-d", "b"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
