use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use super::*;
use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};

const VERILATOR_LOG: &[&str] = &[
    "Writing 0x2000 bytes to memory",
    "C0: 1 [1] pc=[0000000000010000] inst=[00000517] auipc a0, 0x0",
    "C0: 2 [1] pc=[0000000000010004] inst=[00050513] addi a0, a0, 0",
    "C0: 3 [1] pc=[0000000000010008] inst=[00100593] li a1, 1",
];

fn write(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

fn run(args: &[&str], reference: &Path, dump: &Path) -> i32 {
    let paths = [
        "-r".to_string(),
        reference.display().to_string(),
        "-d".to_string(),
        dump.display().to_string(),
    ];
    let argv = ["tracediff", "--silent", "--format", "raw"]
        .into_iter()
        .map(str::to_string)
        .chain(args.iter().map(ToString::to_string))
        .chain(paths);
    let cli = Cli::try_parse_from(argv).unwrap();
    run_command(&cli)
}

#[test]
fn test_spike_match_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write(dir.path(), "spike.log", &["10000", "10004"]);
    let dump = write(dir.path(), "trace.dump", &["0x10000: auipc", "0x10004: addi"]);

    assert_eq!(run(&["spike"], &reference, &dump), EXIT_SUCCESS);
    assert_eq!(run(&["spike", "--fail-on-divergence"], &reference, &dump), EXIT_SUCCESS);
}

#[test]
fn test_divergence_fails_only_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write(dir.path(), "spike.log", &["10000", "10008"]);
    let dump = write(dir.path(), "trace.dump", &["0x10000: auipc", "0x10004: addi"]);

    assert_eq!(run(&["spike"], &reference, &dump), EXIT_SUCCESS);
    assert_eq!(run(&["spike", "--fail-on-divergence"], &reference, &dump), EXIT_FAILURE);
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write(dir.path(), "trace.dump", &["0x10000: auipc"]);

    assert_eq!(run(&["spike"], &dir.path().join("absent.log"), &dump), EXIT_FAILURE);
    assert_eq!(run(&["spike"], &dump, &dir.path().join("absent.dump")), EXIT_FAILURE);
}

#[test]
fn test_verilator_alignment_errors_fail() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write(dir.path(), "verilator.log", VERILATOR_LOG);
    let unknown = write(dir.path(), "unknown.dump", &["0xdeadbeef: ecall"]);
    let good = write(dir.path(), "good.dump", &["0x10004: addi", "0x10008: li"]);

    assert_eq!(run(&["verilator"], &reference, &good), EXIT_SUCCESS);
    assert_eq!(run(&["verilator", "-o", "3"], &reference, &good), EXIT_SUCCESS);
    assert_eq!(run(&["verilator"], &reference, &unknown), EXIT_FAILURE);
    assert_eq!(run(&["verilator", "-o", "-5"], &reference, &good), EXIT_FAILURE);
    assert_eq!(run(&["verilator", "--marker", "Loading"], &reference, &good), EXIT_FAILURE);
}

#[test]
fn test_joints_invalid_pattern_fails() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write(dir.path(), "joints.log", &["[joint] a1"]);
    let dump = write(dir.path(), "pc.log", &["pc: a1"]);

    assert_eq!(run(&["joints"], &reference, &dump), EXIT_SUCCESS);
    assert_eq!(run(&["joints", "--ref-pattern", "(["], &reference, &dump), EXIT_FAILURE);
    assert_eq!(
        run(&["joints", "--dut-pattern", r"pc:\s*[0-9a-f]+"], &reference, &dump),
        EXIT_FAILURE
    );
}
