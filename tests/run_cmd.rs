use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("ubf").unwrap();
    cmd.timeout(Duration::from_secs(5));
    cmd
}

#[test]
fn reads_from_stdin_and_echoes_byte() {
    cargo_bin()
        .args(["run", ",."])
        .write_stdin("Z")
        .assert()
        .success()
        .stdout("Z\n");
}

#[test]
fn ultimate_flag_decodes_first() {
    // ",." encodes to ",,"; run as plain it would print nothing
    cargo_bin()
        .args(["run", "--ultimate", ",,"])
        .write_stdin("Q")
        .assert()
        .success()
        .stdout("Q\n");
}

#[test]
fn unmatched_bracket_is_reported() {
    cargo_bin()
        .args(["run", "["])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unmatched bracket '['"));
}

#[test]
fn pointer_off_left_edge_is_reported() {
    cargo_bin()
        .args(["run", "+<"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pointer out of range"))
        .stderr(predicate::str::contains("at instruction 1"));
}

#[test]
fn step_limit_aborts_infinite_loop() {
    cargo_bin()
        .args(["run", "--max-steps", "1000", "+[]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (1000)"));
}

#[test]
fn timeout_from_env_aborts_infinite_loop() {
    cargo_bin()
        .env("UBF_TIMEOUT_MS", "100")
        .args(["run", "+[]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Execution aborted"))
        .stdout(predicate::str::contains("Execution aborted").not());
}

#[test]
fn debug_prints_table() {
    cargo_bin()
        .args(["run", "--debug", "+.+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STEP | IP"))
        .stdout(predicate::str::contains("Increment cell[0] from 1 to 2"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn comments_are_ignored_when_running() {
    cargo_bin()
        .args(["run", "++++++++[>++++++++<-]>+. print A"])
        .assert()
        .success()
        .stdout("A\n");
}

fn program_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::Builder::new().suffix(suffix).tempfile().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn ultimate_file_is_decoded_before_running() {
    let tf = program_file(".ultimate_brainfuck", ",,");
    cargo_bin()
        .args(["run", "--file"])
        .arg(tf.path())
        .write_stdin("Q")
        .assert()
        .success()
        .stdout("Q\n");
}

#[test]
fn plain_file_runs_without_decoding() {
    // Decoding ",." would give ",-", which prints nothing
    let tf = program_file(".bf", ",.");
    cargo_bin()
        .args(["run", "--file"])
        .arg(tf.path())
        .write_stdin("Q")
        .assert()
        .success()
        .stdout("Q\n");
}

#[test]
fn unsupported_file_extension_is_rejected() {
    let tf = program_file(".txt", "+.");
    cargo_bin()
        .args(["run", "--file"])
        .arg(tf.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported file extension"));
}

#[test]
fn step_limit_from_config_file() {
    let config_home = tempfile::tempdir().expect("tempdir");
    fs::write(config_home.path().join("ubf.toml"), "[run]\nmax_steps = 10\n").unwrap();
    cargo_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("UBF_MAX_STEPS")
        .env_remove("UBF_TIMEOUT_MS")
        .args(["run", "+[]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (10)"));
}

#[test]
fn env_step_limit_beats_config_file() {
    let config_home = tempfile::tempdir().expect("tempdir");
    fs::write(config_home.path().join("ubf.toml"), "[run]\nmax_steps = 10\n").unwrap();
    cargo_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("UBF_MAX_STEPS", "20")
        .args(["run", "+[]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (20)"));
}
