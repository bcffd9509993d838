// End-to-end tests for the tapehost binary

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::NamedTempFile;

fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(source.as_bytes())
        .expect("Failed to write source");
    file
}

fn run_cli(args: &[&str], source: &str, stdin: &[u8]) -> Output {
    let file = source_file(source);
    let mut child = Command::new(env!("CARGO_BIN_EXE_tapehost"))
        .args(args)
        .arg(file.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn tapehost");

    // The child may exit before reading everything
    let _ = child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin);

    child.wait_with_output().expect("Failed to wait for tapehost")
}

#[test]
fn test_echo_byte_65() {
    let output = run_cli(&[], ",.", &[65]);
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![65]);
    assert_eq!(output.stderr, b"Exited successfully\n");
}

#[test]
fn test_empty_input() {
    let output = run_cli(&[], ",", b"");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(output.stderr, b"Exited successfully\n");
}

#[test]
fn test_control_bytes_pass_through() {
    let input = b"line\r\n\x1a\x04more\x00";
    let output = run_cli(&[], ",+[-.,+]", input);
    assert!(output.status.success());
    assert_eq!(output.stdout, input);
}

#[test]
fn test_hello_world() {
    let output = run_cli(
        &[],
        "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.",
        b"",
    );
    assert!(output.status.success());
    assert_eq!(output.stdout, b"Hello World!\n");
}

#[test]
fn test_parse_error() {
    let output = run_cli(&[], "+[", b"");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Parse error"));
    assert!(!stderr.contains("Exited successfully"));
}

#[test]
fn test_allocation_failure_is_fatal() {
    let output = run_cli(&["--tape-size", "18446744073709551615"], ",.", b"A");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to allocate tape"));
    assert!(!stderr.contains("Exited successfully"));
}

#[test]
fn test_checked_addressing_reports_fault() {
    let output = run_cli(&["--checked", "--tape-size", "4"], "+.>>.", b"");
    assert!(!output.status.success());
    assert_eq!(output.stdout, vec![1]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Exited successfully\n"));
    assert!(stderr.contains("Runtime error"));
}

#[test]
fn test_eof_limit_aborts_read_loop() {
    // `,` at end of input stores 255, so this loops forever without the limit
    let output = run_cli(&["--eof-limit=3"], "+[,]", b"xy");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_eof_limit_separate_value() {
    let output = run_cli(&["--eof-limit", "3"], "+[,]", b"");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_profile_follows_completion_line() {
    let output = run_cli(&["-p"], ",.", b"A");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"A");
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "Exited successfully\n\
         PC\tOP\t# EXECUTED\n\
         0\t,\t1\n\
         1\t.\t1\n\
         \n\
         Total operations: 2\n"
    );
}

#[test]
fn test_time_reported() {
    let output = run_cli(&["-t"], "+", b"");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Exited successfully\n"));
    assert!(stderr.contains("Execution time: "));
}

#[test]
fn test_missing_file_argument() {
    let output = Command::new(env!("CARGO_BIN_EXE_tapehost"))
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run tapehost");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input file provided"));
}
