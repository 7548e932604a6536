use crate::server::{
    LineFindings, LogBuffer, MAX_LINE_BYTES, ReadinessScanner, forward_lines, strip_ansi,
};

use googletest::prelude::*;
use tokio::sync::mpsc;

fn scanner() -> ReadinessScanner {
    ReadinessScanner::new(LogBuffer::new(100))
}

#[test]
fn given_slidev_banner_when_scanned_then_port_detected() {
    let mut scanner = scanner();

    let findings = scanner.scan_line("  > Local:    http://localhost:3030/");

    assert_that!(findings.ready_port, some(eq(3030)));
    assert_that!(scanner.ready_port(), some(eq(3030)));
}

#[test]
fn given_loopback_spellings_when_scanned_then_each_detected() {
    for (line, port) in [
        ("public slide show > http://127.0.0.1:4000/", 4000),
        ("http://[::1]:4001/presenter/", 4001),
        ("Listening at http://localhost:4123/", 4123),
    ] {
        let mut scanner = scanner();
        assert_that!(scanner.scan_line(line).ready_port, some(eq(port)));
    }
}

#[test]
fn given_remote_or_https_url_when_scanned_then_not_ready() {
    let mut scanner = scanner();

    assert_that!(scanner.scan_line("see https://localhost:3030/").ready_port, none());
    assert_that!(scanner.scan_line("docs at http://sli.dev:80/").ready_port, none());
}

#[test]
fn given_colored_banner_when_scanned_then_escapes_ignored() {
    let mut scanner = scanner();

    let findings = scanner.scan_line("\x1b[32m>\x1b[0m Local: \x1b[36mhttp://localhost:\x1b[1m3031\x1b[22m/\x1b[39m");

    assert_that!(findings.ready_port, some(eq(3031)));
    assert_that!(scanner.logs().snapshot().as_str(), eq("> Local: http://localhost:3031/"));
}

#[test]
fn given_two_urls_when_scanned_then_first_wins() {
    let mut scanner = scanner();

    let first = scanner.scan_line("http://localhost:3030/");
    let second = scanner.scan_line("http://localhost:4040/");

    assert_that!(first.ready_port, some(eq(3030)));
    assert_eq!(second, LineFindings::default());
    assert_that!(scanner.ready_port(), some(eq(3030)));
}

#[test]
fn given_node_warning_when_scanned_then_secondary_pid_captured_once() {
    let mut scanner = scanner();

    let first = scanner.scan_line("(node:48213) ExperimentalWarning: VM Modules");
    let second = scanner.scan_line("(node:99999) Warning: again");

    assert_that!(first.secondary_pid, some(eq(48213)));
    assert_that!(second.secondary_pid, none());
    assert_that!(scanner.secondary_pid(), some(eq(48213)));
}

#[test]
fn given_out_of_range_port_when_scanned_then_ignored() {
    let mut scanner = scanner();

    assert_that!(scanner.scan_line("http://localhost:99999/").ready_port, none());
    assert_that!(scanner.scan_line("http://localhost:0/").ready_port, none());
}

#[test]
fn given_more_lines_than_capacity_when_scanned_then_oldest_dropped() {
    let logs = LogBuffer::new(3);
    let mut scanner = ReadinessScanner::new(logs.clone());

    for i in 0..5 {
        scanner.scan_line(&format!("line {i}"));
    }

    assert_that!(logs.len(), eq(3));
    assert_that!(logs.snapshot().as_str(), eq("line 2\nline 3\nline 4"));
}

#[test]
fn given_zero_capacity_when_created_then_keeps_one_line() {
    let logs = LogBuffer::new(0);

    logs.push("a".into());
    logs.push("b".into());

    assert_eq!(logs.lines(), vec!["b".to_string()]);
}

#[test]
fn given_osc_hyperlink_when_stripped_then_text_remains() {
    let line = "\x1b]8;;http://localhost:3030/\x07open\x1b]8;;\x07";

    assert_eq!(strip_ansi(line), "open");
}

async fn forwarded(output: Vec<u8>) -> Vec<String> {
    let (tx, mut rx) = mpsc::channel(16);
    forward_lines(output.as_slice(), tx).await;

    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        lines.push(line);
    }
    lines
}

#[tokio::test]
async fn given_crlf_output_when_forwarded_then_line_endings_trimmed() {
    let lines = forwarded(b"vite ready\r\n> Local: http://localhost:3030/\nlast".to_vec()).await;

    assert_eq!(
        lines,
        vec!["vite ready", "> Local: http://localhost:3030/", "last"]
    );
}

#[tokio::test]
async fn given_output_without_newlines_when_forwarded_then_split_into_bounded_chunks() {
    // Given
    let mut output = vec![b'a'; MAX_LINE_BYTES * 3 + 10];
    output.extend_from_slice(b"\nhttp://localhost:4000/\n");

    // When
    let lines = forwarded(output).await;

    // Then
    assert!(lines.iter().all(|line| line.len() <= MAX_LINE_BYTES));
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], "a".repeat(10));
    assert_eq!(lines[4], "http://localhost:4000/");
}
