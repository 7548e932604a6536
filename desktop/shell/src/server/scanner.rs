//! Readiness detection over the child's output.
//!
//! Slidev prints something like `> Local: http://localhost:3030/` once it is
//! serving. Each output line is matched against that form after ANSI escape
//! sequences are stripped. A node PID printed in warnings such as
//! `(node:12345) ExperimentalWarning` is captured too, since it outlives a
//! thin `npx` launcher.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Longest line forwarded in one piece; longer output is split.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http://(?:localhost|127\.0\.0\.1|\[::1\]):([0-9]+)").expect("url pattern is valid")
});
static SECONDARY_PID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(node:([0-9]+)\)").expect("pid pattern is valid"));
static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)|[@-Z\\-_])")
        .expect("ansi pattern is valid")
});

/// Remove terminal escape sequences (colors, cursor moves, hyperlinks).
pub fn strip_ansi(line: &str) -> Cow<'_, str> {
    ANSI_RE.replace_all(line, "")
}

/// Bounded ring of recent output lines, shared between the scanning task
/// and the failure path that reports them.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Add a line, removing the oldest if at capacity
    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.iter().cloned().collect()
    }

    /// Buffered lines joined with newlines, oldest first.
    pub fn snapshot(&self) -> String {
        self.lines().join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a single line revealed. Each field is reported at most once per scanner.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineFindings {
    pub ready_port: Option<u16>,
    pub secondary_pid: Option<u32>,
}

#[derive(Debug)]
pub struct ReadinessScanner {
    logs: LogBuffer,
    ready_port: Option<u16>,
    secondary_pid: Option<u32>,
}

impl ReadinessScanner {
    pub fn new(logs: LogBuffer) -> Self {
        Self {
            logs,
            ready_port: None,
            secondary_pid: None,
        }
    }

    pub fn scan_line(&mut self, raw: &str) -> LineFindings {
        let line = strip_ansi(raw);
        let mut findings = LineFindings::default();

        if self.secondary_pid.is_none()
            && let Some(pid) = capture_number::<u32>(&SECONDARY_PID_RE, &line)
        {
            self.secondary_pid = Some(pid);
            findings.secondary_pid = Some(pid);
        }

        if self.ready_port.is_none()
            && let Some(port) = capture_number::<u16>(&URL_RE, &line)
        {
            self.ready_port = Some(port);
            findings.ready_port = Some(port);
        }

        self.logs.push(line.into_owned());
        findings
    }

    pub fn ready_port(&self) -> Option<u16> {
        self.ready_port
    }

    pub fn secondary_pid(&self) -> Option<u32> {
        self.secondary_pid
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }
}

fn capture_number<T: std::str::FromStr + PartialEq + Default>(re: &Regex, line: &str) -> Option<T> {
    re.captures_iter(line)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<T>().ok())
        .find(|n| *n != T::default())
}

/// Send each line of `reader` to `tx` until EOF or until the receiver is
/// gone. Line endings are trimmed and lines longer than [`MAX_LINE_BYTES`]
/// arrive in chunks.
pub async fn forward_lines<R>(reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = (&mut reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await;
        match read {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Stopped reading Slidev output: {e}");
                break;
            }
        }
    }
}
