//! Script execution with a timestamped log
//!
//! stdout is echoed and logged line by line as it arrives. stderr is drained
//! on a scoped thread so a chatty child cannot block on a full pipe, then
//! echoed in red and logged after stdout.

use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use chrono::{DateTime, Local};

use crate::common::{Error, Result};

/// Result of a logged execution
#[derive(Debug)]
pub struct ExecutionReport {
    pub log_path: PathBuf,
    pub status: ExitStatus,
}

/// Log file for an execution started at `started`
///
/// Second granularity: a second run within the same second reuses the name
/// and overwrites the first log.
pub fn log_file_path(logs_dir: &Path, started: DateTime<Local>) -> PathBuf {
    logs_dir.join(format!("{}.log", started.format("%Y%m%d_%H%M%S")))
}

/// Waits for the child on every exit path
struct ChildGuard {
    child: Child,
    waited: bool,
}

impl ChildGuard {
    fn spawn(command: &mut Command) -> Result<Self> {
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::spawn(command.get_program(), &e))?;
        Ok(Self {
            child,
            waited: false,
        })
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.waited = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.waited {
            // Pipes are already closed here, so the child sees EOF/EPIPE
            let _ = self.child.wait();
        }
    }
}

/// Read newline-terminated chunks, tolerating non UTF-8 output
fn next_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn drain_lines<R: Read>(stream: R) -> io::Result<Vec<String>> {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    let mut lines = Vec::new();
    while let Some(line) = next_line(&mut reader, &mut buf)? {
        lines.push(line);
    }
    Ok(lines)
}

/// Run `command`, streaming its output to the console and a new log file
pub fn run_logged(script_name: &str, command: &mut Command, logs_dir: &Path) -> Result<ExecutionReport> {
    std::fs::create_dir_all(logs_dir).map_err(|e| Error::file_write(logs_dir, &e))?;
    let log_path = log_file_path(logs_dir, Local::now());
    let file = File::create(&log_path).map_err(|e| Error::file_write(&log_path, &e))?;
    let mut log = BufWriter::new(file);

    println!("\n{}", format!("Running {}...", script_name).bold());
    writeln!(log, "Execution Log for {}", script_name)?;
    writeln!(log, "{}", "=".repeat(80))?;

    let mut child = ChildGuard::spawn(command)?;
    tracing::debug!(script = script_name, pid = child.child.id(), "spawned script");

    let stdout = child
        .child
        .stdout
        .take()
        .ok_or_else(|| Error::Io(io::Error::other("child stdout was not captured")))?;
    let stderr = child
        .child
        .stderr
        .take()
        .ok_or_else(|| Error::Io(io::Error::other("child stderr was not captured")))?;

    let stderr_lines = std::thread::scope(|scope| -> io::Result<Vec<String>> {
        let drain = scope.spawn(move || drain_lines(stderr));

        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        while let Some(line) = next_line(&mut reader, &mut buf)? {
            println!("{}", line);
            writeln!(log, "{}", line)?;
        }
        drop(reader);

        drain
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stderr reader panicked")))
    })?;

    for line in &stderr_lines {
        println!("{}", line.red());
        writeln!(log, "{}", line)?;
    }
    log.flush()?;

    let status = child.wait()?;
    tracing::debug!(script = script_name, %status, log = %log_path.display(), "script finished");

    println!(
        "\n{}",
        format!(
            "Execution of {} logged to {}",
            script_name,
            log_path.display()
        )
        .green()
    );

    Ok(ExecutionReport { log_path, status })
}
