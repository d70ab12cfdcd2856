//! External command execution for release tooling
//!
//! Arguments are always passed as a vector straight to the OS. Nothing is joined into a
//! shell string and split again, so file names with spaces or quotes survive intact.

use crate::core::error::{PublishError, PublishResult, ResultExt};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound for one release-tool call before it is treated as hung
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long output is still collected once the process is gone. A grandchild holding
/// the pipes open must not extend the timeout.
const OUTPUT_GRACE: Duration = Duration::from_secs(1);

/// Runs one external program with a fixed working directory and timeout
#[derive(Debug, Clone)]
pub struct CliTool {
  program: String,
  work_dir: PathBuf,
  timeout: Duration,
}

impl CliTool {
  pub fn new(program: impl Into<String>, work_dir: &Path) -> Self {
    Self {
      program: program.into(),
      work_dir: work_dir.to_path_buf(),
      timeout: DEFAULT_TIMEOUT,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Human-readable command line, for logs and errors only
  pub fn display_command<S: AsRef<str>>(&self, args: &[S]) -> String {
    let mut line = self.program.clone();
    for arg in args {
      line.push(' ');
      line.push_str(arg.as_ref());
    }
    line
  }

  /// Run the program and return its combined, trimmed output
  ///
  /// Non-zero exit, spawn failure and timeout are all errors.
  pub fn run<S: AsRef<str>>(&self, args: &[S]) -> PublishResult<String> {
    let command_line = self.display_command(args);
    tracing::debug!(command = %command_line, "running");

    let mut child = Command::new(&self.program)
      .args(args.iter().map(|a| a.as_ref()))
      .current_dir(&self.work_dir)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .with_context(|| format!("Failed to execute {}", command_line))?;

    let (tx, rx) = mpsc::channel::<String>();
    if let Some(stdout) = child.stdout.take() {
      spawn_line_reader(stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
      spawn_line_reader(stderr, tx.clone());
    }
    drop(tx);

    let deadline = Instant::now() + self.timeout;
    let status = loop {
      if let Some(status) = child.try_wait()? {
        break Some(status);
      }
      if Instant::now() >= deadline {
        tracing::warn!(command = %command_line, timeout_secs = self.timeout.as_secs(), "command timed out, killing");
        // may have exited since try_wait
        let _ = child.kill();
        let _ = child.wait();
        break None;
      }
      thread::sleep(POLL_INTERVAL);
    };

    let lines = drain_output(&rx, &command_line);
    for line in &lines {
      tracing::trace!("\t{}", line);
    }
    let output = lines.join("\n").trim().to_string();

    match status {
      Some(status) if status.success() => Ok(output),
      Some(status) => Err(PublishError::Process {
        command: command_line,
        exit_code: status.code(),
        output,
      }),
      None => Err(PublishError::Process {
        command: command_line,
        exit_code: None,
        output,
      }),
    }
  }

  /// Like [`CliTool::run`], but any failure becomes `None`
  pub fn run_or_none<S: AsRef<str>>(&self, args: &[S]) -> Option<String> {
    match self.run(args) {
      Ok(output) => Some(output),
      Err(err) => {
        tracing::debug!(error = %err, "command failed");
        None
      }
    }
  }
}

/// Collect reader output until both pipes close or [`OUTPUT_GRACE`] runs out
///
/// Readers still blocked after the grace period are left detached.
fn drain_output(rx: &mpsc::Receiver<String>, command_line: &str) -> Vec<String> {
  let deadline = Instant::now() + OUTPUT_GRACE;
  let mut lines = Vec::new();
  loop {
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
      Ok(line) => lines.push(line),
      Err(RecvTimeoutError::Disconnected) => break,
      Err(RecvTimeoutError::Timeout) => {
        tracing::warn!(command = %command_line, "output pipes still open after exit, not waiting further");
        break;
      }
    }
  }
  lines
}

fn spawn_line_reader<R: Read + Send + 'static>(source: R, tx: mpsc::Sender<String>) {
  thread::spawn(move || {
    for line in BufReader::new(source).lines() {
      match line {
        Ok(line) => {
          if tx.send(line).is_err() {
            break;
          }
        }
        Err(_) => break,
      }
    }
  });
}
