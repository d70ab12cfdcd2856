//! Progress indicator for relocation copies
//!
//! Uses `linya`, which draws to stderr. Nothing is drawn when stderr is not a terminal.

use linya::{Bar, Progress};
use std::io::IsTerminal;

/// Progress bar over a known number of file copies
pub struct FileProgress {
  progress: Progress,
  bar: Bar,
}

impl FileProgress {
  /// Create a new progress bar for file copies
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// A bar when `enabled`, stderr is interactive and there is work to show
  pub fn for_terminal(enabled: bool, total: usize, label: impl Into<String>) -> Option<Self> {
    if enabled && total > 0 && std::io::stderr().is_terminal() {
      Some(Self::new(total, label))
    } else {
      None
    }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
