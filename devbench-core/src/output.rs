//! # Output Formatting
//!
//! Colorized status lines for the installer. Every message is written on its
//! own line in the color of its level (red for errors, green for success,
//! yellow for warnings and progress notes) and closed with an ANSI reset.

use std::io::{self, IsTerminal, Write};

use owo_colors::{OwoColorize, Style};

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Color only when standard output is a terminal
  #[default]
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Decide whether escape codes should be written to standard output
  pub fn enabled_for_stdout(self) -> bool {
    match self {
      Self::Yes | Self::Always => true,
      Self::No | Self::Never => false,
      Self::Auto => io::stdout().is_terminal(),
    }
  }
}

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
  /// Red
  #[default]
  Error,
  /// Green
  Success,
  /// Yellow; used for warnings and progress notes alike
  Warning,
}

impl Level {
  /// Map a numeric level code (1 = error, 2 = success, 3 = warning)
  pub const fn from_code(code: u8) -> Option<Self> {
    match code {
      1 => Some(Self::Error),
      2 => Some(Self::Success),
      3 => Some(Self::Warning),
      _ => None,
    }
  }

  /// The numeric code for this level
  pub const fn code(self) -> u8 {
    match self {
      Self::Error => 1,
      Self::Success => 2,
      Self::Warning => 3,
    }
  }

  fn style(self) -> Style {
    match self {
      Self::Error => Style::new().red(),
      Self::Success => Style::new().bright_green(),
      Self::Warning => Style::new().bright_yellow(),
    }
  }
}

/// Render a single status line, including the trailing newline
pub fn render(level: Level, message: &str, color: bool) -> String {
  if color {
    format!("{}\n", message.style(level.style()))
  } else {
    format!("{message}\n")
  }
}

/// Writes status lines to standard output (or any other sink)
pub struct Logger {
  sink: Box<dyn Write + Send>,
  color: bool,
}

impl Logger {
  /// Log to standard output, coloring according to `mode`
  pub fn stdout(mode: ColorMode) -> Self {
    Self::with_sink(Box::new(io::stdout()), mode.enabled_for_stdout())
  }

  /// Log to an arbitrary sink
  pub fn with_sink(sink: Box<dyn Write + Send>, color: bool) -> Self {
    Self { sink, color }
  }

  /// Emit `message` at `level`
  pub fn log(&mut self, level: Level, message: &str) {
    let line = render(level, message, self.color);
    if let Err(err) = self.sink.write_all(line.as_bytes()).and_then(|()| self.sink.flush()) {
      tracing::debug!("Failed to write status line: {err}");
    }
  }

  /// Emit `message` at the level identified by `code`; unknown codes are
  /// dropped
  pub fn log_code(&mut self, code: u8, message: &str) {
    if let Some(level) = Level::from_code(code) {
      self.log(level, message);
    }
  }

  pub fn error(&mut self, message: &str) {
    self.log(Level::Error, message);
  }

  pub fn success(&mut self, message: &str) {
    self.log(Level::Success, message);
  }

  pub fn warn(&mut self, message: &str) {
    self.log(Level::Warning, message);
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[derive(Clone, Default)]
  struct Buffer(Arc<Mutex<Vec<u8>>>);

  impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  impl Buffer {
    fn text(&self) -> String {
      String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
  }

  #[test]
  fn test_level_codes() {
    assert_eq!(Level::from_code(1), Some(Level::Error));
    assert_eq!(Level::from_code(2), Some(Level::Success));
    assert_eq!(Level::from_code(3), Some(Level::Warning));
    assert_eq!(Level::from_code(0), None);
    assert_eq!(Level::from_code(4), None);
    assert_eq!(Level::default(), Level::Error);

    for level in [Level::Error, Level::Success, Level::Warning] {
      assert_eq!(Level::from_code(level.code()), Some(level));
    }
  }

  #[test]
  fn test_render_colored_lines_end_with_reset() {
    let red = render(Level::Error, "boom", true);
    assert!(red.starts_with("\x1b[31m"));
    assert!(red.ends_with("\x1b[0m\n"));
    assert!(red.contains("boom"));

    let green = render(Level::Success, "done", true);
    assert!(green.starts_with("\x1b[92m"));

    let yellow = render(Level::Warning, "careful", true);
    assert!(yellow.starts_with("\x1b[93m"));
  }

  #[test]
  fn test_render_plain() {
    assert_eq!(render(Level::Warning, "careful", false), "careful\n");
  }

  #[test]
  fn test_logger_unknown_code_is_silent() {
    let buffer = Buffer::default();
    let mut log = Logger::with_sink(Box::new(buffer.clone()), false);

    log.log_code(7, "never shown");
    log.log_code(2, "shown");

    assert_eq!(buffer.text(), "shown\n");
  }

  #[test]
  fn test_logger_levels() {
    let buffer = Buffer::default();
    let mut log = Logger::with_sink(Box::new(buffer.clone()), false);

    log.error("one");
    log.success("two");
    log.warn("three");

    assert_eq!(buffer.text(), "one\ntwo\nthree\n");
  }

  #[test]
  fn test_color_mode_explicit() {
    assert!(ColorMode::Always.enabled_for_stdout());
    assert!(ColorMode::Yes.enabled_for_stdout());
    assert!(!ColorMode::Never.enabled_for_stdout());
    assert!(!ColorMode::No.enabled_for_stdout());
  }
}
