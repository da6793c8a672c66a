//! Inspectable logger output

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use devbench_core::Logger;

/// Shared in-memory sink; clones write to the same buffer
#[derive(Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
  /// Everything written so far
  pub fn text(&self) -> String {
    let bytes = self.0.lock().expect("capture buffer poisoned").clone();
    String::from_utf8(bytes).expect("logger wrote invalid UTF-8")
  }

  /// Written lines, without trailing newlines
  pub fn lines(&self) -> Vec<String> {
    self.text().lines().map(str::to_string).collect()
  }

  /// Whether any line contains `needle`
  pub fn contains(&self, needle: &str) -> bool {
    self.text().contains(needle)
  }
}

impl Write for CaptureBuffer {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().expect("capture buffer poisoned").extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

/// A logger writing plain (uncolored) lines into a buffer
pub fn captured_logger() -> (Logger, CaptureBuffer) {
  let buffer = CaptureBuffer::default();
  (Logger::with_sink(Box::new(buffer.clone()), false), buffer)
}

/// A logger writing colored lines into a buffer
pub fn captured_color_logger() -> (Logger, CaptureBuffer) {
  let buffer = CaptureBuffer::default();
  (Logger::with_sink(Box::new(buffer.clone()), true), buffer)
}
