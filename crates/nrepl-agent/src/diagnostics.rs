//! Diagnostic output
//!
//! The agent reports everything as single plain-text lines. `Console` is the
//! sink used inside the VM; `Recorder` keeps the lines in memory.

use parking_lot::Mutex;
use std::io::{self, Stderr, Stdout, Write};

/// Severity of a diagnostic line
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    /// Progress announcements (load, stop)
    Info,
    /// Recoverable problems, e.g. a refused capability
    Warn,
    /// The operation was abandoned
    Error,
}

/// Destination for diagnostic lines
pub trait Diagnostics {
    /// Write one line. Must not fail or panic.
    fn emit(&self, level: Level, line: &str);

    fn info(&self, line: &str) {
        self.emit(Level::Info, line);
    }

    fn warn(&self, line: &str) {
        self.emit(Level::Warn, line);
    }

    fn error(&self, line: &str) {
        self.emit(Level::Error, line);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn emit(&self, level: Level, line: &str) {
        (**self).emit(level, line);
    }
}

/// Info lines to one writer, warnings and errors to another.
///
/// Defaults to stdout / stderr. Write errors (a closed pipe, a full disk) are
/// dropped: the line is lost and the caller carries on.
#[derive(Debug)]
pub struct Console<O = Stdout, E = Stderr> {
    out: Mutex<O>,
    err: Mutex<E>,
}

impl Console {
    /// Console on the process's standard streams
    pub fn stdio() -> Self {
        Console::new(io::stdout(), io::stderr())
    }
}

impl Default for Console {
    fn default() -> Self {
        Console::stdio()
    }
}

impl<O: Write, E: Write> Console<O, E> {
    /// Console writing info lines to `out`, the rest to `err`
    pub fn new(out: O, err: E) -> Self {
        Console {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// Give back the writers
    pub fn into_inner(self) -> (O, E) {
        (self.out.into_inner(), self.err.into_inner())
    }
}

impl<O: Write, E: Write> Diagnostics for Console<O, E> {
    fn emit(&self, level: Level, line: &str) {
        let _ = match level {
            Level::Info => writeln!(self.out.lock(), "{}", line),
            Level::Warn => writeln!(self.err.lock(), "Warning: {}", line),
            Level::Error => writeln!(self.err.lock(), "{}", line),
        };
    }
}

/// In-memory sink
#[derive(Debug, Default)]
pub struct Recorder {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Recorder {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, oldest first
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().clone()
    }

    /// Lines at the given level
    pub fn at(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Diagnostics for Recorder {
    fn emit(&self, level: Level, line: &str) {
        self.lines.lock().push((level, line.to_string()));
    }
}

/// Writer that rejects everything, like a pipe whose reader went away
#[cfg(test)]
pub(crate) struct BrokenPipe;

#[cfg(test)]
impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_keeps_order_and_level() {
        let rec = Recorder::new();
        rec.info("one");
        rec.error("two");
        rec.warn("three");

        assert_eq!(
            rec.lines(),
            vec![
                (Level::Info, "one".to_string()),
                (Level::Error, "two".to_string()),
                (Level::Warn, "three".to_string()),
            ]
        );
        assert_eq!(rec.at(Level::Error), vec!["two".to_string()]);

        rec.clear();
        assert!(rec.lines().is_empty());
    }

    #[test]
    fn test_console_routes_by_level() {
        let console = Console::new(Vec::new(), Vec::new());
        console.info("loaded");
        console.warn("no capability");
        console.error("failed");

        let (out, err) = console.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "loaded\n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Warning: no capability\nfailed\n"
        );
    }

    #[test]
    fn test_console_survives_closed_streams() {
        let console = Console::new(BrokenPipe, BrokenPipe);
        console.info("nobody is listening");
        console.warn("nobody is listening");
        console.error("nobody is listening");
    }
}
