//! Append-only sweep log

use std::io::{self, Write};

/// Collects sweep output lines and forwards them to a writer
///
/// Lines are written and flushed as soon as they are appended, so a sweep
/// that dies midway leaves every completed cell in the log. A copy of each
/// line is kept for callers that want the text afterwards.
pub struct SweepLog {
    writer: Box<dyn Write + Send>,
    lines: Vec<String>,
}

impl SweepLog {
    /// Log into the given writer
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            lines: Vec::new(),
        }
    }

    /// Log that only keeps lines in memory
    pub fn in_memory() -> Self {
        Self::new(io::sink())
    }

    /// Append a line
    pub fn append(&mut self, line: impl Into<String>) -> io::Result<()> {
        let line = line.into();
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        self.lines.push(line);
        Ok(())
    }

    /// Lines appended so far, in order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The log as newline-terminated text
    pub fn text(&self) -> String {
        self.lines.iter().fold(String::new(), |mut acc, line| {
            acc.push_str(line);
            acc.push('\n');
            acc
        })
    }
}

impl std::fmt::Debug for SweepLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepLog")
            .field("lines", &self.lines.len())
            .finish()
    }
}

/// Writes every line to two writers
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    /// Combine two writers
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}
