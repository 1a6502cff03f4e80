//! Trace input handling for cache simulation
//!
//! A trace is a stream of whitespace-separated `u32` keys, one access each.
//! Lines starting with `#` are comments.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Error types for trace parsing
#[derive(Debug)]
pub enum TraceParseError {
    /// The trace could not be read
    Io(io::Error),
    /// A token is not a valid key
    InvalidKey {
        /// 1-based line number
        line: usize,
        /// The offending token
        token: String,
    },
}

impl fmt::Display for TraceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceParseError::Io(e) => write!(f, "failed to read trace: {e}"),
            TraceParseError::InvalidKey { line, token } => {
                write!(f, "invalid key {token:?} on line {line}")
            }
        }
    }
}

impl std::error::Error for TraceParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceParseError::Io(e) => Some(e),
            TraceParseError::InvalidKey { .. } => None,
        }
    }
}

impl From<io::Error> for TraceParseError {
    fn from(err: io::Error) -> Self {
        TraceParseError::Io(err)
    }
}

/// Opens `path` for reading, or standard input when `path` is `-`.
pub fn open_trace(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Streams the keys of a trace.
pub struct KeyReader<R> {
    reader: R,
    line: String,
    line_num: usize,
    pending: Vec<u32>,
}

impl<R: BufRead> KeyReader<R> {
    /// Creates a reader over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_num: 0,
            pending: Vec::new(),
        }
    }

    fn fill(&mut self) -> Result<bool, TraceParseError> {
        while self.pending.is_empty() {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(false);
            }
            self.line_num += 1;

            let content = self.line.trim();
            if content.starts_with('#') {
                continue;
            }
            for token in content.split_whitespace().rev() {
                let key = token
                    .parse::<u32>()
                    .map_err(|_| TraceParseError::InvalidKey {
                        line: self.line_num,
                        token: token.to_string(),
                    })?;
                self.pending.push(key);
            }
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for KeyReader<R> {
    type Item = Result<u32, TraceParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.fill() {
            Ok(true) => self.pending.pop().map(Ok),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R> fmt::Debug for KeyReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyReader")
            .field("line_num", &self.line_num)
            .field("pending", &self.pending.len())
            .finish()
    }
}
