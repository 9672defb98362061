//! Write progress reporting.

use std::io::{self, Write};

/// Erase the current terminal line and return the cursor to column 0.
const CLEAR_LINE: &str = "\x1b[2K\r";

/// Prints `done/total` in place while documents are written.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    total: usize,
    enabled: bool,
}

impl Progress {
    /// Reporter for `total` writes; does nothing unless `enabled`.
    pub fn new(total: usize, enabled: bool) -> Self {
        Self { total, enabled }
    }

    /// Report that `done` writes have completed.
    pub fn update<W: Write>(&self, out: &mut W, done: usize) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        write!(out, "{CLEAR_LINE}{done}/{}", self.total)?;
        out.flush()
    }

    /// Terminate the progress line.
    pub fn finish<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.enabled {
            writeln!(out)?;
        }
        Ok(())
    }
}
