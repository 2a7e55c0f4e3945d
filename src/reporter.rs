//! Result records and the result cap

use std::ffi::OsStr;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::ops::ControlFlow;
use std::path::Path;

use crate::error::Result;
use crate::matcher::Matcher;
use crate::options::{OutputFormat, SearchOptions};
use crate::types::{PATH_DELIMITER, QUOTE};

/// Counts emitted results against an optional cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCounter {
    emitted: usize,
    cap:     Option<NonZeroUsize>,
}

impl ResultCounter {
    /// Create a counter; `None` means unlimited
    #[must_use]
    pub const fn new(cap: Option<NonZeroUsize>) -> Self {
        Self { emitted: 0, cap }
    }

    /// Number of results emitted so far
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// Whether the cap has been reached
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cap.is_some_and(|cap| self.emitted >= cap.get())
    }

    /// Count one emitted result, breaking once the cap is reached
    pub fn record(&mut self) -> ControlFlow<()> {
        self.emitted += 1;
        if self.is_exhausted() { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    }
}

/// Matches names against the needle set and writes a record for each hit
#[derive(Debug)]
pub struct Reporter<W> {
    out:     W,
    matcher: Matcher,
    format:  OutputFormat,
    counter: ResultCounter,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing to `out`
    pub fn new(out: W, matcher: Matcher, options: &SearchOptions) -> Self {
        Self {
            out,
            matcher,
            format: options.format,
            counter: ResultCounter::new(options.max_results),
        }
    }

    /// Report `name` inside `directory` if any needle matches it
    ///
    /// Returns `Break` once the result cap has been reached; the caller must
    /// stop walking.
    ///
    /// # Errors
    /// Returns error if the record cannot be written.
    pub fn report(&mut self, directory: &Path, name: &OsStr) -> Result<ControlFlow<()>> {
        if self.counter.is_exhausted() {
            return Ok(ControlFlow::Break(()));
        }
        if !self.matcher.is_match(&name.to_string_lossy()) {
            return Ok(ControlFlow::Continue(()));
        }

        self.write_record(directory, name)?;
        Ok(self.counter.record())
    }

    fn write_record(&mut self, directory: &Path, name: &OsStr) -> io::Result<()> {
        let directory = directory.as_os_str().as_encoded_bytes();
        let name = name.as_encoded_bytes();
        let quote = self.format.should_quote(directory, name);

        if quote {
            self.out.write_all(&[QUOTE])?;
        }
        self.out.write_all(directory)?;
        if directory.last() != Some(&PATH_DELIMITER) {
            self.out.write_all(&[PATH_DELIMITER])?;
        }
        self.out.write_all(name)?;
        if quote {
            self.out.write_all(&[QUOTE])?;
        }
        self.out.write_all(&[self.format.terminator()])
    }

    /// Number of records written
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.counter.emitted()
    }

    /// Whether the needle set is empty
    #[must_use]
    pub const fn has_needles(&self) -> bool {
        !self.matcher.is_empty()
    }

    /// Flush buffered records
    ///
    /// # Errors
    /// Returns error if the sink cannot be flushed.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Take back the output sink
    pub fn into_inner(self) -> W {
        self.out
    }
}
