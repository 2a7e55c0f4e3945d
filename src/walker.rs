//! Recursive directory walker

use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;

use log::{debug, warn};

use crate::error::Result;
use crate::options::SearchOptions;
use crate::reporter::Reporter;
use crate::types::Target;

/// Counters collected while walking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories whose entries were listed
    pub directories: usize,
    /// Directories or entries skipped because they could not be read
    pub unreadable:  usize,
}

impl WalkStats {
    /// Add another walk's counters to these
    pub fn merge(&mut self, other: Self) {
        self.directories += other.directories;
        self.unreadable += other.unreadable;
    }
}

/// Depth-first walker feeding entry names to a [`Reporter`]
///
/// Paths are built by joining entry names onto the directory being listed, so
/// the process working directory is never touched. Symbolic links are reported
/// by their own type and never followed.
#[derive(Debug)]
pub struct Walker<'a, W> {
    options:  &'a SearchOptions,
    reporter: &'a mut Reporter<W>,
    skip:     Option<&'a Path>,
    stats:    WalkStats,
}

impl<'a, W: Write> Walker<'a, W> {
    /// Create a walker reporting through `reporter`
    pub fn new(options: &'a SearchOptions, reporter: &'a mut Reporter<W>) -> Self {
        Self { options, reporter, skip: None, stats: WalkStats { directories: 0, unreadable: 0 } }
    }

    /// Never list the entries of `directory`
    ///
    /// `directory` must be spelled the way the walk will reach it, i.e. joined
    /// onto a canonical root.
    #[must_use]
    pub fn skipping(mut self, directory: &'a Path) -> Self {
        self.skip = Some(directory);
        self
    }

    /// Counters collected so far
    #[must_use]
    pub const fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Walk everything below `directory`
    ///
    /// Directories and entries that cannot be read are skipped. Returns
    /// `Break` once the reporter's result cap has been reached.
    ///
    /// # Errors
    /// Returns error only if a record cannot be written.
    pub fn walk(&mut self, directory: &Path) -> Result<ControlFlow<()>> {
        if self.skip == Some(directory) {
            debug!("skipping already searched {}", directory.display());
            return Ok(ControlFlow::Continue(()));
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                self.stats.unreadable += 1;
                if self.options.warnings {
                    warn!("cannot open directory '{}' ({e})", directory.display());
                }
                return Ok(ControlFlow::Continue(()));
            },
        };
        self.stats.directories += 1;
        debug!("walking {}", directory.display());

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.stats.unreadable += 1;
                    if self.options.warnings {
                        warn!("cannot read entry in '{}' ({e})", directory.display());
                    }
                    continue;
                },
            };

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    self.stats.unreadable += 1;
                    if self.options.warnings {
                        warn!("cannot stat file/directory '{}' ({e})", entry.path().display());
                    }
                    continue;
                },
            };

            let name = entry.file_name();
            if file_type.is_dir() {
                if self.options.target == Target::Directories
                    && self.reporter.report(directory, &name)?.is_break()
                {
                    return Ok(ControlFlow::Break(()));
                }
                if self.walk(&directory.join(&name))?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            } else if file_type.is_file()
                && self.options.target == Target::Files
                && self.reporter.report(directory, &name)?.is_break()
            {
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }
}
