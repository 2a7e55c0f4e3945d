//! Traversal orchestration: which roots are walked, and in what order

use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use log::{debug, error, warn};

use crate::error::Result;
use crate::matcher::Matcher;
use crate::options::SearchOptions;
use crate::reporter::Reporter;
use crate::types::ROOT_DIRECTORY;
use crate::walker::{WalkStats, Walker};

/// The directories a search starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roots {
    /// Walk `current`, then walk `root` without descending into `current`
    /// again
    Sweep {
        /// Directory searched first
        current: PathBuf,
        /// Directory searched second, normally the filesystem root
        root:    PathBuf,
    },
    /// Walk each directory in order
    Listed(Vec<PathBuf>),
}

impl Roots {
    /// The default sweep: working directory first, then the filesystem root
    ///
    /// The working directory is resolved when the search runs. If it cannot
    /// be resolved, only the root is walked.
    #[must_use]
    pub fn sweep() -> Self {
        Self::Sweep { current: PathBuf::from("."), root: PathBuf::from(ROOT_DIRECTORY) }
    }

    /// Use `directories`, or the default sweep when none were given
    #[must_use]
    pub fn from_list(directories: Vec<PathBuf>) -> Self {
        if directories.is_empty() { Self::sweep() } else { Self::Listed(directories) }
    }
}

/// Outcome of a finished search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Records written
    pub results:       usize,
    /// The result cap ended the search early
    pub capped:        bool,
    /// Listed roots that were missing or not directories
    pub skipped_roots: usize,
    /// Walk counters over all roots
    pub walk:          WalkStats,
}

/// A configured search, ready to run
#[derive(Debug)]
pub struct Search<'a> {
    options: &'a SearchOptions,
    matcher: Matcher,
}

impl<'a> Search<'a> {
    /// Compile `needles` under `options`
    ///
    /// # Errors
    /// Returns error if a wildcard needle is malformed.
    pub fn new<S: AsRef<str>>(options: &'a SearchOptions, needles: &[S]) -> Result<Self> {
        let matcher = Matcher::new(needles, options.mode, options.case_sensitive)?;
        Ok(Self { options, matcher })
    }

    /// Walk `roots`, writing one record per match to `out`
    ///
    /// # Errors
    /// Returns error if records cannot be written to `out`.
    pub fn run<W: Write>(self, roots: &Roots, out: W) -> Result<Summary> {
        let options = self.options;
        let mut reporter = Reporter::new(out, self.matcher, options);
        let mut summary = Summary::default();

        let flow = match roots {
            Roots::Sweep { current, root } => {
                if reporter.has_needles() {
                    sweep(options, &mut reporter, current, root, &mut summary)?
                } else {
                    ControlFlow::Continue(())
                }
            },
            Roots::Listed(directories) => listed(options, &mut reporter, directories, &mut summary)?,
        };

        reporter.flush()?;
        if !reporter.has_needles() && options.warnings {
            warn!("nothing was processed");
        }

        summary.results = reporter.emitted();
        summary.capped = flow.is_break();
        Ok(summary)
    }
}

fn sweep<W: Write>(
    options: &SearchOptions,
    reporter: &mut Reporter<W>,
    current: &Path,
    root: &Path,
    summary: &mut Summary,
) -> Result<ControlFlow<()>> {
    let first = resolve(options, current);
    if let Some(first) = &first {
        if walk_root(options, reporter, first, None, summary)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
    }

    match resolve(options, root) {
        Some(root) => walk_root(options, reporter, &root, first.as_deref(), summary),
        None => Ok(ControlFlow::Continue(())),
    }
}

fn listed<W: Write>(
    options: &SearchOptions,
    reporter: &mut Reporter<W>,
    directories: &[PathBuf],
    summary: &mut Summary,
) -> Result<ControlFlow<()>> {
    for directory in directories {
        if !fs::metadata(directory).is_ok_and(|metadata| metadata.is_dir()) {
            error!("cannot stat directory '{}'", directory.display());
            summary.skipped_roots += 1;
            continue;
        }
        if !reporter.has_needles() {
            continue;
        }

        let Some(directory) = resolve(options, directory) else {
            continue;
        };
        if walk_root(options, reporter, &directory, None, summary)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
    }

    Ok(ControlFlow::Continue(()))
}

/// Canonical absolute form of a root, so records carry absolute paths
fn resolve(options: &SearchOptions, directory: &Path) -> Option<PathBuf> {
    match fs::canonicalize(directory) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            if options.warnings {
                warn!("cannot open directory '{}' ({e})", directory.display());
            }
            None
        },
    }
}

fn walk_root<W: Write>(
    options: &SearchOptions,
    reporter: &mut Reporter<W>,
    root: &Path,
    skip: Option<&Path>,
    summary: &mut Summary,
) -> Result<ControlFlow<()>> {
    debug!("searching {}", root.display());
    let mut walker = Walker::new(options, reporter);
    if let Some(skip) = skip {
        walker = walker.skipping(skip);
    }

    let flow = walker.walk(root)?;
    summary.walk.merge(walker.stats());
    Ok(flow)
}
