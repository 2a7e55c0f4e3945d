//! Search configuration, built once from the command line

use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::matcher::MatchMode;
use crate::types::Target;

/// How result records are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFormat {
    /// Space-separated records on one line, quoted when they contain a space
    pub single_line:  bool,
    /// Quote records that contain a space
    pub quote_spaces: bool,
}

impl OutputFormat {
    /// Byte written after each record
    #[must_use]
    pub const fn terminator(self) -> u8 {
        if self.single_line { b' ' } else { b'\n' }
    }

    /// Whether a record for `name` in `directory` gets surrounding quotes
    #[must_use]
    pub fn should_quote(self, directory: &[u8], name: &[u8]) -> bool {
        (self.single_line || self.quote_spaces) && (directory.contains(&b' ') || name.contains(&b' '))
    }
}

/// Immutable options shared by the walker and the reporter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Compare names without case folding
    pub case_sensitive: bool,
    /// Active match mode
    pub mode:           MatchMode,
    /// Report directories or regular files
    pub target:         Target,
    /// Stop after this many results
    pub max_results:    Option<NonZeroUsize>,
    /// Record formatting
    pub format:         OutputFormat,
    /// Log unreadable directories and entries
    pub warnings:       bool,
}

/// Parse the `-n` value
///
/// # Errors
/// Returns [`Error::InvalidMax`] unless `value` is a positive integer.
pub fn parse_max_results(value: &str) -> Result<NonZeroUsize> {
    value.trim().parse::<usize>().ok().and_then(NonZeroUsize::new).ok_or_else(|| Error::invalid_max(value))
}

/// Split a `-d` value into directories on `:` and `;`
pub fn split_directories(value: &str) -> impl Iterator<Item = PathBuf> + '_ {
    value.split([':', ';']).filter(|part| !part.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert!(!options.case_sensitive);
        assert_eq!(options.mode, MatchMode::Wildcard);
        assert_eq!(options.target, Target::Directories);
        assert_eq!(options.max_results, None);
        assert_eq!(options.format.terminator(), b'\n');
    }

    #[test]
    fn test_parse_max_results() {
        assert_eq!(parse_max_results("3").unwrap().get(), 3);
        assert_eq!(parse_max_results(" 12 ").unwrap().get(), 12);
        assert!(matches!(parse_max_results("0"), Err(Error::InvalidMax(_))));
        assert!(matches!(parse_max_results("-4"), Err(Error::InvalidMax(_))));
        assert!(matches!(parse_max_results("ten"), Err(Error::InvalidMax(_))));
    }

    #[test]
    fn test_split_directories() {
        let dirs: Vec<_> = split_directories("/usr:/opt;/srv").collect();
        assert_eq!(dirs, [PathBuf::from("/usr"), PathBuf::from("/opt"), PathBuf::from("/srv")]);

        let dirs: Vec<_> = split_directories("a::b;").collect();
        assert_eq!(dirs, [PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_quoting() {
        let plain = OutputFormat::default();
        assert!(!plain.should_quote(b"/my dir", b"x"));

        let quoted = OutputFormat { quote_spaces: true, ..OutputFormat::default() };
        assert!(quoted.should_quote(b"/my dir", b"x"));
        assert!(quoted.should_quote(b"/tmp", b"a b"));
        assert!(!quoted.should_quote(b"/tmp", b"ab"));
        assert_eq!(quoted.terminator(), b'\n');

        let xargs = OutputFormat { single_line: true, ..OutputFormat::default() };
        assert!(xargs.should_quote(b"/tmp", b"a b"));
        assert_eq!(xargs.terminator(), b' ');
    }
}
