//! Name matching for every search mode

use std::borrow::Cow;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{Error, Result};

/// How needles are compared against entry names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Glob syntax: `*`, `?` and `[...]`
    #[default]
    Wildcard,
    /// Whole-name equality
    Exact,
    /// Needle characters appear in order, not necessarily adjacent
    Fuzzy,
    /// Name starts with the needle
    Prefix,
    /// Name ends with the needle
    Suffix,
}

impl MatchMode {
    /// Pick the mode from the command line switches
    ///
    /// No switch selects [`MatchMode::Wildcard`].
    ///
    /// # Errors
    /// Returns [`Error::ConflictingModes`] if more than one switch is set.
    pub fn from_flags(exact: bool, fuzzy: bool, prefix: bool, suffix: bool) -> Result<Self> {
        let switches =
            [(exact, Self::Exact), (fuzzy, Self::Fuzzy), (prefix, Self::Prefix), (suffix, Self::Suffix)];
        let mut selected = switches.into_iter().filter(|(on, _)| *on).map(|(_, mode)| mode);

        match (selected.next(), selected.next()) {
            (None, _) => Ok(Self::Wildcard),
            (Some(mode), None) => Ok(mode),
            (Some(_), Some(_)) => Err(Error::ConflictingModes),
        }
    }
}

fn fold(text: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive { Cow::Borrowed(text) } else { Cow::Owned(text.to_lowercase()) }
}

/// Whole-name equality
#[must_use]
pub fn exact_match(text: &str, pattern: &str, case_sensitive: bool) -> bool {
    fold(text, case_sensitive) == fold(pattern, case_sensitive)
}

/// Subsequence test: every character of `pattern` occurs in `text`, in order
///
/// `"aoa"` matches `"anaconda"`. An empty pattern matches everything.
#[must_use]
pub fn fuzzy_match(text: &str, pattern: &str, case_sensitive: bool) -> bool {
    let text = fold(text, case_sensitive);
    let pattern = fold(pattern, case_sensitive);
    let mut remaining = text.chars();
    pattern.chars().all(|wanted| remaining.any(|c| c == wanted))
}

/// `text` starts with `pattern`
#[must_use]
pub fn prefix_match(text: &str, pattern: &str, case_sensitive: bool) -> bool {
    fold(text, case_sensitive).starts_with(&*fold(pattern, case_sensitive))
}

/// `text` ends with `pattern`
#[must_use]
pub fn suffix_match(text: &str, pattern: &str, case_sensitive: bool) -> bool {
    fold(text, case_sensitive).ends_with(&*fold(pattern, case_sensitive))
}

/// Glob match of the whole of `text`
///
/// # Errors
/// Returns [`Error::Pattern`] if `pattern` is not a valid glob.
pub fn wildcard_match(text: &str, pattern: &str, case_sensitive: bool) -> Result<bool> {
    Ok(compile_glob(pattern, case_sensitive)?.compile_matcher().is_match(text))
}

fn compile_glob(pattern: &str, case_sensitive: bool) -> Result<Glob> {
    GlobBuilder::new(&escape_braces(pattern))
        .case_insensitive(!case_sensitive)
        .backslash_escape(true)
        .allow_unclosed_class(true)
        .build()
        .map_err(|e| Error::pattern(pattern, e))
}

/// Make `{` and `}` literal, leaving bracket expressions and escapes alone
///
/// Wildcards have no `{a,b}` alternation, so `{a` names the entry `{a`.
fn escape_braces(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['{', '}']) {
        return Cow::Borrowed(pattern);
    }

    let mut escaped = String::with_capacity(pattern.len() + 4);
    let mut rest = pattern;
    // Once a `[` is left unclosed, every later `[` is literal too
    let mut classes = true;
    while let Some(c) = rest.chars().next() {
        let len = match c {
            '\\' => 1 + rest[1..].chars().next().map_or(0, char::len_utf8),
            '[' if classes => class_len(rest).unwrap_or_else(|| {
                classes = false;
                1
            }),
            c => c.len_utf8(),
        };
        match c {
            '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            },
            _ => escaped.push_str(&rest[..len]),
        }
        rest = &rest[len..];
    }

    Cow::Owned(escaped)
}

/// Length of the closed bracket expression at the start of `pattern`
///
/// A `]` right after the opening `[` (or `[!`, `[^`) is a member, not the end.
fn class_len(pattern: &str) -> Option<usize> {
    let body = &pattern[1..];
    let negation = usize::from(body.starts_with(['!', '^']));
    let first = body[negation..].chars().next()?;
    let members = negation + first.len_utf8();
    body[members..].find(']').map(|end| 1 + members + end + 1)
}

/// Literal comparison used by every non-wildcard mode
#[derive(Debug, Clone, Copy)]
enum Literal {
    Exact,
    Fuzzy,
    Prefix,
    Suffix,
}

#[derive(Debug, Clone)]
enum Needles {
    Glob(GlobSet),
    /// Needles already case-folded
    Literal { kind: Literal, patterns: Vec<String> },
}

/// The compiled needle set for one run
///
/// A name matches when any needle matches it. An empty set matches nothing.
#[derive(Debug, Clone)]
pub struct Matcher {
    needles:        Needles,
    case_sensitive: bool,
    empty:          bool,
}

impl Matcher {
    /// Compile `needles` for `mode`
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] if a wildcard needle is malformed.
    pub fn new<S: AsRef<str>>(needles: &[S], mode: MatchMode, case_sensitive: bool) -> Result<Self> {
        let kind = match mode {
            MatchMode::Wildcard => {
                let mut builder = GlobSetBuilder::new();
                for needle in needles {
                    builder.add(compile_glob(needle.as_ref(), case_sensitive)?);
                }
                let set = builder.build().map_err(|e| Error::pattern("<needle set>", e))?;
                return Ok(Self::compiled(Needles::Glob(set), case_sensitive, needles.is_empty()));
            },
            MatchMode::Exact => Literal::Exact,
            MatchMode::Fuzzy => Literal::Fuzzy,
            MatchMode::Prefix => Literal::Prefix,
            MatchMode::Suffix => Literal::Suffix,
        };

        let patterns = needles.iter().map(|n| fold(n.as_ref(), case_sensitive).into_owned()).collect();
        Ok(Self::compiled(Needles::Literal { kind, patterns }, case_sensitive, needles.is_empty()))
    }

    const fn compiled(needles: Needles, case_sensitive: bool, empty: bool) -> Self {
        Self { needles, case_sensitive, empty }
    }

    /// Whether no needles were given
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.empty
    }

    /// Whether any needle matches `name`
    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        match &self.needles {
            Needles::Glob(set) => set.is_match(name),
            Needles::Literal { kind, patterns } => {
                let name = fold(name, self.case_sensitive);
                patterns.iter().any(|pattern| match kind {
                    Literal::Exact => name == pattern.as_str(),
                    Literal::Fuzzy => fuzzy_match(&name, pattern, true),
                    Literal::Prefix => name.starts_with(pattern.as_str()),
                    Literal::Suffix => name.ends_with(pattern.as_str()),
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults_to_wildcard() {
        assert_eq!(MatchMode::from_flags(false, false, false, false).unwrap(), MatchMode::Wildcard);
        assert_eq!(MatchMode::from_flags(false, true, false, false).unwrap(), MatchMode::Fuzzy);
        assert_eq!(MatchMode::from_flags(false, false, false, true).unwrap(), MatchMode::Suffix);
    }

    #[test]
    fn test_conflicting_modes() {
        assert!(matches!(
            MatchMode::from_flags(true, false, true, false),
            Err(Error::ConflictingModes)
        ));
        assert!(matches!(MatchMode::from_flags(true, true, true, true), Err(Error::ConflictingModes)));
    }

    #[test]
    fn test_fuzzy_is_subsequence() {
        assert!(fuzzy_match("anaconda", "aoa", true));
        assert!(fuzzy_match("report", "rpt", true));
        assert!(!fuzzy_match("report", "tpr", true));
        assert!(!fuzzy_match("rep", "repo", true));
        assert!(fuzzy_match("anything", "", true));
        assert!(fuzzy_match("AnaConda", "aoa", false));
        assert!(!fuzzy_match("ANACONDA", "aoa", true));
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert!(prefix_match("report.txt", "report", true));
        assert!(prefix_match("report_final.txt", "report", true));
        assert!(!prefix_match("rep", "report", true));
        assert!(!suffix_match("report_final.txt", "final", true));
        assert!(suffix_match("report_final.txt", "final.txt", true));
        assert!(!suffix_match("txt", "final.txt", true));
        assert!(suffix_match("README.MD", ".md", false));
    }

    #[test]
    fn test_exact_respects_case_flag() {
        assert!(exact_match("Makefile", "Makefile", true));
        assert!(!exact_match("Makefile", "makefile", true));
        assert!(exact_match("Makefile", "makefile", false));
        assert!(!exact_match("Makefile.am", "makefile", false));
    }

    #[test]
    fn test_wildcard_syntax() {
        assert!(wildcard_match("a", "a", false).unwrap());
        assert!(!wildcard_match("b", "a", false).unwrap());
        assert!(wildcard_match("main.rs", "*.rs", false).unwrap());
        assert!(wildcard_match("lib.rs", "l?b.*", false).unwrap());
        assert!(wildcard_match("b1", "[ab][0-9]", false).unwrap());
        assert!(!wildcard_match("c1", "[ab][0-9]", false).unwrap());
        assert!(wildcard_match(".hidden", "*", false).unwrap());
        assert!(wildcard_match("SRC", "src", false).unwrap());
        assert!(!wildcard_match("SRC", "src", true).unwrap());
    }

    #[test]
    fn test_invalid_wildcard() {
        assert!(matches!(wildcard_match("x", "[z-a]", false), Err(Error::Pattern { .. })));
        assert!(matches!(Matcher::new(&["ok", "[z-a]"], MatchMode::Wildcard, false), Err(Error::Pattern { .. })));
    }

    #[test]
    fn test_unclosed_class_is_literal() {
        assert!(wildcard_match("x[1", "x[1", true).unwrap());
        assert!(!wildcard_match("x1", "x[1", true).unwrap());
        assert!(wildcard_match("[abc", "[abc", true).unwrap());
        assert!(wildcard_match("x[1.txt", "x[1*", true).unwrap());
    }

    #[test]
    fn test_braces_are_literal() {
        assert!(wildcard_match("{a", "{a", true).unwrap());
        assert!(wildcard_match("a}", "a}", true).unwrap());
        assert!(wildcard_match("{a,b}", "{a,b}", true).unwrap());
        assert!(!wildcard_match("a", "{a,b}", true).unwrap());
        assert!(wildcard_match("{x", "[{}]x", true).unwrap());
        assert!(wildcard_match("}x", "[{}]x", true).unwrap());
        assert!(wildcard_match("x[1{", "x[1{", true).unwrap());
        assert!(wildcard_match("{A}.md", "{a}.*", false).unwrap());
    }

    #[test]
    fn test_escape_braces() {
        assert!(matches!(escape_braces("*.rs"), Cow::Borrowed("*.rs")));
        assert_eq!(escape_braces("{a,b}"), r"\{a,b\}");
        assert_eq!(escape_braces("[{]x{"), r"[{]x\{");
        assert_eq!(escape_braces("[]{]{"), r"[]{]\{");
        assert_eq!(escape_braces(r"\{a"), r"\{a");
        assert_eq!(escape_braces("x[1{"), r"x[1\{");
    }

    #[test]
    fn test_any_needle_matches() {
        let matcher = Matcher::new(&["target", "*.toml"], MatchMode::Wildcard, false).unwrap();
        assert!(!matcher.is_empty());
        assert!(matcher.is_match("Cargo.toml"));
        assert!(matcher.is_match("target"));
        assert!(!matcher.is_match("src"));

        let matcher = Matcher::new(&["READ", "lic"], MatchMode::Prefix, false).unwrap();
        assert!(matcher.is_match("readme.md"));
        assert!(matcher.is_match("LICENSE"));
        assert!(!matcher.is_match("Cargo.lock"));
    }

    #[test]
    fn test_empty_needles_match_nothing() {
        let none: [&str; 0] = [];
        for mode in [MatchMode::Wildcard, MatchMode::Exact, MatchMode::Fuzzy] {
            let matcher = Matcher::new(&none, mode, false).unwrap();
            assert!(matcher.is_empty());
            assert!(!matcher.is_match("anything"));
        }
    }

    #[test]
    fn test_literal_modes_fold_once() {
        let matcher = Matcher::new(&["RPT"], MatchMode::Fuzzy, false).unwrap();
        assert!(matcher.is_match("Report"));

        let matcher = Matcher::new(&["RPT"], MatchMode::Fuzzy, true).unwrap();
        assert!(!matcher.is_match("Report"));

        let matcher = Matcher::new(&["Final.TXT"], MatchMode::Suffix, false).unwrap();
        assert!(matcher.is_match("report_final.txt"));

        let matcher = Matcher::new(&["notes"], MatchMode::Exact, true).unwrap();
        assert!(matcher.is_match("notes"));
        assert!(!matcher.is_match("Notes"));

        let matcher = Matcher::new(&["Notes"], MatchMode::Exact, false).unwrap();
        assert!(matcher.is_match("NOTES"));
        assert!(!matcher.is_match("notes.txt"));
    }
}
