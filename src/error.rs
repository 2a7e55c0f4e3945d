//! Error types for `pathfind`

use arrayvec::ArrayString;
use thiserror::Error;

/// Maximum length of error messages
pub const MAX_ERROR_LENGTH: usize = 256;

/// Custom result type for `pathfind` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `pathfind`
///
/// Configuration errors are raised before any traversal starts. Per-directory
/// and per-entry failures never surface here: the walker logs and skips them.
#[derive(Debug, Error)]
pub enum Error {
    /// IO operation failed
    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    /// More than one of the exclusive match modes was selected
    #[error("Error: 'exact', 'fuzzy', 'prefix', and 'suffix' modes are mutually exclusive")]
    ConflictingModes,

    /// Result cap was zero or not a number
    #[error("Error: MAX value must be greater than zero (got '{0}')")]
    InvalidMax(Box<ArrayString<MAX_ERROR_LENGTH>>),

    /// Wildcard needle could not be compiled
    #[error("Error: invalid wildcard pattern '{pattern}' ({source})")]
    Pattern {
        /// The needle as given on the command line
        pattern: Box<ArrayString<MAX_ERROR_LENGTH>>,
        /// Reason reported by the glob compiler
        source:  globset::Error,
    },
}

/// Copy `text` into a fixed-size buffer, truncating at a character boundary
fn bounded(text: &str) -> Box<ArrayString<MAX_ERROR_LENGTH>> {
    let mut buf = ArrayString::new();
    for c in text.chars() {
        if buf.try_push(c).is_err() {
            break;
        }
    }
    Box::new(buf)
}

impl Error {
    /// Create an invalid result cap error
    #[must_use]
    pub fn invalid_max(value: &str) -> Self {
        Self::InvalidMax(bounded(value))
    }

    /// Create a malformed wildcard pattern error
    #[must_use]
    pub fn pattern(pattern: &str, source: globset::Error) -> Self {
        Self::Pattern { pattern: bounded(pattern), source }
    }

    /// Whether the usage text should follow this error
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::ConflictingModes | Self::InvalidMax(_) | Self::Pattern { .. })
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> ArrayString<MAX_ERROR_LENGTH> {
        let mut msg = ArrayString::new();
        let text = self.to_string();
        for c in text.chars() {
            if msg.try_push(c).is_err() {
                return msg;
            }
        }
        let tip = match self {
            Self::Io(_) => "\nTip: Check file permissions and try again",
            Self::ConflictingModes => "\nTip: Pick one of -e, -z, -p or -s",
            Self::InvalidMax(_) => "\nTip: Pass a whole number such as '-n 10'",
            Self::Pattern { .. } => "\nTip: Escape literal brackets or pick another match mode",
        };
        let _ = msg.try_push_str(tip);
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_max_message() {
        let err = Error::invalid_max("0");
        assert_eq!(err.to_string(), "Error: MAX value must be greater than zero (got '0')");
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_long_values_are_truncated() {
        let value = "9".repeat(MAX_ERROR_LENGTH * 2);
        let Error::InvalidMax(buf) = Error::invalid_max(&value) else {
            panic!("Expected InvalidMax");
        };
        assert_eq!(buf.len(), MAX_ERROR_LENGTH);
    }

    #[test]
    fn test_user_message_has_tip() {
        let msg = Error::ConflictingModes.user_message();
        assert!(msg.starts_with("Error: 'exact'"));
        assert!(msg.contains("Tip:"));
    }

    #[test]
    fn test_io_is_not_usage_error() {
        let err = Error::from(std::io::Error::other("boom"));
        assert!(!err.is_usage_error());
        assert!(err.user_message().contains("boom"));
    }
}
