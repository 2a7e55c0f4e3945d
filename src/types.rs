//! Common types and constants for `pathfind`

use std::path::MAIN_SEPARATOR;

/// Version banner printed by `-v` and above the usage text
pub const VERSION_INFO: &str = concat!("pathfind v", env!("CARGO_PKG_VERSION"));

/// Root of the filesystem, walked by the second pass of the default sweep
#[cfg(windows)]
pub const ROOT_DIRECTORY: &str = "C:\\";
/// Root of the filesystem, walked by the second pass of the default sweep
#[cfg(not(windows))]
pub const ROOT_DIRECTORY: &str = "/";

/// Separator written between a directory and a matched name
#[allow(clippy::cast_possible_truncation)]
pub const PATH_DELIMITER: u8 = MAIN_SEPARATOR as u8;

/// Quote written around records that contain a space
pub const QUOTE: u8 = b'"';

/// Kind of entry a search reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    /// Directories (the default)
    #[default]
    Directories,
    /// Regular files
    Files,
}

const _: () = {
    assert!(PATH_DELIMITER.is_ascii());
    assert!(!ROOT_DIRECTORY.is_empty());
};
