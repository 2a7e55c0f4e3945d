//! `pathfind` - Recursive file and directory name search.

#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

pub mod error;
pub mod matcher;
pub mod options;
pub mod reporter;
pub mod search;
pub mod types;
pub mod walker;

pub use error::{Error, Result};
pub use matcher::{MatchMode, Matcher};
pub use options::{OutputFormat, SearchOptions};
pub use search::{Roots, Search, Summary};
pub use types::Target;
