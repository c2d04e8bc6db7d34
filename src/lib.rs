//! Release-to-package publishing for a scripts repository
//!
//! This library turns one script of a scripts repository into:
//! - a Homebrew formula pointing at the repository's latest release archive
//! - optionally, a Debian package installing the script to `/usr/local/bin`
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod pipeline;
pub mod release;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pipeline::{PublishReport, Publisher};
