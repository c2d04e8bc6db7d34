//! Error types for publishing operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for publishing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all publishing operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed script path
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Reason for the error
        reason: String,
    },

    /// The release metadata request failed at the transport level
    #[error("Network error while requesting {url}: {reason}")]
    NetworkError {
        /// Endpoint that was requested
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// The release API answered but reported no usable release
    #[error("No release found for {owner}/{repo}: {reason}")]
    NoReleaseFound {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Which part of the response was missing
        reason: String,
    },

    /// Archive download or digest computation failed
    #[error("Checksum error for {url}: {reason}")]
    ChecksumError {
        /// Archive URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// README expected next to the script does not exist
    #[error("README not found: {}", path.display())]
    MissingReadme {
        /// Expected README location
        path: PathBuf,
    },

    /// README exists but has no matching heading or no body below it
    #[error("No description for '{package}' in {}: expected a heading like '{pattern}' followed by a line of text", path.display())]
    MissingDescription {
        /// Package name that was searched for
        package: String,
        /// README that was scanned
        path: PathBuf,
        /// Heading pattern the scan expected
        pattern: String,
    },

    /// Dependency section absent or empty
    #[error("No dependencies declared under '{heading}' in {}", path.display())]
    MissingDependencies {
        /// Section heading that was searched for
        heading: String,
        /// README that was scanned
        path: PathBuf,
    },

    /// External packaging tool is not installed
    #[error("Packaging tool '{tool}' is not available")]
    PackagingToolUnavailable {
        /// Tool name
        tool: String,
    },

    /// Packaging tool ran but no artifact was produced
    #[error("Package build failed for {}: {reason}", output.display())]
    PackageBuildError {
        /// Expected artifact path
        output: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Configuration file could not be loaded
    #[error("Configuration error: {reason}")]
    Config {
        /// Reason for the error
        reason: String,
    },

    /// Template registration or rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// Filesystem operation failed
    #[error("Failed {context} ({}): {source}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Error::InvalidArgument { .. } => {
                vec!["Pass the script path relative to the scripts repository root, e.g. utility/unlock-pdf.sh".to_string()]
            }
            Error::NetworkError { .. } => vec![
                "Check your network connection".to_string(),
                "Set GITHUB_TOKEN if the API is rate limiting anonymous requests".to_string(),
            ],
            Error::NoReleaseFound { owner, repo, .. } => vec![format!(
                "Publish a release of {owner}/{repo} first, e.g. `gh release create v1.0.0`"
            )],
            Error::MissingReadme { path } => vec![format!(
                "Create {} documenting the script",
                path.display()
            )],
            Error::MissingDescription { pattern, .. } => vec![format!(
                "Add a '{pattern}' heading followed by a one-line description"
            )],
            Error::PackagingToolUnavailable { tool } => {
                vec![format!("Install {tool} to build Debian packages")]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Whether this error aborts the pipeline
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::MissingDependencies { .. } | Error::PackagingToolUnavailable { .. }
        )
    }
}

/// Extension trait attaching filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps the error with what was being done and the path involved.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::io::Result<T> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_fatal_kinds() {
        let warn = Error::MissingDependencies {
            heading: "Dependencies".into(),
            path: PathBuf::from("README.md"),
        };
        assert!(!warn.is_fatal());

        let skip = Error::PackagingToolUnavailable {
            tool: "dpkg-deb".into(),
        };
        assert!(!skip.is_fatal());

        let fatal = Error::InvalidArgument {
            reason: "empty".into(),
        };
        assert!(fatal.is_fatal());
    }

    #[test]
    fn no_release_suggests_publishing() {
        let err = Error::NoReleaseFound {
            owner: "acme".into(),
            repo: "scripts".into(),
            reason: "missing tag_name".into(),
        };
        let suggestions = err.recovery_suggestions();
        assert!(suggestions[0].contains("Publish a release of acme/scripts"));
    }

    #[test]
    fn fs_context_keeps_path() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result.fs_context("reading README", "/tmp/README.md").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("reading README"));
        assert!(message.contains("/tmp/README.md"));
    }
}
