//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and turns the
//! parsed arguments into a [`Config`].

use crate::config::{Config, ConfigBuilder, ConfigFile};
use crate::error::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

/// Publish a script as a Homebrew formula and Debian package
#[derive(Parser, Debug)]
#[command(
    name = "scriptbrew",
    version,
    about = "Publish a script as a Homebrew formula and Debian package",
    long_about = "Looks up the latest release of the scripts repository, checksums its archive,
reads the script's description and dependencies from the README next to it, and
writes <tap>/Formula/<name>.rb. A Debian package is built as well when dpkg-deb
is installed.

Usage:
  scriptbrew utility/unlock-pdf.sh
  scriptbrew --source-root ~/src/scripts --skip-deb utility/unlock-pdf.sh
  scriptbrew --owner acme --tap-root ~/src/homebrew-scripts tools/backup.sh"
)]
pub struct Args {
    /// Script path relative to the scripts repository root (e.g. utility/unlock-pdf.sh)
    #[arg(value_name = "SCRIPT")]
    pub script: String,

    /// Configuration file (default: <config dir>/scriptbrew/config.toml when present)
    #[arg(short = 'c', long, env = "SCRIPTBREW_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Owner of the scripts and tap repositories
    #[arg(long, env = "SCRIPTBREW_OWNER")]
    pub owner: Option<String>,

    /// Name of the scripts repository
    #[arg(long, env = "SCRIPTBREW_SOURCE_REPO")]
    pub source_repo: Option<String>,

    /// Name of the Homebrew tap repository
    #[arg(long, env = "SCRIPTBREW_TAP_REPO")]
    pub tap_repo: Option<String>,

    /// Debian maintainer, "Name <email>"
    #[arg(long, env = "SCRIPTBREW_MAINTAINER")]
    pub maintainer: Option<String>,

    /// Local checkout of the scripts repository (default: current directory)
    #[arg(short = 's', long, env = "SCRIPTBREW_SOURCE_ROOT", value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Local checkout of the tap repository (default: ../<tap repo>)
    #[arg(short = 't', long, env = "SCRIPTBREW_TAP_ROOT", value_name = "DIR")]
    pub tap_root: Option<PathBuf>,

    /// Release API root
    #[arg(long, env = "SCRIPTBREW_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Token for the release API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Only write the formula
    #[arg(long)]
    pub skip_deb: bool,

    /// Also print the rendered formula to stdout
    #[arg(long)]
    pub print: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.script.trim().is_empty() {
            return Err("Script path cannot be empty".to_string());
        }
        Ok(())
    }

    /// Builds the configuration: defaults, then the config file, then these arguments.
    pub fn to_config(&self) -> Result<Config> {
        let file = match &self.config {
            Some(path) => Some(ConfigFile::load(path)?),
            None => match ConfigFile::default_path() {
                Some(path) if path.is_file() => {
                    log::debug!("Using configuration {}", path.display());
                    Some(ConfigFile::load(&path)?)
                }
                _ => None,
            },
        };

        let mut builder = ConfigBuilder::new();
        if let Some(file) = file {
            builder = builder.with_file(file);
        }
        if let Some(owner) = &self.owner {
            builder = builder.owner(owner);
        }
        if let Some(repo) = &self.source_repo {
            builder = builder.source_repo(repo);
        }
        if let Some(repo) = &self.tap_repo {
            builder = builder.tap_repo(repo);
        }
        if let Some(maintainer) = &self.maintainer {
            builder = builder.maintainer(maintainer);
        }
        if let Some(root) = &self.source_root {
            builder = builder.source_root(root);
        }
        if let Some(root) = &self.tap_root {
            builder = builder.tap_root(root);
        }
        if let Some(url) = &self.api_url {
            builder = builder.api_base_url(url);
        }
        if let Some(token) = &self.github_token {
            builder = builder.github_token(token);
        }

        builder.build()
    }

    /// Validates and converts into a configuration.
    pub fn build_config(&self) -> Result<Config> {
        self.validate()
            .map_err(|reason| Error::InvalidArgument { reason })?;
        self.to_config()
    }
}
