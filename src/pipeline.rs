//! Publishing orchestration.
//!
//! [`Publisher`] runs the four stages in order:
//!
//! 1. Resolve the script path into a [`ScriptTarget`]
//! 2. Fetch the latest release and checksum its archive
//! 3. Read the description and dependencies from the README
//! 4. Upsert the Homebrew formula, then optionally build a Debian package
//!
//! The first fatal error aborts the run. A formula that was already written
//! is left in place when the Debian stage fails.
//!
//! # Example
//!
//! ```no_run
//! use scriptbrew::config::ConfigBuilder;
//! use scriptbrew::manifest::DpkgDeb;
//! use scriptbrew::release::GitHubReleases;
//! use scriptbrew::Publisher;
//!
//! # async fn example() -> scriptbrew::Result<()> {
//! let config = ConfigBuilder::new().source_root(".").build()?;
//! let releases = GitHubReleases::new(&config)?;
//! let publisher = Publisher::new(config, Box::new(releases)).with_package_tool(Box::new(DpkgDeb));
//!
//! let report = publisher.publish("utility/unlock-pdf.sh").await?;
//! println!("Formula: {}", report.formula_path.display());
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::manifest::{DebOutcome, ManifestInput, PackageTool, build_deb, write_formula};
use crate::metadata::read_metadata;
use crate::release::{ReleaseSource, fetch_release};
use crate::source::ScriptTarget;
use std::path::PathBuf;

/// Accumulated result of a publishing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Command and formula name
    pub package_name: String,

    /// Release tag as reported by the API
    pub version: String,

    /// Archive URL written into the formula
    pub archive_url: String,

    /// SHA-256 of the archive
    pub checksum: String,

    /// Description from the README
    pub description: String,

    /// Dependencies from the README
    pub dependencies: Vec<String>,

    /// Where the formula was written
    pub formula_path: PathBuf,

    /// Rendered formula text
    pub formula: String,

    /// Debian stage outcome; `None` when the stage was not requested
    pub deb: Option<DebOutcome>,
}

/// Main publishing orchestrator.
///
/// Holds the configuration and the injected collaborators.
pub struct Publisher {
    config: Config,
    releases: Box<dyn ReleaseSource>,
    package_tool: Option<Box<dyn PackageTool>>,
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("config", &self.config)
            .field("releases", &"<ReleaseSource>")
            .field(
                "package_tool",
                &self.package_tool.as_ref().map(|tool| tool.name().to_string()),
            )
            .finish()
    }
}

impl Publisher {
    /// Creates a publisher without a Debian stage.
    pub fn new(config: Config, releases: Box<dyn ReleaseSource>) -> Self {
        Self {
            config,
            releases,
            package_tool: None,
        }
    }

    /// Enables the Debian stage using `tool`.
    pub fn with_package_tool(mut self, tool: Box<dyn PackageTool>) -> Self {
        self.package_tool = Some(tool);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Publishes the script at `script_path` (relative to the source root).
    pub async fn publish(&self, script_path: &str) -> Result<PublishReport> {
        let target = ScriptTarget::resolve(script_path, &self.config)?;
        log::info!("Publishing {} as '{}'", target.relative_path, target.package_name);

        let archive = fetch_release(self.releases.as_ref(), &self.config).await?;
        let metadata = read_metadata(&target, &self.config).await?;

        let input = ManifestInput {
            target: &target,
            archive: &archive,
            metadata: &metadata,
        };

        let (formula_path, formula) = write_formula(&input, &self.config).await?;

        let deb = match &self.package_tool {
            Some(tool) => Some(build_deb(&input, &self.config, tool.as_ref()).await?),
            None => {
                log::debug!("Debian stage not requested");
                None
            }
        };

        Ok(PublishReport {
            package_name: target.package_name,
            version: archive.release.version,
            archive_url: archive.release.archive_url,
            checksum: archive.checksum,
            description: metadata.description,
            dependencies: metadata.dependencies,
            formula_path,
            formula,
            deb,
        })
    }
}
