//! Publishing configuration.
//!
//! [`Config`] carries every fixed name the pipeline needs (owner, repository
//! names, maintainer) and the on-disk roots it reads from and writes to.
//! It is constructed via [`ConfigBuilder`], optionally seeded from a TOML file.

use crate::error::{Error, ErrorExt, Result};
use path_absolutize::Absolutize;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Hosting owner of the scripts and tap repositories.
pub const DEFAULT_OWNER: &str = "acme";

/// Repository holding the scripts and their READMEs.
pub const DEFAULT_SOURCE_REPO: &str = "scripts";

/// Homebrew tap repository receiving generated formulae.
pub const DEFAULT_TAP_REPO: &str = "homebrew-scripts";

/// Maintainer written into Debian control files.
pub const DEFAULT_MAINTAINER: &str = "Acme Scripts <scripts@acme.dev>";

/// GitHub REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Heading introducing the dependency list in a README.
pub const DEFAULT_DEPENDENCIES_HEADING: &str = "Dependencies";

/// README file name looked up next to each script.
pub const README_FILE_NAME: &str = "README.md";

/// Main configuration for publishing operations.
///
/// # Examples
///
/// ```no_run
/// use scriptbrew::config::ConfigBuilder;
///
/// # fn example() -> scriptbrew::Result<()> {
/// let config = ConfigBuilder::new()
///     .owner("acme")
///     .source_repo("scripts")
///     .source_root("/home/me/src/scripts")
///     .build()?;
/// assert_eq!(config.homepage(), "https://github.com/acme/scripts");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Config {
    owner: String,
    source_repo: String,
    tap_repo: String,
    maintainer: String,
    source_root: PathBuf,
    tap_root: PathBuf,
    api_base_url: String,
    github_token: Option<String>,
    dependencies_heading: String,
}

impl Config {
    /// Returns the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the scripts repository name.
    pub fn source_repo(&self) -> &str {
        &self.source_repo
    }

    /// Returns the tap repository name.
    pub fn tap_repo(&self) -> &str {
        &self.tap_repo
    }

    /// Returns the Debian maintainer string.
    pub fn maintainer(&self) -> &str {
        &self.maintainer
    }

    /// Returns the local checkout of the scripts repository.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Returns the local checkout of the tap repository.
    pub fn tap_root(&self) -> &Path {
        &self.tap_root
    }

    /// Returns the release API root, without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the API token, if one was configured.
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// Returns the README heading that introduces dependencies.
    pub fn dependencies_heading(&self) -> &str {
        &self.dependencies_heading
    }

    /// Project homepage written into formulae.
    pub fn homepage(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.source_repo)
    }

    /// Directory formulae are written to.
    pub fn formula_dir(&self) -> PathBuf {
        self.tap_root.join("Formula")
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("owner", &self.owner)
            .field("source_repo", &self.source_repo)
            .field("tap_repo", &self.tap_repo)
            .field("maintainer", &self.maintainer)
            .field("source_root", &self.source_root)
            .field("tap_root", &self.tap_root)
            .field("api_base_url", &self.api_base_url)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("dependencies_heading", &self.dependencies_heading)
            .finish()
    }
}

/// On-disk configuration file.
///
/// Every key is optional; absent keys fall back to the compiled-in defaults.
///
/// ```toml
/// owner = "acme"
/// source_repo = "scripts"
/// tap_repo = "homebrew-scripts"
/// maintainer = "Acme Scripts <scripts@acme.dev>"
/// source_root = "/home/me/src/scripts"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub owner: Option<String>,
    pub source_repo: Option<String>,
    pub tap_repo: Option<String>,
    pub maintainer: Option<String>,
    pub source_root: Option<PathBuf>,
    pub tap_root: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub github_token: Option<String>,
    pub dependencies_heading: Option<String>,
}

impl ConfigFile {
    /// Parses a configuration file from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            reason: format!("invalid configuration: {e}"),
        })
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).fs_context("reading configuration", path)?;
        Self::parse(&text).map_err(|e| match e {
            Error::Config { reason } => Error::Config {
                reason: format!("{}: {reason}", path.display()),
            },
            other => other,
        })
    }

    /// Default configuration file location (`<config dir>/scriptbrew/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scriptbrew").join("config.toml"))
    }
}

/// Builder for constructing [`Config`].
///
/// Values set later override values set earlier, so a builder seeded with
/// [`ConfigBuilder::with_file`] can be refined by command line options.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    owner: Option<String>,
    source_repo: Option<String>,
    tap_repo: Option<String>,
    maintainer: Option<String>,
    source_root: Option<PathBuf>,
    tap_root: Option<PathBuf>,
    api_base_url: Option<String>,
    github_token: Option<String>,
    dependencies_heading: Option<String>,
}

impl ConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Applies every key present in a configuration file.
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        self.owner = file.owner.or(self.owner);
        self.source_repo = file.source_repo.or(self.source_repo);
        self.tap_repo = file.tap_repo.or(self.tap_repo);
        self.maintainer = file.maintainer.or(self.maintainer);
        self.source_root = file.source_root.or(self.source_root);
        self.tap_root = file.tap_root.or(self.tap_root);
        self.api_base_url = file.api_base_url.or(self.api_base_url);
        self.github_token = file.github_token.or(self.github_token);
        self.dependencies_heading = file.dependencies_heading.or(self.dependencies_heading);
        self
    }

    /// Sets the repository owner.
    ///
    /// Default: [`DEFAULT_OWNER`]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the scripts repository name.
    ///
    /// Default: [`DEFAULT_SOURCE_REPO`]
    pub fn source_repo(mut self, repo: impl Into<String>) -> Self {
        self.source_repo = Some(repo.into());
        self
    }

    /// Sets the tap repository name.
    ///
    /// Default: [`DEFAULT_TAP_REPO`]
    pub fn tap_repo(mut self, repo: impl Into<String>) -> Self {
        self.tap_repo = Some(repo.into());
        self
    }

    /// Sets the Debian maintainer (`Name <email>`).
    ///
    /// Default: [`DEFAULT_MAINTAINER`]
    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainer = Some(maintainer.into());
        self
    }

    /// Sets the local checkout of the scripts repository.
    ///
    /// Default: current directory
    pub fn source_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the local checkout of the tap repository.
    ///
    /// Default: sibling of the source root named after the tap repository
    pub fn tap_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.tap_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the release API root.
    ///
    /// Default: [`DEFAULT_API_BASE_URL`]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the API token sent as a bearer credential.
    pub fn github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// Sets the README heading that introduces dependencies.
    ///
    /// Default: [`DEFAULT_DEPENDENCIES_HEADING`]
    pub fn dependencies_heading(mut self, heading: impl Into<String>) -> Self {
        self.dependencies_heading = Some(heading.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a name is empty or the current directory
    /// cannot be determined when the source root is missing or relative.
    pub fn build(self) -> Result<Config> {
        let owner = non_empty("owner", self.owner, DEFAULT_OWNER)?;
        let source_repo = non_empty("source_repo", self.source_repo, DEFAULT_SOURCE_REPO)?;
        let tap_repo = non_empty("tap_repo", self.tap_repo, DEFAULT_TAP_REPO)?;
        let maintainer = non_empty("maintainer", self.maintainer, DEFAULT_MAINTAINER)?;
        let dependencies_heading = non_empty(
            "dependencies_heading",
            self.dependencies_heading,
            DEFAULT_DEPENDENCIES_HEADING,
        )?;

        let cwd_error = |e: std::io::Error| Error::Config {
            reason: format!("cannot determine current directory: {e}"),
        };
        let source_root = match self.source_root {
            Some(path) => path.absolutize().map_err(cwd_error)?.into_owned(),
            None => std::env::current_dir().map_err(cwd_error)?,
        };

        let tap_root = self.tap_root.unwrap_or_else(|| {
            source_root
                .parent()
                .unwrap_or(&source_root)
                .join(&tap_repo)
        });

        let api_base_url = self
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            owner,
            source_repo,
            tap_repo,
            maintainer,
            source_root,
            tap_root,
            api_base_url,
            github_token: self.github_token.filter(|t| !t.is_empty()),
            dependencies_heading,
        })
    }
}

fn non_empty(field: &str, value: Option<String>, default: &str) -> Result<String> {
    let value = value.unwrap_or_else(|| default.to_string());
    if value.trim().is_empty() {
        return Err(Error::Config {
            reason: format!("{field} cannot be empty"),
        });
    }
    Ok(value)
}
