//! Debian package (.deb) generation.
//!
//! Stages a package tree next to the scripts repository root, hands it to a
//! [`PackageTool`] and removes the staging tree again.
//!
//! # Staging layout
//!
//! ```text
//! <source_root>/<name>_<version>_all/
//! ├── DEBIAN/control
//! └── usr/local/bin/<name>
//! ```

use super::ManifestInput;
use super::tool_detection::{DPKG_DEB, HAS_DPKG_DEB};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::utils::fs;
use async_trait::async_trait;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Architecture marker for scripts.
pub const ARCHITECTURE: &str = "all";

/// Install location of the script inside the package.
const BIN_DIR: &str = "usr/local/bin";

const CONTROL_TEMPLATE: &str = "Package: {{package}}
Version: {{version}}
Section: utils
Priority: optional
Architecture: {{architecture}}
{{#if depends}}Depends: {{depends}}
{{/if}}Maintainer: {{maintainer}}
Homepage: {{homepage}}
Description: {{description}}
 {{long_description}}
";

#[derive(Serialize)]
struct ControlData {
    package: String,
    version: String,
    architecture: &'static str,
    depends: String,
    maintainer: String,
    homepage: String,
    description: String,
    long_description: String,
}

/// Builds a binary package from a staging tree.
#[async_trait]
pub trait PackageTool: Send + Sync {
    /// Tool name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the tool can run on this host.
    fn is_available(&self) -> bool;

    /// Packs `staging_dir` into `output`.
    async fn build(&self, staging_dir: &Path, output: &Path) -> Result<()>;
}

/// [`PackageTool`] running `dpkg-deb --build`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DpkgDeb;

#[async_trait]
impl PackageTool for DpkgDeb {
    fn name(&self) -> &str {
        DPKG_DEB
    }

    fn is_available(&self) -> bool {
        *HAS_DPKG_DEB
    }

    async fn build(&self, staging_dir: &Path, output: &Path) -> Result<()> {
        log::debug!(
            "Running {} --build {} {}",
            DPKG_DEB,
            staging_dir.display(),
            output.display()
        );

        let result = tokio::process::Command::new(DPKG_DEB)
            .arg("--build")
            .arg("--root-owner-group")
            .arg(staging_dir)
            .arg(output)
            .output()
            .await
            .map_err(|e| Error::PackageBuildError {
                output: output.to_path_buf(),
                reason: format!("failed to execute {DPKG_DEB}: {e}"),
            })?;

        if !result.status.success() {
            return Err(Error::PackageBuildError {
                output: output.to_path_buf(),
                reason: format!(
                    "{DPKG_DEB} exited with {:?}: {}",
                    result.status.code(),
                    String::from_utf8_lossy(&result.stderr).trim()
                ),
            });
        }

        Ok(())
    }
}

/// Result of the optional Debian stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebOutcome {
    /// Package written to this path
    Built(PathBuf),

    /// Packaging tool missing; nothing was attempted
    Skipped {
        /// Tool that was looked for
        tool: String,
    },
}

/// Removes one leading `v`/`V` from a release tag.
///
/// `v2.3.1` -> `2.3.1`; `2.3.1` is returned unchanged.
pub fn strip_version_prefix(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

/// File stem shared by the staging tree and the artifact: `<name>_<version>_all`.
pub fn package_stem(package_name: &str, version: &str) -> String {
    format!("{package_name}_{version}_{ARCHITECTURE}")
}

/// Renders the `DEBIAN/control` file.
pub fn render_control(input: &ManifestInput<'_>, config: &Config) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let package = &input.target.package_name;
    let data = ControlData {
        package: package.clone(),
        version: strip_version_prefix(&input.archive.release.version).to_string(),
        architecture: ARCHITECTURE,
        depends: input.metadata.dependencies.join(", "),
        maintainer: config.maintainer().to_string(),
        homepage: config.homepage(),
        description: input.metadata.description.clone(),
        long_description: format!(
            "Installs the {package} command from the {}/{} scripts collection.",
            config.owner(),
            config.source_repo()
        ),
    };

    handlebars
        .register_template_string("control", CONTROL_TEMPLATE)
        .map_err(|e| Error::Template(format!("failed to register control template: {e}")))?;

    handlebars
        .render("control", &data)
        .map_err(|e| Error::Template(format!("failed to render control template: {e}")))
}

/// Builds `<source_root>/<name>_<version>_all.deb`.
///
/// Skips with a warning when the tool is unavailable. The staging tree is
/// removed after every build attempt, successful or not.
pub async fn build_deb<T>(input: &ManifestInput<'_>, config: &Config, tool: &T) -> Result<DebOutcome>
where
    T: PackageTool + ?Sized,
{
    if !tool.is_available() {
        let skip = Error::PackagingToolUnavailable {
            tool: tool.name().to_string(),
        };
        log::warn!("{}; skipping Debian package", skip);
        return Ok(DebOutcome::Skipped {
            tool: tool.name().to_string(),
        });
    }

    let version = strip_version_prefix(&input.archive.release.version);
    let stem = package_stem(&input.target.package_name, version);
    let staging_dir = config.source_root().join(&stem);
    let output = config.source_root().join(format!("{stem}.deb"));

    if version.is_empty() {
        return Err(Error::PackageBuildError {
            output,
            reason: format!(
                "release tag '{}' has no version",
                input.archive.release.version
            ),
        });
    }
    if version.contains(['/', '\\']) || version == "." || version == ".." {
        return Err(Error::PackageBuildError {
            output,
            reason: format!(
                "release tag '{}' cannot be used in a file name",
                input.archive.release.version
            ),
        });
    }

    log::info!("Building Debian package {}", output.display());
    fs::remove_file(&output).await?;

    let attempt = async {
        stage(input, config, &staging_dir).await?;
        tool.build(&staging_dir, &output).await
    }
    .await;

    if let Err(e) = fs::remove_dir_all(&staging_dir).await {
        log::warn!("Failed to clean up staging directory: {}", e);
    }
    attempt?;

    if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
        return Err(Error::PackageBuildError {
            output,
            reason: format!("{} produced no artifact", tool.name()),
        });
    }

    log::info!("Built Debian package {}", output.display());
    Ok(DebOutcome::Built(output))
}

/// Lays out the control file and the executable script under `staging_dir`.
async fn stage(input: &ManifestInput<'_>, config: &Config, staging_dir: &Path) -> Result<()> {
    fs::create_dir_all(staging_dir, true).await?;

    let control = render_control(input, config)?;
    fs::write_file(&staging_dir.join("DEBIAN").join("control"), &control).await?;

    let installed = staging_dir
        .join(BIN_DIR)
        .join(&input.target.package_name);
    fs::copy_file(&input.target.script_path, &installed).await?;
    fs::set_executable(&installed).await?;

    log::debug!("Staged {} in {}", installed.display(), staging_dir.display());
    Ok(())
}
