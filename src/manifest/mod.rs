//! Manifest generation: Homebrew formulae and Debian packages.
//!
//! # Module Organization
//!
//! - [`formula`] - Homebrew formula rendering and upsert
//! - [`debian`] - Debian package staging and build
//! - [`tool_detection`] - External tool availability checking

pub mod debian;
pub mod formula;
pub mod tool_detection;

pub use debian::{DebOutcome, DpkgDeb, PackageTool, build_deb, strip_version_prefix};
pub use formula::{class_name, render_formula, write_formula};

use crate::metadata::ScriptMetadata;
use crate::release::ReleaseArchive;
use crate::source::ScriptTarget;

/// Everything the generators need, borrowed from earlier pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct ManifestInput<'a> {
    /// Resolved script
    pub target: &'a ScriptTarget,

    /// Release and archive checksum
    pub archive: &'a ReleaseArchive,

    /// README description and dependencies
    pub metadata: &'a ScriptMetadata,
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::config::{Config, ConfigBuilder};
    use crate::metadata::ScriptMetadata;
    use crate::release::{Release, ReleaseArchive, sha256_hex};
    use crate::source::ScriptTarget;
    use std::path::Path;

    /// `acme/scripts` configuration rooted at `source_root`.
    pub(crate) fn example_config<P: AsRef<Path>>(source_root: P) -> Config {
        ConfigBuilder::new()
            .owner("acme")
            .source_repo("scripts")
            .source_root(source_root)
            .build()
            .unwrap()
    }

    /// The `utility/unlock-pdf.sh` example at release `v1.0`.
    pub(crate) fn example_input() -> (ScriptTarget, ReleaseArchive, ScriptMetadata) {
        let target = ScriptTarget::resolve("utility/unlock-pdf.sh", &example_config("/work/scripts"))
            .unwrap();
        let archive = ReleaseArchive {
            release: Release {
                version: "v1.0".to_string(),
                archive_url: "https://api.github.com/repos/acme/scripts/tarball/v1.0".to_string(),
            },
            checksum: sha256_hex(b"archive"),
        };
        let metadata = ScriptMetadata {
            description: "Unlocks a password-protected PDF".to_string(),
            dependencies: vec!["install-dependency".to_string()],
        };
        (target, archive, metadata)
    }
}
