//! Packaging tool discovery.
//!
//! The Debian generator needs `dpkg-deb`; its absence only skips that stage.

use std::path::Path;
use std::sync::LazyLock;

/// Name of the Debian package builder.
pub const DPKG_DEB: &str = "dpkg-deb";

/// Whether `dpkg-deb` is on `PATH` and answers `--version`.
///
/// Probed once per process.
pub static HAS_DPKG_DEB: LazyLock<bool> = LazyLock::new(|| match which::which(DPKG_DEB) {
    Ok(path) => answers_version_query(&path),
    Err(e) => {
        log::debug!("{} is not on PATH ({}); .deb output disabled", DPKG_DEB, e);
        false
    }
});

/// Runs `<tool> --version` and reports whether it exited cleanly.
fn answers_version_query(tool: &Path) -> bool {
    let output = match std::process::Command::new(tool).arg("--version").output() {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Cannot execute {}: {}; .deb output disabled", tool.display(), e);
            return false;
        }
    };

    if !output.status.success() {
        log::warn!(
            "{} --version exited with {:?}; .deb output disabled: {}",
            tool.display(),
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return false;
    }

    let banner = String::from_utf8_lossy(&output.stdout);
    log::debug!(
        "Using {} ({})",
        tool.display(),
        banner.lines().next().unwrap_or_default().trim()
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_does_not_answer() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!answers_version_query(&dir.path().join("no-such-tool")));
    }
}
