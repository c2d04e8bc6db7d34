//! Script path resolution inside the scripts repository

use crate::config::{Config, README_FILE_NAME};
use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// A script located inside the scripts repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTarget {
    /// Path as given, relative to the repository root (e.g. `utility/unlock-pdf.sh`)
    pub relative_path: String,

    /// File name without its final extension; the installed command name
    pub package_name: String,

    /// README expected next to the script
    pub readme_path: PathBuf,

    /// Script file on disk
    pub script_path: PathBuf,
}

impl ScriptTarget {
    /// Resolves a user-supplied relative script path against the source root.
    pub fn resolve(relative_path: &str, config: &Config) -> Result<Self> {
        let relative_path = relative_path.trim();
        if relative_path.is_empty() {
            return Err(invalid("script path cannot be empty"));
        }

        let path = Path::new(relative_path);
        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid(format!(
                        "script path must stay inside the repository: {relative_path}"
                    )));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid(format!(
                        "script path must be relative to the repository root: {relative_path}"
                    )));
                }
            }
        }

        let package_name = package_name(relative_path)?;

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let readme_path = config.source_root().join(directory).join(README_FILE_NAME);
        let script_path = config.source_root().join(path);

        log::debug!(
            "Resolved {} -> package '{}', README {}",
            relative_path,
            package_name,
            readme_path.display()
        );

        Ok(Self {
            relative_path: relative_path.to_string(),
            package_name,
            readme_path,
            script_path,
        })
    }
}

/// Derives the package name: the file name with its final extension removed.
///
/// `utility/unlock-pdf.sh` -> `unlock-pdf`, `a/b/c/tool` -> `tool`.
pub fn package_name(relative_path: &str) -> Result<String> {
    let file_name = Path::new(relative_path)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| invalid(format!("script path has no file name: {relative_path}")))?;

    let stem = match file_name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => file_name,
    };

    if stem.is_empty() {
        return Err(invalid(format!(
            "script file name has no base name: {file_name}"
        )));
    }

    Ok(stem.to_string())
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidArgument {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    fn config() -> Config {
        ConfigBuilder::new()
            .source_root("/work/scripts")
            .build()
            .unwrap()
    }

    #[test]
    fn name_ignores_directory_depth() {
        assert_eq!(package_name("unlock-pdf.sh").unwrap(), "unlock-pdf");
        assert_eq!(package_name("utility/unlock-pdf.sh").unwrap(), "unlock-pdf");
        assert_eq!(package_name("a/b/c/unlock-pdf.sh").unwrap(), "unlock-pdf");
    }

    #[test]
    fn only_final_extension_is_removed() {
        assert_eq!(package_name("tools/backup.tar.sh").unwrap(), "backup.tar");
        assert_eq!(package_name("tools/no-extension").unwrap(), "no-extension");
    }

    #[test]
    fn resolves_readme_next_to_script() {
        let target = ScriptTarget::resolve("utility/unlock-pdf.sh", &config()).unwrap();
        assert_eq!(target.package_name, "unlock-pdf");
        assert_eq!(
            target.readme_path,
            PathBuf::from("/work/scripts/utility/README.md")
        );
        assert_eq!(
            target.script_path,
            PathBuf::from("/work/scripts/utility/unlock-pdf.sh")
        );
    }

    #[test]
    fn top_level_script_uses_root_readme() {
        let target = ScriptTarget::resolve("setup.sh", &config()).unwrap();
        assert_eq!(target.readme_path, PathBuf::from("/work/scripts/README.md"));
    }

    #[test]
    fn rejects_unusable_paths() {
        for input in ["", "   ", "utility/.sh", "/etc/passwd", "../outside.sh"] {
            let err = ScriptTarget::resolve(input, &config()).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument { .. }),
                "expected InvalidArgument for {input:?}, got {err:?}"
            );
        }
    }
}
