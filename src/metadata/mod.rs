//! Description and dependency discovery from a script's README
//!
//! The README is loosely structured Markdown. Two independent scans run over
//! it:
//!
//! - the description scan finds the heading naming the script and takes the
//!   first non-blank line below it
//! - the dependency scan finds the dependency section and collects the
//!   backtick-quoted name of each list item until the list ends
//!
//! ```text
//! ### unlock-pdf
//!
//! Unlocks a password-protected PDF
//!
//! #### Dependencies
//! - `install-dependency` installs missing tools
//! - `qpdf`
//! ```

use crate::config::Config;
use crate::error::{Error, ErrorExt, Result};
use crate::source::ScriptTarget;
use std::path::Path;

/// Emphasis markers tolerated around heading text.
const EMPHASIS: &[char] = &['*', '_', '`'];

/// Metadata recovered from a README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptMetadata {
    /// One-line description of the script
    pub description: String,

    /// Declared dependencies in document order, duplicates preserved
    pub dependencies: Vec<String>,
}

impl ScriptMetadata {
    /// Runs both scans over README text.
    ///
    /// A missing description is fatal; a missing dependency list is logged
    /// and yields an empty list.
    pub fn from_readme(
        text: &str,
        package_name: &str,
        dependencies_heading: &str,
        readme_path: &Path,
    ) -> Result<Self> {
        let description =
            extract_description(text, package_name).ok_or_else(|| Error::MissingDescription {
                package: package_name.to_string(),
                path: readme_path.to_path_buf(),
                pattern: format!("### {package_name}"),
            })?;

        let dependencies = extract_dependencies(text, dependencies_heading);
        if dependencies.is_empty() {
            let warning = Error::MissingDependencies {
                heading: dependencies_heading.to_string(),
                path: readme_path.to_path_buf(),
            };
            log::warn!("{}; continuing without dependencies", warning);
        }

        Ok(Self {
            description,
            dependencies,
        })
    }
}

/// Reads the README next to `target` and extracts its metadata.
pub async fn read_metadata(target: &ScriptTarget, config: &Config) -> Result<ScriptMetadata> {
    let path = &target.readme_path;
    log::info!("Reading metadata from {}", path.display());

    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingReadme { path: path.clone() });
        }
        Err(e) => return Err(e).fs_context("reading README", path),
    };

    let metadata = ScriptMetadata::from_readme(
        &text,
        &target.package_name,
        config.dependencies_heading(),
        path,
    )?;

    log::info!("Description: {}", metadata.description);
    log::info!("Dependencies: {:?}", metadata.dependencies);
    Ok(metadata)
}

enum DescriptionScan {
    SearchingHeading,
    AwaitingBody,
}

/// Returns the first non-blank line after the first heading naming `package_name`.
///
/// Returns `None` when no heading matches or nothing follows it.
pub fn extract_description(text: &str, package_name: &str) -> Option<String> {
    let mut state = DescriptionScan::SearchingHeading;

    for line in text.lines() {
        match state {
            DescriptionScan::SearchingHeading => {
                if heading_names_package(line, package_name) {
                    state = DescriptionScan::AwaitingBody;
                }
            }
            DescriptionScan::AwaitingBody => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }

    None
}

enum DependencyScan {
    SearchingSection,
    InSection,
}

/// Collects backtick-quoted names from the list directly under `heading`.
///
/// Only the first section is read and the list ends at the first line that
/// is not a list item, blank lines included.
pub fn extract_dependencies(text: &str, heading: &str) -> Vec<String> {
    let mut state = DependencyScan::SearchingSection;
    let mut dependencies = Vec::new();

    for line in text.lines() {
        match state {
            DependencyScan::SearchingSection => {
                if is_section_heading(line, heading) {
                    state = DependencyScan::InSection;
                }
            }
            DependencyScan::InSection => {
                let Some(item) = list_item(line) else {
                    break;
                };
                if let Some(name) = first_code_span(item) {
                    dependencies.push(name.to_string());
                }
            }
        }
    }

    dependencies
}

/// Text of an ATX heading (`#` to `######` followed by whitespace).
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

/// `### unlock-pdf`, `## **unlock-pdf**`, `### unlock-pdf.sh` and
/// `### unlock-pdf (macOS)` name `unlock-pdf`; `### unlock-pdf-extra` does not.
///
/// The name is matched against the raw heading first so names starting with
/// `_` survive; an emphasis opener must be closed by its mirror after the name.
fn heading_names_package(line: &str, package_name: &str) -> bool {
    let Some(text) = heading_text(line) else {
        return false;
    };
    if text
        .strip_prefix(package_name)
        .is_some_and(|rest| heading_tail_matches(rest, ""))
    {
        return true;
    }

    let opener_len = text.len() - text.trim_start_matches(EMPHASIS).len();
    (1..=opener_len).any(|len| {
        let (opener, rest) = text.split_at(len);
        let closer: String = opener.chars().rev().collect();
        rest.strip_prefix(package_name)
            .is_some_and(|rest| heading_tail_matches(rest, &closer))
    })
}

/// What may follow the name: a file extension, the emphasis closer, a colon,
/// then whitespace or nothing.
fn heading_tail_matches(rest: &str, closer: &str) -> bool {
    let rest = strip_extension(rest);
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let Some(rest) = rest.strip_prefix(closer) else {
        return false;
    };
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    rest.is_empty() || rest.starts_with(char::is_whitespace)
}

fn strip_extension(rest: &str) -> &str {
    let Some(after_dot) = rest.strip_prefix('.') else {
        return rest;
    };
    let ext_len = after_dot
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_dot.len());
    if ext_len == 0 { rest } else { &after_dot[ext_len..] }
}

/// Matches `## Dependencies`, `#### **Dependencies:**` and `**Dependencies**`.
fn is_section_heading(line: &str, heading: &str) -> bool {
    let text = line.trim().trim_start_matches('#').trim();
    let text = text.trim_matches(EMPHASIS);
    let text = text.strip_suffix(':').unwrap_or(text).trim_matches(EMPHASIS);
    !text.is_empty() && text.trim().eq_ignore_ascii_case(heading)
}

/// Content after a `-`, `*` or `+` list marker.
fn list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    ['-', '*', '+'].into_iter().find_map(|marker| {
        let rest = trimmed.strip_prefix(marker)?;
        (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
    })
}

/// First non-empty run between a pair of backticks.
fn first_code_span(text: &str) -> Option<&str> {
    let (_, after_open) = text.split_once('`')?;
    let (span, _) = after_open.split_once('`')?;
    let span = span.trim();
    (!span.is_empty()).then_some(span)
}
