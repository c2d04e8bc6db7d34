//! Homebrew formula generation.
//!
//! Renders a formula from a Handlebars template and upserts it into the
//! tap's `Formula/` directory.

use super::ManifestInput;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::utils::fs;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::PathBuf;

const FORMULA_TEMPLATE: &str = r#"class {{class_name}} < Formula
  desc "{{description}}"
  homepage "{{homepage}}"
  url "{{url}}"
  sha256 "{{sha256}}"
{{#if dependencies}}

{{#each dependencies}}
  depends_on "{{this}}"
{{/each}}
{{/if}}

  def install
    bin.install "{{script_path}}" => "{{command}}"
  end
end
"#;

#[derive(Serialize)]
struct FormulaData {
    class_name: String,
    description: String,
    homepage: String,
    url: String,
    sha256: String,
    dependencies: Vec<String>,
    script_path: String,
    command: String,
}

/// Converts a hyphenated package name into a Ruby class name.
///
/// Each `-`-separated segment gets its first character upper-cased and the
/// segments are joined: `unlock-pdf` -> `UnlockPdf`.
pub fn class_name(package_name: &str) -> String {
    package_name
        .split('-')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Escapes a value for a double-quoted Ruby string.
fn ruby_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("#{", "\\#{")
}

/// Renders the formula text.
///
/// Rendering is deterministic: identical inputs give byte-identical output.
pub fn render_formula(input: &ManifestInput<'_>, config: &Config) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    let data = FormulaData {
        class_name: class_name(&input.target.package_name),
        description: ruby_string(&input.metadata.description),
        homepage: ruby_string(&config.homepage()),
        url: ruby_string(&input.archive.release.archive_url),
        sha256: input.archive.checksum.clone(),
        dependencies: input
            .metadata
            .dependencies
            .iter()
            .map(|dep| ruby_string(dep))
            .collect(),
        script_path: ruby_string(&input.target.relative_path),
        command: ruby_string(&input.target.package_name),
    };

    handlebars
        .register_template_string("formula.rb", FORMULA_TEMPLATE)
        .map_err(|e| Error::Template(format!("failed to register formula template: {e}")))?;

    handlebars
        .render("formula.rb", &data)
        .map_err(|e| Error::Template(format!("failed to render formula template: {e}")))
}

/// Renders the formula and writes it to `<tap>/Formula/<package>.rb`,
/// replacing any previous version.
///
/// # Returns
///
/// Path of the written formula together with its contents.
pub async fn write_formula(
    input: &ManifestInput<'_>,
    config: &Config,
) -> Result<(PathBuf, String)> {
    let contents = render_formula(input, config)?;
    let path = config
        .formula_dir()
        .join(format!("{}.rb", input.target.package_name));

    fs::write_file(&path, &contents).await?;
    log::info!("Wrote formula {}", path.display());

    Ok((path, contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::tests::{example_config, example_input};

    #[test]
    fn class_names() {
        assert_eq!(class_name("unlock-pdf"), "UnlockPdf");
        assert_eq!(class_name("backup"), "Backup");
        assert_eq!(class_name("git-clean-branches"), "GitCleanBranches");
        assert_eq!(class_name("double--dash-"), "DoubleDash");
    }

    #[test]
    fn ruby_escaping() {
        assert_eq!(
            ruby_string(r#"Say "hi" to #{user} \o/"#),
            r#"Say \"hi\" to \#{user} \\o/"#
        );
    }

    #[test]
    fn renders_example_formula() {
        let (target, archive, metadata) = example_input();
        let input = ManifestInput {
            target: &target,
            archive: &archive,
            metadata: &metadata,
        };
        let config = example_config("/work/scripts");

        let formula = render_formula(&input, &config).unwrap();

        assert!(formula.starts_with("class UnlockPdf < Formula\n"));
        assert!(formula.contains("  desc \"Unlocks a password-protected PDF\"\n"));
        assert!(formula.contains("  homepage \"https://github.com/acme/scripts\"\n"));
        assert!(formula.contains(&format!("  sha256 \"{}\"\n", archive.checksum)));
        assert_eq!(formula.matches("depends_on").count(), 1);
        assert!(formula.contains("depends_on \"install-dependency\""));
        assert!(formula.contains("bin.install \"utility/unlock-pdf.sh\" => \"unlock-pdf\""));
        assert!(formula.trim_end().ends_with("end"));
    }

    #[test]
    fn dependencies_keep_order_and_duplicates() {
        let (target, archive, mut metadata) = example_input();
        metadata.dependencies = vec!["zeta".into(), "alpha".into(), "zeta".into()];
        let input = ManifestInput {
            target: &target,
            archive: &archive,
            metadata: &metadata,
        };

        let formula = render_formula(&input, &example_config("/work/scripts")).unwrap();
        let deps: Vec<&str> = formula
            .lines()
            .filter(|line| line.trim_start().starts_with("depends_on"))
            .map(str::trim)
            .collect();
        assert_eq!(
            deps,
            vec![
                "depends_on \"zeta\"",
                "depends_on \"alpha\"",
                "depends_on \"zeta\""
            ]
        );
    }

    #[test]
    fn no_dependencies_no_declarations() {
        let (target, archive, mut metadata) = example_input();
        metadata.dependencies.clear();
        let input = ManifestInput {
            target: &target,
            archive: &archive,
            metadata: &metadata,
        };

        let formula = render_formula(&input, &example_config("/work/scripts")).unwrap();
        assert!(!formula.contains("depends_on"));
        assert!(formula.contains("def install"));
    }

    #[tokio::test]
    async fn write_is_an_idempotent_upsert() {
        let dir = tempfile::tempdir().unwrap();
        let source_root = dir.path().join("scripts");
        let config = example_config(&source_root);
        let (target, archive, metadata) = example_input();
        let input = ManifestInput {
            target: &target,
            archive: &archive,
            metadata: &metadata,
        };

        let (path, first) = write_formula(&input, &config).await.unwrap();
        let (again, second) = write_formula(&input, &config).await.unwrap();

        assert_eq!(path, again);
        assert_eq!(
            path,
            dir.path()
                .join("homebrew-scripts")
                .join("Formula")
                .join("unlock-pdf.rb")
        );
        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }
}
