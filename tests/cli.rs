//! Command line behaviour of the `scriptbrew` binary.

use assert_cmd::Command;
use predicates::prelude::*;

const README: &str = include_str!("fixtures/scripts/utility/README.md");
const SCRIPT: &str = include_str!("fixtures/scripts/utility/unlock-pdf.sh");

fn scriptbrew() -> Command {
    let mut cmd = Command::cargo_bin("scriptbrew").unwrap();
    for var in [
        "GITHUB_TOKEN",
        "SCRIPTBREW_CONFIG",
        "SCRIPTBREW_OWNER",
        "SCRIPTBREW_SOURCE_REPO",
        "SCRIPTBREW_TAP_REPO",
        "SCRIPTBREW_SOURCE_ROOT",
        "SCRIPTBREW_TAP_ROOT",
        "SCRIPTBREW_API_URL",
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "info");
    cmd
}

/// Config file with no keys, keeping the user's own configuration out of the run.
fn empty_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();
    path
}

#[test]
fn missing_script_prints_usage() {
    scriptbrew()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn empty_script_is_an_invalid_argument() {
    let dir = tempfile::tempdir().unwrap();
    scriptbrew()
        .arg("--config")
        .arg(empty_config(&dir))
        .arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn publishes_against_release_api() {
    let mut server = mockito::Server::new();
    let tarball_url = format!("{}/tarball/v1.0", server.url());
    let _release = server
        .mock("GET", "/repos/acme/scripts/releases/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"tag_name": "v1.0", "tarball_url": "{tarball_url}", "name": "First"}}"#
        ))
        .create();
    let _archive = server
        .mock("GET", "/tarball/v1.0")
        .with_status(200)
        .with_body("tarball bytes")
        .create();

    let dir = tempfile::tempdir().unwrap();
    let source_root = dir.path().join("scripts");
    let utility = source_root.join("utility");
    std::fs::create_dir_all(&utility).unwrap();
    std::fs::write(utility.join("README.md"), README).unwrap();
    std::fs::write(utility.join("unlock-pdf.sh"), SCRIPT).unwrap();
    let config_file = dir.path().join("config.toml");
    std::fs::write(&config_file, "owner = \"acme\"\nsource_repo = \"scripts\"\n").unwrap();

    // An empty PATH hides dpkg-deb, so the Debian stage is skipped.
    let empty_path = dir.path().join("bin");
    std::fs::create_dir_all(&empty_path).unwrap();

    scriptbrew()
        .env("PATH", &empty_path)
        .arg("--config")
        .arg(&config_file)
        .arg("--api-url")
        .arg(server.url())
        .arg("--source-root")
        .arg(&source_root)
        .arg("--print")
        .arg("utility/unlock-pdf.sh")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("class UnlockPdf < Formula"))
        .stderr(predicate::str::contains("skipping Debian package"));

    let formula = std::fs::read_to_string(
        dir.path()
            .join("homebrew-scripts")
            .join("Formula")
            .join("unlock-pdf.rb"),
    )
    .unwrap();
    assert!(formula.contains("desc \"Unlocks a password-protected PDF\""));
    assert!(formula.contains("depends_on \"install-dependency\""));
}

#[test]
fn missing_release_exits_non_zero_with_hint() {
    let mut server = mockito::Server::new();
    let _release = server
        .mock("GET", "/repos/acme/scripts/releases/latest")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create();

    let dir = tempfile::tempdir().unwrap();
    scriptbrew()
        .arg("--config")
        .arg(empty_config(&dir))
        .args(["--owner", "acme", "--source-repo", "scripts", "--skip-deb"])
        .arg("--api-url")
        .arg(server.url())
        .arg("--source-root")
        .arg(dir.path())
        .arg("utility/unlock-pdf.sh")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No release found for acme/scripts"))
        .stderr(predicate::str::contains("Publish a release"));
}
