//! Command line interface for scriptbrew.
//!
//! Parses arguments, wires the production collaborators into a
//! [`Publisher`] and reports the outcome.

mod args;

pub use args::Args;

use crate::error::Result;
use crate::manifest::{DebOutcome, DpkgDeb};
use crate::pipeline::{PublishReport, Publisher};
use crate::release::GitHubReleases;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    run_with(&args).await
}

/// Executes an already-parsed command line.
pub async fn run_with(args: &Args) -> Result<i32> {
    let config = args.build_config()?;
    log::debug!("{:?}", config);

    let releases = GitHubReleases::new(&config)?;
    let mut publisher = Publisher::new(config, Box::new(releases));
    if !args.skip_deb {
        publisher = publisher.with_package_tool(Box::new(DpkgDeb));
    }

    let report = publisher.publish(&args.script).await?;
    if args.print {
        print!("{}", report.formula);
    }
    summarize(&report);

    Ok(0)
}

fn summarize(report: &PublishReport) {
    log::info!(
        "✓ {} {} -> {}",
        report.package_name,
        report.version,
        report.formula_path.display()
    );
    match &report.deb {
        Some(DebOutcome::Built(path)) => log::info!("✓ Debian package {}", path.display()),
        Some(DebOutcome::Skipped { tool }) => {
            log::info!("Debian package skipped ({} not installed)", tool)
        }
        None => {}
    }
}
