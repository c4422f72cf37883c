// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! otelscan entry point - sync, scan, generate.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use otelscan::analyze::Analyzer;
use otelscan::conf::{self, LogConfig};
use otelscan::error::Result;
use otelscan::registry::SemconvRegistry;
use otelscan::schema::Stats;
use otelscan::{generate, repo, scan};

/// otelscan - document the telemetry of OpenTelemetry Go instrumentation.
#[derive(Parser)]
#[command(name = "otelscan")]
#[command(author, version, about = "OTel ecosystem explorer for Go instrumentation", long_about = None)]
struct Cli {
    /// Working directory for repository checkouts
    #[arg(long, env = "OTELSCAN_WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// Output directory for generated registry YAML
    #[arg(long, env = "OTELSCAN_REGISTRY_DIR", default_value = "registry")]
    registry_dir: PathBuf,

    /// Scan an already-checked-out repository instead of syncing upstream
    /// (repeatable; the directory name is used as the repository name)
    #[arg(long = "repo-path")]
    repo_paths: Vec<PathBuf>,

    /// Path to a local semantic-conventions model directory
    #[arg(long, env = "OTELSCAN_SEMCONV_DIR")]
    semconv_dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    conf::init_logging(&log_config);

    info!(version = otelscan::VERSION, "otel ecosystem explorer: golang");

    let work_dir = match &cli.work_dir {
        Some(dir) => dir.clone(),
        None => conf::work_dir().context("failed to resolve working directory")?,
    };

    // Semantic conventions are optional: without them every extracted
    // attribute is treated as custom.
    let semconv_registry = match semconv_model_dir(&cli, &work_dir) {
        Some(model_dir) => match SemconvRegistry::load(&model_dir) {
            Ok(registry) => {
                info!(attributes = registry.len(), "semantic conventions loaded");
                registry
            }
            Err(err) => {
                warn!(error = %err, "failed to load semantic conventions");
                SemconvRegistry::empty()
            }
        },
        None => SemconvRegistry::empty(),
    };

    let repos = resolve_repos(&cli, &work_dir)?;
    if repos.is_empty() {
        anyhow::bail!("no repositories to scan");
    }

    let analyzer = Analyzer::default();
    let mut libraries_by_repo = BTreeMap::new();

    for (name, path) in &repos {
        match scan::scan_repo(name, path, &analyzer) {
            Ok(libraries) => {
                info!(repo = %name, libraries = libraries.len(), "scanned repository");
                libraries_by_repo.insert(name.clone(), libraries);
            }
            Err(err) => {
                warn!(repo = %name, error = %err, "error scanning repository");
            }
        }
    }

    let all_libraries: Vec<_> = libraries_by_repo
        .values()
        .flatten()
        .cloned()
        .collect();
    let groups = generate::build_groups(&all_libraries);

    generate::generate(&cli.registry_dir, &groups, &semconv_registry)
        .context("failed to generate registry artifacts")?;
    generate::write_libraries(&cli.registry_dir, &libraries_by_repo)
        .context("failed to write library records")?;

    for (repo_name, stats) in Stats::calculate(&libraries_by_repo) {
        info!(
            repo = %repo_name,
            libraries = stats.libraries_with_telemetry,
            semconv = stats.libraries_with_semantic_conventions,
            spans = stats.total_spans,
            metrics = stats.total_metrics,
            attributes = stats.total_attributes,
            server = stats.spans_of_kind("SERVER"),
            client = stats.spans_of_kind("CLIENT"),
            internal = stats.spans_of_kind("INTERNAL"),
            "scan complete"
        );
    }

    Ok(())
}

/// Locate the semantic-conventions model: an explicit flag wins, otherwise
/// the registry repo is checked out next to the other repositories.
fn semconv_model_dir(cli: &Cli, work_dir: &std::path::Path) -> Option<PathBuf> {
    if let Some(dir) = &cli.semconv_dir {
        return Some(dir.clone());
    }
    if !cli.repo_paths.is_empty() {
        // Local-only runs do not touch the network.
        return None;
    }
    match repo::checkout_semconv(work_dir) {
        Ok(dir) => Some(dir),
        Err(err) => {
            warn!(error = %err, "error checking out semantic conventions");
            None
        }
    }
}

/// Resolve the repositories to scan: local paths when given, otherwise a
/// sync of the upstream repositories.
fn resolve_repos(cli: &Cli, work_dir: &std::path::Path) -> Result<Vec<(String, PathBuf)>> {
    if !cli.repo_paths.is_empty() {
        return Ok(cli
            .repo_paths
            .iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                (name, path.clone())
            })
            .collect());
    }

    let infos = repo::checkout(work_dir).context("error checking out otel repos")?;
    Ok(infos
        .into_iter()
        .map(|info| (info.name, info.path))
        .collect())
}
