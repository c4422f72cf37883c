// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Per-repository scan orchestration.
//!
//! Walks a repository's instrumentation roots, parses each package's
//! `go.mod`, loads its source model and runs the analyzer, producing one
//! [`Library`] record per package. Packages that fail to parse are logged
//! and skipped; the scan is per-package best-effort.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::analyze::Analyzer;
use crate::error::Result;
use crate::gomod;
use crate::schema::Library;
use crate::source::GoSourceProvider;
use crate::walker;

/// Well-known upstream repository names with special scan roots.
pub const REPO_GO: &str = "opentelemetry-go";
pub const REPO_CONTRIB: &str = "opentelemetry-go-contrib";

/// Scan roots for a repository. The contrib repo keeps instrumentation
/// under `instrumentation/`; the core repo is scanned from its root.
fn scan_paths(repo_name: &str, repo_path: &Path) -> Vec<PathBuf> {
    match repo_name {
        REPO_GO => vec![repo_path.to_path_buf()],
        _ => vec![repo_path.join("instrumentation")],
    }
}

/// Scan one repository into library records.
pub fn scan_repo(repo_name: &str, repo_path: &Path, analyzer: &Analyzer) -> Result<Vec<Library>> {
    let mut provider = GoSourceProvider::new()?;
    let mut libraries = Vec::new();

    for scan_path in scan_paths(repo_name, repo_path) {
        let packages = match walker::walk(&scan_path) {
            Ok(packages) => packages,
            Err(err) => {
                warn!(path = %scan_path.display(), error = %err, "skipping scan root");
                continue;
            }
        };

        for pkg in packages {
            let mut library = match gomod::parse(&pkg.go_mod_path) {
                Ok(library) => library,
                Err(err) => {
                    warn!(package = %pkg.rel_path, error = %err, "skipping package: bad go.mod");
                    continue;
                }
            };

            let src = match provider.load_package(&pkg.path) {
                Ok(src) => src,
                Err(err) => {
                    warn!(package = %pkg.rel_path, error = %err, "skipping package: unreadable source");
                    continue;
                }
            };

            let analysis = analyzer.analyze(&src);
            debug!(
                package = %pkg.rel_path,
                spans = analysis.telemetry.first().map(|t| t.spans.len()).unwrap_or(0),
                metrics = analysis.telemetry.first().map(|t| t.metrics.len()).unwrap_or(0),
                "analyzed package"
            );

            library.repository = repo_name.to_string();
            if !analysis.name.is_empty() {
                library.display_name = analysis.name;
            }
            if let Some(description) = analysis.description {
                library.description = description;
            }
            library.semantic_conventions = analysis.semantic_conventions;
            library.telemetry = analysis.telemetry;

            libraries.push(library);
        }
    }

    Ok(libraries)
}
