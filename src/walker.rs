// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Instrumentation package discovery.
//!
//! A package is any directory holding a `go.mod`. Paths containing
//! `example`, `internal` or `test` are omitted; those hold demos and
//! fixtures, not shippable instrumentation.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ScanError;

/// Directory name fragments excluded from discovery.
const OMIT_DIRECTORIES: [&str; 3] = ["example", "internal", "test"];

/// A discovered instrumentation package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPackage {
    /// Package directory.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub rel_path: String,
    /// The package's `go.mod`.
    pub go_mod_path: PathBuf,
}

/// Find every instrumentation package under `root`, in sorted path order.
pub fn walk(root: &Path) -> Result<Vec<DiscoveredPackage>, ScanError> {
    let mut packages = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() || entry.file_name().to_str() != Some("go.mod") {
            continue;
        }

        let go_mod_path = entry.path().to_path_buf();
        let dir = go_mod_path
            .parent()
            .unwrap_or(root)
            .to_path_buf();
        let rel_path = dir
            .strip_prefix(root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| dir.display().to_string());

        if omit_directory(&rel_path) {
            continue;
        }

        packages.push(DiscoveredPackage {
            path: dir,
            rel_path,
            go_mod_path,
        });
    }

    Ok(packages)
}

/// Whether a relative path falls in an omitted directory tree.
fn omit_directory(rel_path: &str) -> bool {
    OMIT_DIRECTORIES.iter().any(|dir| rel_path.contains(dir))
}
