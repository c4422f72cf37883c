// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! go.mod parsing.
//!
//! Builds a [`Library`] skeleton from a package's `go.mod`: the module
//! path names the instrumentation scope, the first direct non-OTel
//! requirement identifies the instrumented library and its version.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ScanError;
use crate::schema::{Library, Scope, TargetVersions};

/// Module prefix of the OpenTelemetry ecosystem itself; requirements under
/// it are instrumentation plumbing, not the instrumented library.
const OTEL_PREFIX: &str = "go.opentelemetry.io";

static MODULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^module\s+(\S+)").expect("valid module regex"));
static GO_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^go\s+(\S+)").expect("valid go version regex"));
static REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+(v\S+)(.*)$").expect("valid require regex"));

/// Parse a `go.mod` file into a library skeleton.
pub fn parse(go_mod_path: &Path) -> Result<Library, ScanError> {
    let content = std::fs::read_to_string(go_mod_path)?;

    let mut module: Option<String> = None;
    let mut go_version = String::new();
    let mut target: Option<(String, String)> = None;
    let mut in_require_block = false;

    for line in content.lines() {
        let line = line.trim();

        if module.is_none() {
            if let Some(caps) = MODULE_RE.captures(line) {
                module = Some(caps[1].to_string());
                continue;
            }
        }
        if go_version.is_empty() {
            if let Some(caps) = GO_VERSION_RE.captures(line) {
                go_version = caps[1].to_string();
                continue;
            }
        }

        if line.starts_with("require (") {
            in_require_block = true;
            continue;
        }
        if in_require_block && line == ")" {
            in_require_block = false;
            continue;
        }
        if target.is_some() {
            continue;
        }

        let requirement = if in_require_block {
            line
        } else if let Some(rest) = line.strip_prefix("require ") {
            rest.trim()
        } else {
            continue;
        };

        if let Some(caps) = REQUIRE_RE.captures(requirement) {
            let path = caps[1].to_string();
            let version = caps[2].to_string();
            let trailing = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            if trailing.contains("// indirect") || path.starts_with(OTEL_PREFIX) {
                continue;
            }
            target = Some((path, version));
        }
    }

    let module = module.ok_or_else(|| {
        ScanError::InvalidGoMod(format!("no module directive in {}", go_mod_path.display()))
    })?;

    let mut lib = Library {
        name: module.rsplit('/').next().unwrap_or(&module).to_string(),
        source_path: go_mod_path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        minimum_go_version: go_version,
        scope: Scope { name: module },
        ..Default::default()
    };

    if let Some((path, version)) = target {
        lib.target_versions = TargetVersions { library: version };
        lib.library_link = library_link(&path);
    }

    Ok(lib)
}

/// Documentation link for an instrumented library.
fn library_link(pkg: &str) -> String {
    format!("https://pkg.go.dev/{}", pkg)
}
