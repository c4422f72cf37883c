// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Semantic-convention tags derived from a package's imports.
//!
//! Imports referencing the conventions registry (any path containing
//! `semconv`) are mapped through the category classifier into coarse
//! signal tags such as `HTTP_SERVER_SPANS`. Imports that map to no
//! category pass through as raw tags.

use super::classify::{classify, CategoryFlags};

/// Marker identifying a conventions-registry import.
const SEMCONV_MARKER: &str = "semconv";

/// Collect the conventions-registry imports, deduplicated in first-seen
/// order.
pub fn semconv_imports(imports: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    imports
        .iter()
        .filter(|path| path.contains(SEMCONV_MARKER))
        .filter(|path| seen.insert(path.as_str()))
        .cloned()
        .collect()
}

/// Map raw conventions-registry imports into signal tags for the package
/// at `pkg_path`. Falls back to the raw import list when nothing maps.
pub fn map_conventions(raw: &[String], pkg_path: &str) -> Vec<String> {
    let flags = classify(pkg_path);
    let mut mapped = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for import in raw {
        for tag in infer_tags(import, pkg_path, flags) {
            if seen.insert(tag.clone()) {
                mapped.push(tag);
            }
        }
    }

    if mapped.is_empty() {
        return raw.to_vec();
    }
    mapped
}

/// Infer signal tags for one registry import given the package's category
/// flags. An import matching no category yields itself as a raw tag.
fn infer_tags(import_path: &str, pkg_path: &str, flags: CategoryFlags) -> Vec<String> {
    let mut tags = Vec::new();

    if flags.http {
        // Client-side HTTP instrumentation is recognizable by package name;
        // everything else HTTP-like is assumed server-side.
        if pkg_path.contains("otelhttp") || pkg_path.contains("httptrace") {
            tags.push("HTTP_CLIENT_SPANS".to_string());
        } else {
            tags.push("HTTP_SERVER_SPANS".to_string());
        }
        tags.push("HTTP_SERVER_METRICS".to_string());
    }

    if flags.rpc {
        tags.push("RPC_SERVER_SPANS".to_string());
        tags.push("RPC_CLIENT_SPANS".to_string());
    }

    if flags.database {
        tags.push("DATABASE_CLIENT_SPANS".to_string());
    }

    if flags.messaging {
        tags.push("MESSAGING_CLIENT_SPANS".to_string());
    }

    if flags.cloud_sdk || flags.serverless {
        tags.push("FAAS_SPANS".to_string());
    }

    if tags.is_empty() {
        return vec![import_path.to_string()];
    }
    tags
}
