// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Registry schema for scanned instrumentation libraries.
//!
//! A [`Library`] is the YAML-facing record for one instrumentation
//! package: module metadata from `go.mod` plus the analyzed telemetry.
//! [`Stats`] aggregates per-repository totals for the scan summary log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyze::TelemetrySection;

/// One instrumentation library in the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub repository: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub semantic_conventions: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub library_link: String,
    pub source_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub minimum_go_version: String,
    pub scope: Scope,
    pub target_versions: TargetVersions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<Configuration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telemetry: Vec<TelemetrySection>,
}

/// Instrumentation scope, named by the module path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
}

/// Versions of the instrumented library this package targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetVersions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub library: String,
}

/// A documented configuration option of an instrumentation library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub config_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
}

/// Aggregated telemetry totals for one repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub libraries_with_telemetry: usize,
    pub libraries_with_semantic_conventions: usize,
    pub total_spans: usize,
    pub total_metrics: usize,
    pub total_attributes: usize,
    pub spans_by_kind: BTreeMap<String, usize>,
    pub metrics_by_type: BTreeMap<String, usize>,
}

impl Stats {
    /// Aggregate stats per repository.
    pub fn calculate(libraries_by_repo: &BTreeMap<String, Vec<Library>>) -> BTreeMap<String, Stats> {
        let mut stats_by_repo = BTreeMap::new();

        for (repo_name, libraries) in libraries_by_repo {
            let mut stats = Stats::default();

            for lib in libraries {
                if !lib.telemetry.is_empty() {
                    stats.libraries_with_telemetry += 1;
                }
                if !lib.semantic_conventions.is_empty() {
                    stats.libraries_with_semantic_conventions += 1;
                }

                for section in &lib.telemetry {
                    for span in &section.spans {
                        stats.total_spans += 1;
                        *stats
                            .spans_by_kind
                            .entry(span.kind.as_str().to_string())
                            .or_default() += 1;
                        stats.total_attributes += span.attributes.len();
                    }
                    for metric in &section.metrics {
                        stats.total_metrics += 1;
                        *stats
                            .metrics_by_type
                            .entry(metric.metric_type.as_str().to_string())
                            .or_default() += 1;
                        stats.total_attributes += metric.attributes.len();
                    }
                }
            }

            stats_by_repo.insert(repo_name.clone(), stats);
        }

        stats_by_repo
    }

    /// Span count for a kind label, zero when absent.
    pub fn spans_of_kind(&self, kind: &str) -> usize {
        self.spans_by_kind.get(kind).copied().unwrap_or(0)
    }
}
