// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Metric extraction from a package's call sites.
//!
//! A single pass classifies calls by constructor name fragment
//! (`Int64Counter`, `Float64Histogram`, ...), takes the first string
//! literal argument as the metric name and an optional `WithUnit` option
//! as the unit. Catalog-derived standard metrics for the package's
//! category are merged in afterwards, never overriding a syntactically
//! observed name.

use std::collections::HashSet;

use super::catalog::ConventionCatalog;
use super::classify::CategoryFlags;
use super::types::{Metric, MetricType};
use crate::source::{CallSite, Expr, PackageSource};

/// Extracts deduplicated, name-sorted metric records from a package.
pub struct MetricExtractor<'a> {
    catalog: &'a ConventionCatalog,
    flags: CategoryFlags,
}

impl<'a> MetricExtractor<'a> {
    pub fn new(catalog: &'a ConventionCatalog, flags: CategoryFlags) -> Self {
        Self { catalog, flags }
    }

    /// Run the syntactic pass and merge catalog defaults.
    pub fn extract(&self, src: &PackageSource) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for call in &src.calls {
            let Some(metric_type) = MetricType::from_constructor(&call.method) else {
                continue;
            };
            let Some(name) = call.args.first().and_then(Expr::as_str_lit) else {
                continue;
            };
            if name.is_empty() || seen.contains(name) {
                continue;
            }
            let unit = extract_unit(call);
            seen.insert(name.to_string());
            metrics.push(Metric::new(name, metric_type, unit));
        }

        for metric in self.catalog.metric_defaults(self.flags) {
            if seen.insert(metric.name.clone()) {
                metrics.push(metric.clone());
            }
        }

        metrics.sort_by(|a, b| a.name.cmp(&b.name));
        metrics
    }
}

/// Find a `WithUnit("...")` option among the trailing arguments.
fn extract_unit(call: &CallSite) -> String {
    for arg in call.args.iter().skip(1) {
        let Some(option) = arg.as_call() else {
            continue;
        };
        if option.method != "WithUnit" {
            continue;
        }
        if let Some(unit) = option.args.first().and_then(Expr::as_str_lit) {
            return unit.to_string();
        }
    }
    String::new()
}
