// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Convention catalog: default attributes and metrics per category.
//!
//! Many instrumentation packages declare their telemetry through option
//! objects a syntactic scan cannot fully resolve (attributes set via a
//! shared helper, metrics registered in another package). The catalog
//! supplies the semantically-expected shape for a (span kind, category)
//! or category so the extracted record stays useful when syntactic
//! evidence is incomplete.
//!
//! The catalog is an immutable value constructed once and passed into the
//! extractors; tests can supply alternate catalogs.

use super::classify::{Category, CategoryFlags};
use super::types::{Attribute, Metric, MetricType, SpanKind};

/// A default attribute template for spans of given kinds in a category.
#[derive(Debug, Clone)]
pub struct SpanDefaults {
    pub kinds: Vec<SpanKind>,
    pub category: Category,
    pub attributes: Vec<Attribute>,
}

/// A default metric set for a category.
#[derive(Debug, Clone)]
pub struct MetricDefaults {
    pub category: Category,
    pub metrics: Vec<Metric>,
}

/// Static knowledge tables mapping span kinds and categories to the
/// telemetry shape the semantic conventions expect.
///
/// Lookups scan rules in declaration order and return the first match, so
/// rule order encodes precedence.
#[derive(Debug, Clone)]
pub struct ConventionCatalog {
    span_rules: Vec<SpanDefaults>,
    metric_rules: Vec<MetricDefaults>,
}

impl ConventionCatalog {
    /// Build a catalog from explicit rule tables.
    pub fn new(span_rules: Vec<SpanDefaults>, metric_rules: Vec<MetricDefaults>) -> Self {
        Self {
            span_rules,
            metric_rules,
        }
    }

    /// An empty catalog; useful for tests isolating syntactic extraction.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// The built-in catalog covering HTTP, database, RPC, serverless,
    /// cloud-SDK, language-runtime and host-runtime conventions.
    pub fn standard() -> Self {
        Self::new(standard_span_rules(), standard_metric_rules())
    }

    /// Default attributes for a span of `kind` in a package matching
    /// `flags`. Combinations with no template yield an empty slice.
    pub fn span_defaults(&self, kind: SpanKind, flags: CategoryFlags) -> &[Attribute] {
        for rule in &self.span_rules {
            if rule.kinds.contains(&kind) && flags.has(rule.category) {
                return &rule.attributes;
            }
        }
        &[]
    }

    /// Standard metric definitions for a package matching `flags`.
    /// Categories without a metric set yield an empty slice.
    pub fn metric_defaults(&self, flags: CategoryFlags) -> &[Metric] {
        for rule in &self.metric_rules {
            if flags.has(rule.category) {
                return &rule.metrics;
            }
        }
        &[]
    }
}

fn http_metric_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("http.request.method"),
        Attribute::long("http.response.status_code"),
        Attribute::string("http.route"),
        Attribute::string("network.protocol.version"),
        Attribute::string("url.scheme"),
    ]
}

fn rpc_metric_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("rpc.method"),
        Attribute::string("rpc.service"),
        Attribute::string("rpc.system"),
    ]
}

fn rpc_span_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("rpc.system"),
        Attribute::string("rpc.service"),
        Attribute::string("rpc.method"),
        Attribute::string("server.address"),
        Attribute::long("server.port"),
    ]
}

fn standard_span_rules() -> Vec<SpanDefaults> {
    vec![
        SpanDefaults {
            kinds: vec![SpanKind::Server],
            category: Category::Http,
            attributes: vec![
                Attribute::string("http.request.method"),
                Attribute::long("http.response.status_code"),
                Attribute::string("http.route"),
                Attribute::string("server.address"),
                Attribute::long("server.port"),
                Attribute::string("url.scheme"),
                Attribute::string("url.path"),
                Attribute::string("network.protocol.name"),
                Attribute::string("network.protocol.version"),
                Attribute::string("user_agent.original"),
                Attribute::string("client.address"),
                Attribute::string("network.peer.address"),
            ],
        },
        SpanDefaults {
            kinds: vec![SpanKind::Client],
            category: Category::Http,
            attributes: vec![
                Attribute::string("http.request.method"),
                Attribute::long("http.response.status_code"),
                Attribute::string("server.address"),
                Attribute::long("server.port"),
                Attribute::string("url.full"),
                Attribute::string("network.protocol.name"),
                Attribute::string("network.protocol.version"),
            ],
        },
        SpanDefaults {
            kinds: vec![SpanKind::Client],
            category: Category::Database,
            attributes: vec![
                Attribute::string("db.system"),
                Attribute::string("db.operation.name"),
                Attribute::string("db.collection.name"),
                Attribute::string("db.query.text"),
                Attribute::string("server.address"),
                Attribute::long("server.port"),
            ],
        },
        SpanDefaults {
            kinds: vec![SpanKind::Server, SpanKind::Client],
            category: Category::Rpc,
            attributes: rpc_span_attributes(),
        },
        SpanDefaults {
            kinds: vec![SpanKind::Server],
            category: Category::Serverless,
            attributes: vec![
                Attribute::string("faas.invocation_id"),
                Attribute::string("cloud.resource_id"),
            ],
        },
        SpanDefaults {
            kinds: vec![SpanKind::Client],
            category: Category::CloudSdk,
            attributes: rpc_span_attributes(),
        },
    ]
}

fn standard_metric_rules() -> Vec<MetricDefaults> {
    vec![
        MetricDefaults {
            category: Category::Http,
            metrics: vec![
                Metric::new("http.server.request.duration", MetricType::Histogram, "s")
                    .with_attributes(http_metric_attributes()),
                Metric::new("http.server.request.body.size", MetricType::Histogram, "By")
                    .with_attributes(http_metric_attributes()),
                Metric::new("http.server.response.body.size", MetricType::Histogram, "By")
                    .with_attributes(http_metric_attributes()),
            ],
        },
        MetricDefaults {
            category: Category::Rpc,
            metrics: vec![
                Metric::new("rpc.server.duration", MetricType::Histogram, "ms")
                    .with_attributes(rpc_metric_attributes()),
                Metric::new("rpc.server.request.size", MetricType::Histogram, "By")
                    .with_attributes(rpc_metric_attributes()),
                Metric::new("rpc.server.response.size", MetricType::Histogram, "By")
                    .with_attributes(rpc_metric_attributes()),
            ],
        },
        MetricDefaults {
            category: Category::LangRuntime,
            metrics: vec![
                Metric::new("go.memory.used", MetricType::Gauge, "By"),
                Metric::new("go.memory.limit", MetricType::Gauge, "By"),
                Metric::new("go.memory.allocated", MetricType::Counter, "By"),
                Metric::new("go.memory.allocations", MetricType::Counter, "{allocation}"),
                Metric::new("go.memory.gc.goal", MetricType::Gauge, "By"),
                Metric::new("go.goroutine.count", MetricType::Gauge, "{goroutine}"),
                Metric::new("go.processor.limit", MetricType::Gauge, "{thread}"),
                Metric::new("go.config.gogc", MetricType::Gauge, "%"),
            ],
        },
        MetricDefaults {
            category: Category::HostRuntime,
            metrics: vec![
                Metric::new("process.cpu.time", MetricType::Counter, "s")
                    .with_attributes(vec![Attribute::string("state")]),
                Metric::new("system.cpu.time", MetricType::Counter, "s")
                    .with_attributes(vec![Attribute::string("state")]),
                Metric::new("system.memory.usage", MetricType::Gauge, "By")
                    .with_attributes(vec![Attribute::string("state")]),
                Metric::new("system.memory.utilization", MetricType::Gauge, "1")
                    .with_attributes(vec![Attribute::string("state")]),
                Metric::new("system.network.io", MetricType::Counter, "By")
                    .with_attributes(vec![Attribute::string("direction")]),
            ],
        },
    ]
}
