// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Data model for extracted telemetry.
//!
//! These types describe what an instrumentation package emits: spans keyed
//! by kind, metrics keyed by name, and typed attributes on both. They are
//! built fresh per analysis and serialize directly into the registry YAML.

use serde::{Deserialize, Serialize};

/// The result of analyzing one instrumentation package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageAnalysis {
    /// Package name from the package clause.
    pub name: String,
    /// Leading package doc comment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Semantic-convention tags derived from imports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub semantic_conventions: Vec<String>,
    /// Telemetry sections; at most one ("default") is produced today.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telemetry: Vec<TelemetrySection>,
}

/// A group of telemetry emitted under one condition.
///
/// `when` is currently always "default"; the shape supports conditional
/// telemetry sections later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySection {
    pub when: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
}

/// Label for the default telemetry section.
pub const WHEN_DEFAULT: &str = "default";

impl TelemetrySection {
    /// Create the default section from extracted spans and metrics.
    pub fn default_section(spans: Vec<Span>, metrics: Vec<Metric>) -> Self {
        Self {
            when: WHEN_DEFAULT.to_string(),
            spans,
            metrics,
        }
    }
}

/// Classification of a span's role.
///
/// Declaration order is the canonical output order and the fallback
/// precedence when resolving a kind from hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpanKind {
    Server,
    Client,
    Producer,
    Consumer,
    Internal,
}

impl SpanKind {
    /// The four kinds that can be hinted by identifier names. Internal is
    /// never hinted; it is the fallback.
    pub const HINTABLE: [SpanKind; 4] = [
        SpanKind::Server,
        SpanKind::Client,
        SpanKind::Producer,
        SpanKind::Consumer,
    ];

    /// Lowercase keyword used for case-insensitive identifier matching.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Client => "client",
            Self::Producer => "producer",
            Self::Consumer => "consumer",
            Self::Internal => "internal",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "SERVER",
            Self::Client => "CLIENT",
            Self::Producer => "PRODUCER",
            Self::Consumer => "CONSUMER",
            Self::Internal => "INTERNAL",
        }
    }

    /// Match an identifier such as `SpanKindServer` against a kind name,
    /// case-insensitively. `Server`, `SERVER` and `server` all match.
    pub fn matches_identifier(&self, ident: &str) -> bool {
        ident.to_lowercase().contains(self.keyword())
    }
}

impl std::fmt::Display for SpanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of traced work with a kind and attribute set.
///
/// Invariant: at most one `Span` per kind per package; attribute names are
/// unique within the span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

/// Instrument type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricType {
    Counter,
    Histogram,
    UpDownCounter,
    Gauge,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counter => "COUNTER",
            Self::Histogram => "HISTOGRAM",
            Self::UpDownCounter => "UPDOWNCOUNTER",
            Self::Gauge => "GAUGE",
        }
    }

    /// Semconv registry instrument name.
    pub fn instrument(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Histogram => "histogram",
            Self::UpDownCounter => "updowncounter",
            Self::Gauge => "gauge",
        }
    }

    /// Classify a constructor method name such as `Int64Counter` or
    /// `Float64ObservableGauge`. Returns `None` for non-constructor names.
    pub fn from_constructor(method: &str) -> Option<Self> {
        if method.contains("UpDownCounter") {
            Some(Self::UpDownCounter)
        } else if method.contains("Counter") {
            Some(Self::Counter)
        } else if method.contains("Histogram") {
            Some(Self::Histogram)
        } else if method.contains("Gauge") {
            Some(Self::Gauge)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named numeric instrument.
///
/// Invariant: `name` is non-empty and unique within its section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl Metric {
    pub fn new(name: impl Into<String>, metric_type: MetricType, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metric_type,
            unit: unit.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeType {
    String,
    Long,
    Boolean,
    Double,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Long => "LONG",
            Self::Boolean => "BOOLEAN",
            Self::Double => "DOUBLE",
        }
    }

    /// Infer the value type from a constructor or setter method name.
    ///
    /// `attribute.String("k", v)` yields String, `attribute.Int64`/`Int`
    /// yield Long, `Bool` yields Boolean, `Float64`/`Float` yield Double.
    /// Anything else defaults to String.
    pub fn infer(method: &str) -> Self {
        if method.contains("String") {
            Self::String
        } else if method.contains("Int64") || method.contains("Int") {
            Self::Long
        } else if method.contains("Bool") {
            Self::Boolean
        } else if method.contains("Float64") || method.contains("Float") {
            Self::Double
        } else {
            Self::String
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed key/value descriptor attached to a span or metric.
///
/// Invariant: `name` is unique within the owning record; the first writer
/// of a name wins and later writes are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
}

impl Attribute {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn long(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Long)
    }
}
