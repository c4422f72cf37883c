// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry extraction engine.
//!
//! Heuristic static analysis over a package's source model, combined with
//! a convention catalog that fills in gaps using domain knowledge about
//! common instrumentation frameworks. The engine recognizes span-creation,
//! attribute-setting and metric-constructor call sites and assembles a
//! [`PackageAnalysis`] describing the telemetry the package emits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      Analyzer                        │
//! │  (assembles spans + metrics + conventions + doc)     │
//! └──────────────────────────────────────────────────────┘
//!           │                │                 │
//!           ▼                ▼                 ▼
//! ┌───────────────┐ ┌────────────────┐ ┌──────────────────┐
//! │ SpanExtractor │ │ MetricExtractor│ │  conventions     │
//! │ (two-pass call│ │ (constructor   │ │  (semconv import │
//! │  recognition) │ │  classification│ │   tag mapping)   │
//! └───────────────┘ └────────────────┘ └──────────────────┘
//!           │                │
//!           └───────┬────────┘
//!                   ▼
//!        ┌────────────────────┐     ┌──────────────────┐
//!        │ ConventionCatalog  │ ◄── │ classify (flags) │
//!        │ (default shapes)   │     └──────────────────┘
//!        └────────────────────┘
//! ```
//!
//! The engine is fully synchronous and performs no I/O; it is reentrant
//! and holds no per-call state, so analyzing many packages in parallel is
//! safe at the caller's discretion.

pub mod catalog;
pub mod classify;
pub mod conventions;
pub mod metrics;
pub mod spans;
pub mod types;

pub use catalog::{ConventionCatalog, MetricDefaults, SpanDefaults};
pub use classify::{classify, Category, CategoryFlags};
pub use metrics::MetricExtractor;
pub use spans::{KindHints, SpanExtractor};
pub use types::{
    Attribute, AttributeType, Metric, MetricType, PackageAnalysis, Span, SpanKind,
    TelemetrySection,
};

use crate::source::PackageSource;

/// Assembles the telemetry description for one package.
///
/// Holds the convention catalog; construct once and reuse across packages.
#[derive(Debug, Clone)]
pub struct Analyzer {
    catalog: ConventionCatalog,
}

impl Analyzer {
    /// Create an analyzer with an explicit catalog.
    pub fn new(catalog: ConventionCatalog) -> Self {
        Self { catalog }
    }

    /// Analyze one package's source model.
    ///
    /// Infallible: the provider has already resolved the package, and
    /// unrecognized call shapes are skipped, not reported. An empty
    /// telemetry list means "no high-confidence telemetry detected", not
    /// failure.
    pub fn analyze(&self, src: &PackageSource) -> PackageAnalysis {
        let flags = classify(&src.import_path);

        let spans = SpanExtractor::new(&self.catalog, flags).extract(src);
        let metrics = MetricExtractor::new(&self.catalog, flags).extract(src);

        let telemetry = if spans.is_empty() && metrics.is_empty() {
            Vec::new()
        } else {
            vec![TelemetrySection::default_section(spans, metrics)]
        };

        let raw = conventions::semconv_imports(&src.imports);
        let semantic_conventions = conventions::map_conventions(&raw, &src.import_path);

        PackageAnalysis {
            name: src.name.clone(),
            description: src.description.clone(),
            semantic_conventions,
            telemetry,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(ConventionCatalog::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CallSite, Expr};

    fn ctx_arg() -> Expr {
        Expr::Ident {
            name: "ctx".to_string(),
            ty: Some("context.Context".to_string()),
        }
    }

    fn server_start() -> CallSite {
        CallSite::new(
            "Start",
            vec![
                ctx_arg(),
                Expr::Str("op".to_string()),
                Expr::Call(Box::new(CallSite::new(
                    "WithSpanKind",
                    vec![Expr::Selector("SpanKindServer".to_string())],
                ))),
            ],
        )
    }

    #[test]
    fn test_analyze_empty_package() {
        let analyzer = Analyzer::default();
        let src = PackageSource {
            name: "widgets".to_string(),
            import_path: "example.com/widgets".to_string(),
            ..Default::default()
        };
        let analysis = analyzer.analyze(&src);
        assert_eq!(analysis.name, "widgets");
        assert!(analysis.telemetry.is_empty());
        assert!(analysis.semantic_conventions.is_empty());
    }

    #[test]
    fn test_analyze_produces_default_section() {
        let analyzer = Analyzer::default();
        let src = PackageSource {
            name: "otelgin".to_string(),
            import_path: "example.com/gin/otelgin".to_string(),
            calls: vec![server_start()],
            ..Default::default()
        };
        let analysis = analyzer.analyze(&src);
        assert_eq!(analysis.telemetry.len(), 1);
        let section = &analysis.telemetry[0];
        assert_eq!(section.when, "default");
        assert_eq!(section.spans.len(), 1);
        assert_eq!(section.spans[0].kind, SpanKind::Server);
        // HTTP package: catalog span attributes and standard metrics.
        assert_eq!(section.spans[0].attributes.len(), 12);
        assert_eq!(section.metrics.len(), 3);
    }

    #[test]
    fn test_analyze_imports_alone_produce_no_telemetry() {
        // Importing an HTTP router does not invent spans or metrics when
        // the package itself matches no category and makes no calls.
        let analyzer = Analyzer::default();
        let src = PackageSource {
            name: "widgets".to_string(),
            import_path: "example.com/widgets".to_string(),
            imports: vec!["github.com/gin-gonic/gin".to_string()],
            ..Default::default()
        };
        let analysis = analyzer.analyze(&src);
        assert!(analysis.telemetry.is_empty());
    }

    #[test]
    fn test_analyze_maps_semconv_imports() {
        let analyzer = Analyzer::default();
        let src = PackageSource {
            name: "otelgin".to_string(),
            import_path: "example.com/gin/otelgin".to_string(),
            imports: vec![
                "context".to_string(),
                "go.opentelemetry.io/otel/semconv/v1.20.0".to_string(),
            ],
            ..Default::default()
        };
        let analysis = analyzer.analyze(&src);
        assert_eq!(
            analysis.semantic_conventions,
            vec!["HTTP_SERVER_SPANS".to_string(), "HTTP_SERVER_METRICS".to_string()]
        );
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let analyzer = Analyzer::default();
        let src = PackageSource {
            name: "otelgin".to_string(),
            import_path: "example.com/gin/otelgin".to_string(),
            calls: vec![
                server_start(),
                CallSite::new(
                    "Int64Counter",
                    vec![Expr::Str("custom.count".to_string())],
                ),
            ],
            selectors: vec!["SpanKindServer".to_string()],
            ..Default::default()
        };
        let first = analyzer.analyze(&src);
        let second = analyzer.analyze(&src);
        assert_eq!(first, second);
        let first_yaml = serde_yaml::to_string(&first).unwrap();
        let second_yaml = serde_yaml::to_string(&second).unwrap();
        assert_eq!(first_yaml, second_yaml);
    }

    #[test]
    fn test_analyze_with_empty_catalog() {
        let analyzer = Analyzer::new(ConventionCatalog::empty());
        let src = PackageSource {
            name: "otelgin".to_string(),
            import_path: "example.com/gin/otelgin".to_string(),
            calls: vec![server_start()],
            ..Default::default()
        };
        let analysis = analyzer.analyze(&src);
        let section = &analysis.telemetry[0];
        assert_eq!(section.spans.len(), 1);
        assert!(section.spans[0].attributes.is_empty());
        assert!(section.metrics.is_empty());
    }
}
