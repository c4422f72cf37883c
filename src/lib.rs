// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! otelscan - documents the telemetry emitted by OpenTelemetry Go
//! instrumentation packages.
//!
//! The scanner walks instrumentation repositories, statically analyzes
//! each package's Go source with tree-sitter, and generates registry YAML
//! describing the spans and metrics the package emits.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`error`] - Error types and result aliases
//! - [`conf`] - Environment configuration and logging setup
//! - [`source`] - Source model provider (tree-sitter based Go parsing)
//! - [`analyze`] - Telemetry extraction engine (spans, metrics, catalog)
//! - [`walker`] - Instrumentation package discovery
//! - [`gomod`] - go.mod parsing into library metadata
//! - [`schema`] - Registry schema types and scan statistics
//! - [`registry`] - Semantic-conventions registry loading
//! - [`scan`] - Per-repository scan orchestration
//! - [`generate`] - Registry YAML artifact generation
//! - [`repo`] - Upstream repository sync
//!
//! # Example
//!
//! ```rust,ignore
//! use otelscan::analyze::Analyzer;
//! use otelscan::source::GoSourceProvider;
//!
//! let mut provider = GoSourceProvider::new()?;
//! let src = provider.load_package(Path::new("instrumentation/otelgin"))?;
//!
//! let analyzer = Analyzer::default();
//! let analysis = analyzer.analyze(&src);
//! for section in &analysis.telemetry {
//!     println!("{} spans, {} metrics", section.spans.len(), section.metrics.len());
//! }
//! ```

pub mod analyze;
pub mod conf;
pub mod error;
pub mod generate;
pub mod gomod;
pub mod registry;
pub mod repo;
pub mod scan;
pub mod schema;
pub mod source;
pub mod walker;

// Re-export commonly used types at crate root
pub use analyze::{
    Analyzer, Attribute, AttributeType, ConventionCatalog, Metric, MetricType, PackageAnalysis,
    Span, SpanKind, TelemetrySection,
};
pub use error::{GenerateError, RegistryError, RepoError, Result, ScanError, SourceError};
pub use registry::SemconvRegistry;
pub use schema::{Library, Stats};
pub use source::{GoSourceProvider, PackageSource};

/// otelscan version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
