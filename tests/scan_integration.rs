// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end tests driving provider -> analyzer -> generator on
//! synthetic Go instrumentation packages.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use otelscan::analyze::{Analyzer, AttributeType, MetricType, SpanKind};
use otelscan::generate;
use otelscan::registry::SemconvRegistry;
use otelscan::source::GoSourceProvider;
use otelscan::PackageAnalysis;

fn write_package(dir: &Path, module: &str, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("go.mod"), format!("module {}\n\ngo 1.24\n", module)).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn analyze_package(dir: &Path) -> PackageAnalysis {
    let mut provider = GoSourceProvider::new().unwrap();
    let src = provider.load_package(dir).unwrap();
    Analyzer::default().analyze(&src)
}

fn assert_has_attribute(analysis: &PackageAnalysis, kind: SpanKind, name: &str) {
    let section = &analysis.telemetry[0];
    let span = section
        .spans
        .iter()
        .find(|s| s.kind == kind)
        .unwrap_or_else(|| panic!("no {} span", kind));
    assert!(
        span.attributes.iter().any(|a| a.name == name),
        "span missing required attribute {}",
        name
    );
}

const GIN_PACKAGE: &str = r#"// Package otelgin instruments the gin-gonic/gin package.
package otelgin

import (
	"context"

	"go.opentelemetry.io/otel/attribute"
	"go.opentelemetry.io/otel/semconv/v1.20.0"
	"go.opentelemetry.io/otel/trace"
)

func Middleware(ctx context.Context, tracer trace.Tracer, route string) {
	ctx, span := tracer.Start(ctx, "request",
		trace.WithSpanKind(trace.SpanKindServer),
		trace.WithAttributes(attribute.String("gin.route.name", route)))
	defer span.End()
}
"#;

#[test]
fn test_http_server_package_end_to_end() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("otelgin");
    write_package(
        &pkg,
        "go.opentelemetry.io/contrib/instrumentation/github.com/gin-gonic/gin/otelgin",
        &[("gin.go", GIN_PACKAGE)],
    );

    let analysis = analyze_package(&pkg);

    assert_eq!(analysis.name, "otelgin");
    assert!(analysis
        .description
        .as_deref()
        .unwrap()
        .starts_with("Package otelgin instruments"));
    assert_eq!(
        analysis.semantic_conventions,
        vec!["HTTP_SERVER_SPANS".to_string(), "HTTP_SERVER_METRICS".to_string()]
    );

    assert_eq!(analysis.telemetry.len(), 1);
    let section = &analysis.telemetry[0];
    assert_eq!(section.when, "default");

    // One SERVER span: the twelve standard HTTP attributes plus the
    // syntactically observed one.
    assert_eq!(section.spans.len(), 1);
    let span = &section.spans[0];
    assert_eq!(span.kind, SpanKind::Server);
    assert_eq!(span.attributes.len(), 13);
    for name in ["http.request.method", "http.response.status_code", "http.route"] {
        assert_has_attribute(&analysis, SpanKind::Server, name);
    }
    assert!(span.attributes.iter().any(|a| a.name == "gin.route.name"));

    // The three standard HTTP server metrics.
    assert_eq!(section.metrics.len(), 3);
}

#[test]
fn test_aws_sdk_client_span() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("otelaws");
    write_package(
        &pkg,
        "go.opentelemetry.io/contrib/instrumentation/github.com/aws/aws-sdk-go-v2/otelaws",
        &[(
            "aws.go",
            r#"package otelaws

import (
	"context"

	"go.opentelemetry.io/otel/trace"
)

func startCall(ctx context.Context, tracer trace.Tracer, name string) {
	ctx, span := tracer.Start(ctx, name, trace.WithSpanKind(trace.SpanKindClient))
	defer span.End()
}
"#,
        )],
    );

    let analysis = analyze_package(&pkg);

    assert_eq!(analysis.telemetry.len(), 1);
    for name in [
        "rpc.system",
        "rpc.service",
        "rpc.method",
        "server.address",
        "server.port",
    ] {
        assert_has_attribute(&analysis, SpanKind::Client, name);
    }
}

#[test]
fn test_explicit_metrics_extraction() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("widgets");
    write_package(
        &pkg,
        "example.com/widgets",
        &[(
            "metrics.go",
            r#"package widgets

import "go.opentelemetry.io/otel/metric"

func register(meter metric.Meter) {
	counter, _ := meter.Int64Counter("request.count")
	histogram, _ := meter.Float64Histogram("request.duration",
		metric.WithUnit("s"))
	_ = counter
	_ = histogram
}
"#,
        )],
    );

    let analysis = analyze_package(&pkg);
    let section = &analysis.telemetry[0];
    assert!(section.spans.is_empty());

    assert_eq!(section.metrics.len(), 2);
    let count = section.metrics.iter().find(|m| m.name == "request.count").unwrap();
    assert_eq!(count.metric_type, MetricType::Counter);
    assert_eq!(count.unit, "");

    let duration = section
        .metrics
        .iter()
        .find(|m| m.name == "request.duration")
        .unwrap();
    assert_eq!(duration.metric_type, MetricType::Histogram);
    assert_eq!(duration.unit, "s");
}

#[test]
fn test_set_attributes_without_start_synthesizes_internal_span() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("widgets");
    write_package(
        &pkg,
        "example.com/widgets",
        &[(
            "attrs.go",
            r#"package widgets

import (
	"go.opentelemetry.io/otel/attribute"
	"go.opentelemetry.io/otel/trace"
)

func annotate(span trace.Span) {
	span.SetAttributes(attribute.String("k", "v"))
}
"#,
        )],
    );

    let analysis = analyze_package(&pkg);
    let section = &analysis.telemetry[0];
    assert_eq!(section.spans.len(), 1);
    assert_eq!(section.spans[0].kind, SpanKind::Internal);
    assert_eq!(section.spans[0].attributes.len(), 1);
    assert_eq!(section.spans[0].attributes[0].name, "k");
    assert_eq!(section.spans[0].attributes[0].attr_type, AttributeType::String);
}

#[test]
fn test_package_without_telemetry() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("plain");
    write_package(
        &pkg,
        "example.com/plain",
        &[("plain.go", "package plain\n\nfunc DoSomething() {}\n")],
    );

    let analysis = analyze_package(&pkg);
    assert!(analysis.telemetry.is_empty());
    assert!(analysis.semantic_conventions.is_empty());
}

#[test]
fn test_look_alike_start_is_not_a_span() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("workers");
    write_package(
        &pkg,
        "example.com/workers",
        &[(
            "worker.go",
            r#"package workers

type Pool struct{}

func run(pool *Pool, job string, retries int) {
	pool.Start(job, retries)
}

func (p *Pool) Start(job string, retries int) {}
"#,
        )],
    );

    let analysis = analyze_package(&pkg);
    assert!(analysis.telemetry.is_empty());
}

#[test]
fn test_analysis_is_idempotent() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("otelgin");
    write_package(
        &pkg,
        "go.opentelemetry.io/contrib/instrumentation/github.com/gin-gonic/gin/otelgin",
        &[("gin.go", GIN_PACKAGE)],
    );

    let first = analyze_package(&pkg);
    let second = analyze_package(&pkg);
    assert_eq!(first, second);

    let first_yaml = serde_yaml::to_string(&first).unwrap();
    let second_yaml = serde_yaml::to_string(&second).unwrap();
    assert_eq!(first_yaml, second_yaml);
}

#[test]
fn test_span_kinds_and_metric_names_are_unique() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("otelgin");
    write_package(
        &pkg,
        "go.opentelemetry.io/contrib/instrumentation/github.com/gin-gonic/gin/otelgin",
        &[
            ("a.go", GIN_PACKAGE),
            (
                "b.go",
                r#"package otelgin

import (
	"context"

	"go.opentelemetry.io/otel/trace"
)

func other(ctx context.Context, tracer trace.Tracer) {
	ctx, span := tracer.Start(ctx, "again", trace.WithSpanKind(trace.SpanKindServer))
	defer span.End()
}
"#,
            ),
        ],
    );

    let analysis = analyze_package(&pkg);
    let section = &analysis.telemetry[0];

    let mut kinds: Vec<SpanKind> = section.spans.iter().map(|s| s.kind).collect();
    kinds.dedup();
    assert_eq!(kinds.len(), section.spans.len());

    let mut names: Vec<&str> = section.metrics.iter().map(|m| m.name.as_str()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), section.metrics.len());

    for span in &section.spans {
        let mut attr_names: Vec<&str> = span.attributes.iter().map(|a| a.name.as_str()).collect();
        attr_names.sort();
        attr_names.dedup();
        assert_eq!(attr_names.len(), span.attributes.len());
    }
}

#[test]
fn test_generate_artifacts_from_analysis() {
    let temp = tempdir().unwrap();
    let pkg = temp.path().join("otelgin");
    write_package(
        &pkg,
        "go.opentelemetry.io/contrib/instrumentation/github.com/gin-gonic/gin/otelgin",
        &[("gin.go", GIN_PACKAGE)],
    );

    let analysis = analyze_package(&pkg);
    let library = otelscan::Library {
        repository: "opentelemetry-go-contrib".to_string(),
        name: "otelgin".to_string(),
        telemetry: analysis.telemetry,
        ..Default::default()
    };

    let groups = generate::build_groups(&[library]);
    assert!(groups.iter().any(|g| g.id == "span.otelgin.server"));
    assert!(groups
        .iter()
        .any(|g| g.id == "metric.http.server.request.duration"));

    let out = temp.path().join("registry");
    generate::generate(&out, &groups, &SemconvRegistry::empty()).unwrap();

    let signals = fs::read_to_string(out.join("signals.yaml")).unwrap();
    assert!(signals.contains("span.otelgin.server"));
    assert!(signals.contains("instrument: histogram"));

    // With an empty registry every attribute is custom.
    let attributes = fs::read_to_string(out.join("attributes.yaml")).unwrap();
    assert!(attributes.contains("gin.route.name"));
    assert!(attributes.contains("http.request.method"));
}
