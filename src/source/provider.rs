// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tree-sitter based source model provider for Go packages.
//!
//! Parses every non-test `.go` file in a package directory and flattens
//! the syntax forest into a [`PackageSource`]: package name, import path,
//! leading doc comment, declared imports, selector identifiers and
//! selector-method call sites with structured arguments.
//!
//! Type resolution is deliberately limited: identifier arguments are
//! resolved against the parameter lists of their enclosing functions,
//! methods and function literals, which is sufficient to recognize a
//! `context.Context` first argument. No other semantic analysis happens
//! here.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Node, Parser};

use crate::error::SourceError;

use super::model::{CallSite, Expr, PackageSource};

static MODULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^module\s+(\S+)").expect("valid module regex"));

/// Loads Go packages into [`PackageSource`] values.
pub struct GoSourceProvider {
    parser: Parser,
}

impl GoSourceProvider {
    /// Create a provider with the Go grammar loaded.
    pub fn new() -> Result<Self, SourceError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| SourceError::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Load the package rooted at `dir`.
    ///
    /// Files are visited in sorted filename order and nodes in document
    /// order, so the resulting model and everything derived from it is
    /// reproducible.
    pub fn load_package(&mut self, dir: &Path) -> Result<PackageSource, SourceError> {
        if !dir.is_dir() {
            return Err(SourceError::NotFound(dir.display().to_string()));
        }

        let mut files: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().and_then(|e| e.to_str()) == Some("go")
                    && !path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| n.ends_with("_test.go"))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(SourceError::NoGoFiles(dir.display().to_string()));
        }

        let mut src = PackageSource {
            import_path: module_path(dir).unwrap_or_else(|| dir.display().to_string()),
            ..Default::default()
        };
        let mut seen_imports = HashSet::new();

        for path in &files {
            let content = std::fs::read_to_string(path)?;
            let tree = self
                .parser
                .parse(&content, None)
                .ok_or_else(|| SourceError::Parse(path.display().to_string()))?;
            let root = tree.root_node();
            let source = content.as_bytes();

            if src.name.is_empty() {
                if let Some(name) = package_name(&root, source) {
                    src.name = name;
                }
            }
            if src.description.is_none() {
                src.description = package_doc(&root, source);
            }

            let mut scopes: Vec<HashMap<String, String>> = Vec::new();
            visit(root, source, &mut scopes, &mut src, &mut seen_imports);
        }

        Ok(src)
    }
}

/// Read the module path from a `go.mod` next to the package, if present.
fn module_path(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join("go.mod")).ok()?;
    MODULE_RE
        .captures(&content)
        .map(|caps| caps[1].to_string())
}

/// Recursive walk carrying the enclosing-function parameter scopes.
fn visit(
    node: Node,
    source: &[u8],
    scopes: &mut Vec<HashMap<String, String>>,
    src: &mut PackageSource,
    seen_imports: &mut HashSet<String>,
) {
    let mut pushed = false;
    match node.kind() {
        "function_declaration" | "method_declaration" | "func_literal" => {
            scopes.push(parameter_types(&node, source));
            pushed = true;
        }
        "import_spec" => {
            if let Some(path_node) = node.child_by_field_name("path") {
                let path = node_text(&path_node, source)
                    .trim_matches('"')
                    .to_string();
                if !path.is_empty() && seen_imports.insert(path.clone()) {
                    src.imports.push(path);
                }
            }
        }
        "selector_expression" => {
            if let Some(field) = node.child_by_field_name("field") {
                src.selectors.push(node_text(&field, source));
            }
        }
        "call_expression" => {
            if let Some(call) = build_call(&node, source, scopes) {
                src.calls.push(call);
            }
        }
        _ => {}
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            visit(child, source, scopes, src, seen_imports);
        }
    }

    if pushed {
        scopes.pop();
    }
}

/// Collect `name -> declared type` for a function node's parameters,
/// including a method receiver.
fn parameter_types(node: &Node, source: &[u8]) -> HashMap<String, String> {
    let mut types = HashMap::new();
    for field in ["receiver", "parameters"] {
        let Some(list) = node.child_by_field_name(field) else {
            continue;
        };
        for i in 0..list.child_count() {
            let Some(decl) = list.child(i) else {
                continue;
            };
            if decl.kind() != "parameter_declaration"
                && decl.kind() != "variadic_parameter_declaration"
            {
                continue;
            }
            let Some(type_node) = decl.child_by_field_name("type") else {
                continue;
            };
            let type_text = node_text(&type_node, source);
            let mut cursor = decl.walk();
            for name_node in decl.children_by_field_name("name", &mut cursor) {
                types.insert(node_text(&name_node, source), type_text.clone());
            }
        }
    }
    types
}

/// Build a call site from a call expression whose function is a selector.
/// Calls through plain identifiers are not modeled.
fn build_call(node: &Node, source: &[u8], scopes: &[HashMap<String, String>]) -> Option<CallSite> {
    let function = node.child_by_field_name("function")?;
    if function.kind() != "selector_expression" {
        return None;
    }
    let method = node_text(&function.child_by_field_name("field")?, source);

    let mut args = Vec::new();
    if let Some(arg_list) = node.child_by_field_name("arguments") {
        for i in 0..arg_list.named_child_count() {
            if let Some(arg) = arg_list.named_child(i) {
                args.push(build_expr(&arg, source, scopes));
            }
        }
    }

    Some(CallSite::new(method, args))
}

/// Model one argument expression.
fn build_expr(node: &Node, source: &[u8], scopes: &[HashMap<String, String>]) -> Expr {
    match node.kind() {
        "interpreted_string_literal" => {
            Expr::Str(node_text(node, source).trim_matches('"').to_string())
        }
        "raw_string_literal" => Expr::Str(node_text(node, source).trim_matches('`').to_string()),
        "call_expression" => match build_call(node, source, scopes) {
            Some(call) => Expr::Call(Box::new(call)),
            None => Expr::Opaque,
        },
        "selector_expression" => match node.child_by_field_name("field") {
            Some(field) => Expr::Selector(node_text(&field, source)),
            None => Expr::Opaque,
        },
        "identifier" => {
            let name = node_text(node, source);
            let ty = scopes
                .iter()
                .rev()
                .find_map(|scope| scope.get(&name))
                .cloned();
            Expr::Ident { name, ty }
        }
        _ => Expr::Opaque,
    }
}

/// Package name from the package clause.
fn package_name(root: &Node, source: &[u8]) -> Option<String> {
    for i in 0..root.child_count() {
        let child = root.child(i)?;
        if child.kind() == "package_clause" {
            for j in 0..child.named_child_count() {
                if let Some(ident) = child.named_child(j) {
                    let name = node_text(&ident, source);
                    if !name.is_empty() {
                        return Some(name);
                    }
                }
            }
        }
    }
    None
}

/// Leading package doc: the comment block immediately above the package
/// clause, each line contiguous with the next.
fn package_doc(root: &Node, source: &[u8]) -> Option<String> {
    let mut comments: Vec<Node> = Vec::new();
    for i in 0..root.child_count() {
        let child = root.child(i)?;
        match child.kind() {
            "comment" => comments.push(child),
            "package_clause" => {
                let mut block: Vec<&Node> = Vec::new();
                let mut expected_row = child.start_position().row;
                for comment in comments.iter().rev() {
                    if comment.end_position().row + 1 == expected_row {
                        expected_row = comment.start_position().row;
                        block.push(comment);
                    } else {
                        break;
                    }
                }
                if block.is_empty() {
                    return None;
                }
                block.reverse();
                let text = block
                    .iter()
                    .map(|c| clean_comment(&node_text(c, source)))
                    .collect::<Vec<_>>()
                    .join("\n");
                let text = text.trim().to_string();
                return if text.is_empty() { None } else { Some(text) };
            }
            _ => return None,
        }
    }
    None
}

fn clean_comment(text: &str) -> String {
    if let Some(stripped) = text.strip_prefix("//") {
        stripped.strip_prefix(' ').unwrap_or(stripped).to_string()
    } else {
        text.trim_start_matches("/*")
            .trim_end_matches("*/")
            .trim()
            .to_string()
    }
}

fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_package(files: &[(&str, &str)]) -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        for (name, content) in files {
            fs::write(temp.path().join(name), content).unwrap();
        }
        temp
    }

    fn load(files: &[(&str, &str)]) -> PackageSource {
        let temp = write_package(files);
        let mut provider = GoSourceProvider::new().unwrap();
        provider.load_package(temp.path()).unwrap()
    }

    const INSTRUMENT_GO: &str = r#"package testpkg

import (
	"context"

	"go.opentelemetry.io/otel/attribute"
	"go.opentelemetry.io/otel/trace"
)

func Instrument(ctx context.Context, tracer trace.Tracer) {
	ctx, span := tracer.Start(ctx, "operation.name",
		trace.WithSpanKind(trace.SpanKindClient),
		trace.WithAttributes(attribute.String("http.method", "GET")))
	defer span.End()
}
"#;

    #[test]
    fn test_load_package_basics() {
        let src = load(&[("instrument.go", INSTRUMENT_GO)]);
        assert_eq!(src.name, "testpkg");
        assert!(src.imports.contains(&"context".to_string()));
        assert!(src
            .imports
            .contains(&"go.opentelemetry.io/otel/trace".to_string()));
    }

    #[test]
    fn test_call_sites_with_resolved_context() {
        let src = load(&[("instrument.go", INSTRUMENT_GO)]);
        let start = src
            .calls
            .iter()
            .find(|c| c.method == "Start")
            .expect("Start call modeled");
        assert!(start.args[0].is_context());
        assert_eq!(start.args[1].as_str_lit(), Some("operation.name"));

        // Options are modeled as nested calls.
        let kinds: Vec<&str> = start
            .args
            .iter()
            .filter_map(|a| a.as_call())
            .map(|c| c.method.as_str())
            .collect();
        assert_eq!(kinds, vec!["WithSpanKind", "WithAttributes"]);

        let with_attrs = start
            .args
            .iter()
            .filter_map(|a| a.as_call())
            .find(|c| c.method == "WithAttributes")
            .unwrap();
        let attr = with_attrs.args[0].as_call().unwrap();
        assert_eq!(attr.method, "String");
        assert_eq!(attr.args[0].as_str_lit(), Some("http.method"));
    }

    #[test]
    fn test_nested_calls_are_flattened() {
        let src = load(&[("instrument.go", INSTRUMENT_GO)]);
        // WithSpanKind and attribute.String appear as their own entries.
        assert!(src.calls.iter().any(|c| c.method == "WithSpanKind"));
        assert!(src.calls.iter().any(|c| c.method == "String"));
    }

    #[test]
    fn test_selector_names_collected() {
        let src = load(&[("instrument.go", INSTRUMENT_GO)]);
        assert!(src.selectors.iter().any(|s| s == "SpanKindClient"));
        assert!(src.selectors.iter().any(|s| s == "Start"));
    }

    #[test]
    fn test_package_doc_extraction() {
        let src = load(&[(
            "doc.go",
            "// Package testpkg provides test instrumentation.\n//\n// It instruments test operations.\npackage testpkg\n",
        )]);
        let doc = src.description.unwrap();
        assert!(doc.starts_with("Package testpkg provides test instrumentation."));
        assert!(doc.contains("It instruments test operations."));
    }

    #[test]
    fn test_detached_comment_is_not_doc() {
        let src = load(&[(
            "doc.go",
            "// A license header.\n\npackage testpkg\n",
        )]);
        assert!(src.description.is_none());
    }

    #[test]
    fn test_unresolved_first_arg_type() {
        let src = load(&[(
            "main.go",
            "package testpkg\n\nfunc run(w Watcher) {\n\tw.Start(job, opts)\n}\n",
        )]);
        let start = src.calls.iter().find(|c| c.method == "Start").unwrap();
        assert!(!start.args[0].is_context());
    }

    #[test]
    fn test_method_receiver_params_resolved() {
        let content = r#"package testpkg

import "context"

type Middleware struct{}

func (m *Middleware) Handle(ctx context.Context, name string) {
	m.tracer.Start(ctx, name)
}
"#;
        let src = load(&[("middleware.go", content)]);
        let start = src.calls.iter().find(|c| c.method == "Start").unwrap();
        assert!(start.args[0].is_context());
        assert!(matches!(
            &start.args[1],
            Expr::Ident { name, .. } if name == "name"
        ));
    }

    #[test]
    fn test_test_files_are_skipped() {
        let src = load(&[
            ("main.go", "package testpkg\n"),
            (
                "main_test.go",
                "package testpkg\n\nimport \"testing\"\n\nfunc TestX(t *testing.T) {}\n",
            ),
        ]);
        assert!(!src.imports.contains(&"testing".to_string()));
    }

    #[test]
    fn test_module_path_from_go_mod() {
        let temp = write_package(&[
            ("main.go", "package testpkg\n"),
            ("go.mod", "module example.com/testpkg\n\ngo 1.24\n"),
        ]);
        let mut provider = GoSourceProvider::new().unwrap();
        let src = provider.load_package(temp.path()).unwrap();
        assert_eq!(src.import_path, "example.com/testpkg");
    }

    #[test]
    fn test_missing_directory_errors() {
        let temp = tempdir().unwrap();
        let mut provider = GoSourceProvider::new().unwrap();
        let err = provider
            .load_package(&temp.path().join("does-not-exist"))
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn test_no_go_files_errors() {
        let temp = tempdir().unwrap();
        let mut provider = GoSourceProvider::new().unwrap();
        let err = provider.load_package(temp.path()).unwrap_err();
        assert!(matches!(err, SourceError::NoGoFiles(_)));
    }

    #[test]
    fn test_files_visited_in_sorted_order() {
        let src = load(&[
            ("b.go", "package testpkg\n"),
            (
                "a.go",
                "// Package testpkg is documented in the first file.\npackage testpkg\n",
            ),
        ]);
        assert!(src.description.is_some());
    }
}
