// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Source model consumed by the analysis engine.
//!
//! A [`PackageSource`] is the provider's view of one Go package: enough
//! call-site structure, selector names, literal arguments and resolved type
//! hints for the extractors to pattern-match telemetry declarations, and
//! nothing else. The engine performs no I/O and no parsing of its own; it
//! only reads these values.

/// The parsed, flattened source model of one instrumentation package.
#[derive(Debug, Clone, Default)]
pub struct PackageSource {
    /// Package name from the package clause.
    pub name: String,
    /// Import path of the package (module path when a go.mod is present,
    /// otherwise the directory path).
    pub import_path: String,
    /// First non-empty leading package doc comment across the package's
    /// files, visited in sorted filename order.
    pub description: Option<String>,
    /// Declared import paths, deduplicated, in first-seen order.
    pub imports: Vec<String>,
    /// Every selector identifier in the package, in document order. Used
    /// by the span kind-hint pass.
    pub selectors: Vec<String>,
    /// Every selector-method call expression in the package, in document
    /// order, nested calls included as their own entries.
    pub calls: Vec<CallSite>,
}

/// One call expression whose function is a selector (`recv.Method(...)`).
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    /// The selector method name (`Start`, `SetAttributes`, `Int64Counter`).
    pub method: String,
    /// Structured arguments in call order.
    pub args: Vec<Expr>,
}

impl CallSite {
    pub fn new(method: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// A modeled argument expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal with quotes stripped.
    Str(String),
    /// Nested selector-method call.
    Call(Box<CallSite>),
    /// Selector expression such as `trace.SpanKindServer`; holds the
    /// rightmost identifier.
    Selector(String),
    /// Identifier with the type the provider resolved for it, if any.
    Ident { name: String, ty: Option<String> },
    /// Anything the provider does not model.
    Opaque,
}

impl Expr {
    /// The resolved type of this expression, when the provider knows it.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Expr::Ident { ty, .. } => ty.as_deref(),
            _ => None,
        }
    }

    /// The string literal value, if this is one.
    pub fn as_str_lit(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The nested call, if this is one.
    pub fn as_call(&self) -> Option<&CallSite> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Whether the resolved type denotes a context/deadline carrier.
    pub fn is_context(&self) -> bool {
        self.type_name()
            .map(|ty| ty.contains("context.Context"))
            .unwrap_or(false)
    }
}
