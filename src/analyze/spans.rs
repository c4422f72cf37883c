// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Span extraction from a package's call sites.
//!
//! Two passes over the source model: a hint pass that records which span
//! kinds are named anywhere in the package's selectors, and a call pass
//! that recognizes span-start, attribute-setting and event-recording
//! calls. Hints are a fallback signal only: a `Start` call is evidence, a
//! `SpanKindServer` identifier on its own is not.
//!
//! Malformed or unrecognized call shapes are silently skipped; the scan is
//! best-effort and absence of evidence is not an error.

use std::collections::{BTreeMap, HashSet};

use super::catalog::ConventionCatalog;
use super::classify::CategoryFlags;
use super::types::{Attribute, AttributeType, Span, SpanKind};
use crate::source::{CallSite, Expr, PackageSource};

/// Span kinds hinted by identifiers in the package, in fallback
/// precedence order (Server > Client > Producer > Consumer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindHints {
    hinted: [bool; SpanKind::HINTABLE.len()],
}

impl KindHints {
    /// Scan selector identifiers for span kind names. Evidence accumulates:
    /// any identifier containing a kind's name sets that kind's hint.
    pub fn detect(selectors: &[String]) -> Self {
        let mut hints = Self::default();
        for ident in selectors {
            for (i, kind) in SpanKind::HINTABLE.iter().enumerate() {
                if kind.matches_identifier(ident) {
                    hints.hinted[i] = true;
                }
            }
        }
        hints
    }

    pub fn is_empty(&self) -> bool {
        !self.hinted.iter().any(|&h| h)
    }

    /// The highest-precedence hinted kind, if any.
    pub fn resolve(&self) -> Option<SpanKind> {
        self.iter().next()
    }

    /// Hinted kinds in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = SpanKind> + '_ {
        SpanKind::HINTABLE
            .iter()
            .enumerate()
            .filter(|(i, _)| self.hinted[*i])
            .map(|(_, kind)| *kind)
    }
}

/// Accumulated attribute set for one span kind.
///
/// Tracks which names were seeded from the catalog so that syntactic
/// evidence can replace a seeded entry's type in place. Among syntactic
/// observations of one name, the first wins.
#[derive(Debug, Clone)]
struct SpanRecord {
    kind: SpanKind,
    attributes: Vec<Attribute>,
    seeded: HashSet<String>,
}

impl SpanRecord {
    /// A record seeded with catalog default attributes.
    fn seeded(kind: SpanKind, defaults: &[Attribute]) -> Self {
        Self {
            kind,
            attributes: defaults.to_vec(),
            seeded: defaults.iter().map(|a| a.name.clone()).collect(),
        }
    }

    /// A record with no catalog seed.
    fn bare(kind: SpanKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            seeded: HashSet::new(),
        }
    }

    fn insert(&mut self, attr: Attribute) {
        if let Some(pos) = self.attributes.iter().position(|a| a.name == attr.name) {
            // Syntactic evidence replaces a catalog-seeded type in place;
            // a second syntactic observation is a no-op.
            if self.seeded.remove(&attr.name) {
                self.attributes[pos].attr_type = attr.attr_type;
            }
            return;
        }
        self.attributes.push(attr);
    }

    fn into_span(self) -> Span {
        Span {
            kind: self.kind,
            attributes: self.attributes,
        }
    }
}

/// Extracts deduplicated per-kind span records from a package.
pub struct SpanExtractor<'a> {
    catalog: &'a ConventionCatalog,
    flags: CategoryFlags,
}

impl<'a> SpanExtractor<'a> {
    pub fn new(catalog: &'a ConventionCatalog, flags: CategoryFlags) -> Self {
        Self { catalog, flags }
    }

    /// Run both passes and return spans in canonical kind order.
    pub fn extract(&self, src: &PackageSource) -> Vec<Span> {
        let hints = KindHints::detect(&src.selectors);
        let mut spans: BTreeMap<SpanKind, SpanRecord> = BTreeMap::new();
        let mut start_seen = false;

        for call in &src.calls {
            match call.method.as_str() {
                "Start" if is_span_start(call) => {
                    start_seen = true;
                    self.record_start(call, &mut spans, hints);
                }
                "SetAttributes" => {
                    self.record_attributes(&call.args, &mut spans, hints);
                }
                "AddEvent" => {
                    self.record_event(call, &mut spans, hints);
                }
                _ => {}
            }
        }

        // A Start call was seen but its options could not be parsed into a
        // span record; synthesize one per hinted kind from catalog defaults.
        if start_seen && spans.is_empty() && !hints.is_empty() {
            for kind in hints.iter() {
                let defaults = self.catalog.span_defaults(kind, self.flags);
                spans.insert(kind, SpanRecord::seeded(kind, defaults));
            }
        }

        spans.into_values().map(SpanRecord::into_span).collect()
    }

    /// Handle a span-start call: resolve the kind from a `WithSpanKind`
    /// option, then hints, then Internal; union any `WithAttributes`
    /// attributes into the span record for that kind.
    fn record_start(
        &self,
        call: &CallSite,
        spans: &mut BTreeMap<SpanKind, SpanRecord>,
        hints: KindHints,
    ) {
        let mut explicit_kind: Option<SpanKind> = None;
        let mut attributes: Vec<Attribute> = Vec::new();

        for arg in call.args.iter().skip(2) {
            let Some(option) = arg.as_call() else {
                continue;
            };
            match option.method.as_str() {
                "WithSpanKind" => {
                    if let Some(Expr::Selector(ident)) = option.args.first() {
                        explicit_kind = Some(resolve_kind_identifier(ident));
                    }
                }
                "WithAttributes" => {
                    attributes.extend(parse_attributes(&option.args));
                }
                _ => {}
            }
        }

        let kind = explicit_kind
            .or_else(|| hints.resolve())
            .unwrap_or(SpanKind::Internal);

        let record = spans.entry(kind).or_insert_with(|| {
            SpanRecord::seeded(kind, self.catalog.span_defaults(kind, self.flags))
        });
        for attr in attributes {
            record.insert(attr);
        }
    }

    /// Handle a `SetAttributes` call. Attribute evidence is never
    /// discarded: with no span records yet, spans are synthesized per
    /// hinted kind (or a single Internal span when nothing is hinted), and
    /// the attributes are unioned into every record.
    fn record_attributes(
        &self,
        args: &[Expr],
        spans: &mut BTreeMap<SpanKind, SpanRecord>,
        hints: KindHints,
    ) {
        let attributes = parse_attributes(args);
        if attributes.is_empty() {
            return;
        }

        if spans.is_empty() {
            for kind in hints.iter() {
                spans.insert(kind, SpanRecord::bare(kind));
            }
            if spans.is_empty() {
                spans.insert(SpanKind::Internal, SpanRecord::bare(SpanKind::Internal));
            }
        }

        for record in spans.values_mut() {
            for attr in &attributes {
                record.insert(attr.clone());
            }
        }
    }

    /// Handle an `AddEvent` call: a nested `WithAttributes` option among
    /// the trailing arguments is treated exactly like `SetAttributes`.
    fn record_event(
        &self,
        call: &CallSite,
        spans: &mut BTreeMap<SpanKind, SpanRecord>,
        hints: KindHints,
    ) {
        if call.args.len() < 2 {
            return;
        }
        for arg in call.args.iter().skip(1) {
            if let Some(inner) = arg.as_call() {
                if inner.method == "WithAttributes" {
                    self.record_attributes(&inner.args, spans, hints);
                }
            }
        }
    }
}

/// A `Start` call is a span start when it has at least two arguments and
/// the first argument's resolved type is a context carrier. This is the
/// guard against unrelated `Start` methods.
fn is_span_start(call: &CallSite) -> bool {
    call.args.len() >= 2 && call.args.first().map(Expr::is_context).unwrap_or(false)
}

/// Resolve a kind identifier such as `SpanKindServer`. Identifiers naming
/// none of the four hintable kinds resolve to Internal.
fn resolve_kind_identifier(ident: &str) -> SpanKind {
    for kind in SpanKind::HINTABLE {
        if kind.matches_identifier(ident) {
            return kind;
        }
    }
    SpanKind::Internal
}

/// Extract attributes from `WithAttributes`-style option arguments.
///
/// Each attribute is a two-argument call whose first argument is a string
/// literal key; the selector name encodes the value type
/// (`attribute.String`, `attribute.Int64`, ...). Anything else is skipped.
pub(crate) fn parse_attributes(args: &[Expr]) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    for arg in args {
        let Some(call) = arg.as_call() else {
            continue;
        };
        if call.args.len() < 2 {
            continue;
        }
        let Some(name) = call.args[0].as_str_lit() else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        attributes.push(Attribute::new(name, AttributeType::infer(&call.method)));
    }
    attributes
}
