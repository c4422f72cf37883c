// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Source model provider.
//!
//! Everything the analysis engine knows about a package comes through
//! here: [`GoSourceProvider`] parses a package directory with tree-sitter
//! and produces a [`PackageSource`], the flattened syntax model the
//! extractors pattern-match against. The engine itself never touches the
//! filesystem or a parser.

pub mod model;
pub mod provider;

pub use model::{CallSite, Expr, PackageSource};
pub use provider::GoSourceProvider;
