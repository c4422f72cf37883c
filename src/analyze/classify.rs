// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Category classification of instrumentation packages.
//!
//! A package's import path is matched against fixed keyword sets to derive
//! coarse category flags (HTTP-like, RPC, database, ...). The matching is
//! case-insensitive substring containment, a deliberate recall-over-
//! precision tradeoff, isolated here so a stricter analysis can replace it
//! without touching the extractors.

use serde::{Deserialize, Serialize};

/// Keywords identifying HTTP-like packages (servers, routers, clients).
const HTTP_KEYWORDS: [&str; 5] = ["http", "gin", "echo", "mux", "restful"];

/// Keywords identifying database client packages.
const DATABASE_KEYWORDS: [&str; 3] = ["mongo", "database", "sql"];

/// Keywords identifying messaging packages.
const MESSAGING_KEYWORDS: [&str; 2] = ["kafka", "messaging"];

/// Keywords identifying serverless packages.
const SERVERLESS_KEYWORDS: [&str; 2] = ["lambda", "faas"];

/// A coarse classification of a package's purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Http,
    Rpc,
    Database,
    Messaging,
    Serverless,
    CloudSdk,
    LangRuntime,
    HostRuntime,
}

/// Category flags derived from a package's import path.
///
/// Transient: recomputed per analysis, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFlags {
    pub http: bool,
    pub rpc: bool,
    pub database: bool,
    pub messaging: bool,
    pub serverless: bool,
    pub cloud_sdk: bool,
    pub lang_runtime: bool,
    pub host_runtime: bool,
}

impl CategoryFlags {
    /// Whether the flag for a given category is set.
    pub fn has(&self, category: Category) -> bool {
        match category {
            Category::Http => self.http,
            Category::Rpc => self.rpc,
            Category::Database => self.database,
            Category::Messaging => self.messaging,
            Category::Serverless => self.serverless,
            Category::CloudSdk => self.cloud_sdk,
            Category::LangRuntime => self.lang_runtime,
            Category::HostRuntime => self.host_runtime,
        }
    }

    /// Whether no category matched.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn contains_any(path: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| path.contains(kw))
}

/// Classify an import path into category flags.
///
/// Pure and total: unmatched paths yield all-false flags.
pub fn classify(import_path: &str) -> CategoryFlags {
    let lower = import_path.to_lowercase();

    CategoryFlags {
        http: contains_any(&lower, &HTTP_KEYWORDS),
        rpc: lower.contains("grpc"),
        database: contains_any(&lower, &DATABASE_KEYWORDS),
        messaging: contains_any(&lower, &MESSAGING_KEYWORDS),
        serverless: contains_any(&lower, &SERVERLESS_KEYWORDS),
        cloud_sdk: lower.contains("aws"),
        lang_runtime: lower.ends_with("/instrumentation/runtime"),
        host_runtime: lower.ends_with("/instrumentation/host"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_http() {
        let flags = classify("go.opentelemetry.io/contrib/instrumentation/github.com/gin-gonic/gin/otelgin");
        assert!(flags.http);
        assert!(!flags.rpc);
        assert!(!flags.database);
    }

    #[test]
    fn test_classify_grpc() {
        let flags = classify("go.opentelemetry.io/contrib/instrumentation/google.golang.org/grpc/otelgrpc");
        assert!(flags.rpc);
        // "google.golang.org" does not trip any other keyword
        assert!(!flags.http);
    }

    #[test]
    fn test_classify_database() {
        let flags = classify("go.opentelemetry.io/contrib/instrumentation/go.mongodb.org/mongo-driver/mongo/otelmongo");
        assert!(flags.database);
    }

    #[test]
    fn test_classify_aws_sdk() {
        let flags =
            classify("go.opentelemetry.io/contrib/instrumentation/github.com/aws/aws-sdk-go-v2/otelaws");
        assert!(flags.cloud_sdk);
        assert!(!flags.serverless);
    }

    #[test]
    fn test_classify_lambda_is_serverless_and_cloud() {
        let flags = classify(
            "go.opentelemetry.io/contrib/instrumentation/github.com/aws/aws-lambda-go/otellambda",
        );
        assert!(flags.serverless);
        assert!(flags.cloud_sdk);
    }

    #[test]
    fn test_classify_runtime_suffixes() {
        let flags = classify("go.opentelemetry.io/contrib/instrumentation/runtime");
        assert!(flags.lang_runtime);
        assert!(!flags.host_runtime);

        let flags = classify("go.opentelemetry.io/contrib/instrumentation/host");
        assert!(flags.host_runtime);
        assert!(!flags.lang_runtime);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let flags = classify("example.com/MyHTTPThing");
        assert!(flags.http);
    }

    #[test]
    fn test_classify_unmatched_is_empty() {
        let flags = classify("example.com/widgets");
        assert!(flags.is_empty());
    }
}
