// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the otelscan scanner.
//!
//! This module provides strongly-typed errors for different parts of the
//! application, using `thiserror` for ergonomic error definitions and
//! `anyhow` for error propagation.

use thiserror::Error;

/// Errors that can occur while loading a package's source model.
///
/// These are fatal for the package being analyzed: if the provider cannot
/// resolve or parse a package, no analysis is produced for it. Unrecognized
/// call shapes inside a successfully loaded package are not errors.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Package directory not found: {0}")]
    NotFound(String),

    #[error("No Go source files in package: {0}")]
    NoGoFiles(String),

    #[error("Failed to load Go grammar: {0}")]
    Grammar(String),

    #[error("Failed to parse file: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

/// Errors that can occur while discovering and parsing instrumentation
/// packages in a repository tree.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("go.mod not found: {0}")]
    GoModNotFound(String),

    #[error("Invalid go.mod: {0}")]
    InvalidGoMod(String),

    #[error("Walk error: {0}")]
    Walk(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::GoModNotFound(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        Self::Walk(err.to_string())
    }
}

/// Errors that can occur while loading the semantic-conventions registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error reading registry: {0}")]
    Io(String),

    #[error("YAML parsing error: {0}")]
    Yaml(String),
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for RegistryError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Errors that can occur while writing registry artifacts.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error writing artifact: {0}")]
    Io(String),

    #[error("YAML encoding error: {0}")]
    Yaml(String),
}

impl From<std::io::Error> for GenerateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for GenerateError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Errors that can occur while syncing upstream repositories.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("git {action} failed for {repo}: {message}")]
    Git {
        action: String,
        repo: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(String),
}

impl RepoError {
    /// Create a git command failure for a repository.
    pub fn git(
        action: impl Into<String>,
        repo: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Git {
            action: action.into(),
            repo: repo.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;
