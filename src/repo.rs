// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Upstream repository sync.
//!
//! Clones or updates the instrumentation repositories and the tagged
//! semantic-conventions registry with the `git` CLI, and captures the
//! checked-out revision for the scan logs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::error::RepoError;

/// Directory under the working dir where repositories are cloned.
pub const CLONE_DIR: &str = ".repo";

/// Upstream instrumentation repositories to scan.
const REPOS: [&str; 1] = ["https://github.com/open-telemetry/opentelemetry-go-contrib.git"];

/// Semantic-conventions registry repository and the tag to check out.
const SEMCONV_REPO: &str = "https://github.com/open-telemetry/semantic-conventions.git";
const SEMCONV_TAG: &str = "v1.38.0";

/// Subdirectory of the semconv repo holding the registry model.
const SEMCONV_MODEL_DIR: &str = "model";

const SHA_LENGTH: usize = 8;

/// A synced repository checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub name: String,
    pub path: PathBuf,
    pub head: String,
    pub sha: String,
    pub message: String,
}

/// Repository name from a clone URL.
fn repo_name(url: &str) -> String {
    url.rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git")
        .to_string()
}

/// Run a git command in `dir` and capture trimmed stdout.
fn git(dir: &Path, args: &[&str]) -> Result<String, RepoError> {
    let repo = dir.display().to_string();
    let action = args.first().copied().unwrap_or("git");

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| RepoError::git(action, &repo, e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(RepoError::git(action, &repo, stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn clone(url: &str, dir: &Path, extra_args: &[&str]) -> Result<(), RepoError> {
    let mut args = vec!["clone"];
    args.extend_from_slice(extra_args);
    args.push(url);
    git(dir, &args).map(|_| ())
}

fn pull(path: &Path) -> Result<(), RepoError> {
    git(path, &["pull", "--rebase"]).map(|_| ())
}

/// The checked-out revision of a repository.
fn head_info(path: &Path) -> Result<(String, String, String), RepoError> {
    let head = git(path, &["rev-parse", "--short", "HEAD"])?;
    let sha = git(path, &["log", "-1", "--format=%H"])?;
    let message = git(path, &["log", "-1", "--format=%s"])?;
    let sha = sha.chars().take(SHA_LENGTH).collect();
    Ok((head, sha, message.replace('\n', " ")))
}

/// Clone a repository if absent, pull it otherwise, and report its state.
fn sync(url: &str, clone_dir: &Path) -> Result<RepoInfo, RepoError> {
    let name = repo_name(url);
    let repo_path = clone_dir.join(&name);

    if repo_path.exists() {
        pull(&repo_path)?;
    } else {
        clone(url, clone_dir, &[])?;
    }

    let (head, sha, message) = head_info(&repo_path)?;
    let info = RepoInfo {
        name: name.clone(),
        path: repo_path,
        head,
        sha,
        message,
    };
    info!(repo = %name, head = %info.head, sha = %info.sha, message = %info.message, "synced");
    Ok(info)
}

/// Clone or update the upstream instrumentation repositories.
///
/// Repositories that fail to sync are logged and skipped; an error is
/// returned only when none could be synced.
pub fn checkout(work_dir: &Path) -> Result<Vec<RepoInfo>, RepoError> {
    let clone_dir = work_dir.join(CLONE_DIR);
    std::fs::create_dir_all(&clone_dir)?;

    let mut infos = Vec::new();
    let mut last_err = None;
    for url in REPOS {
        match sync(url, &clone_dir) {
            Ok(info) => infos.push(info),
            Err(err) => {
                warn!(repo = %repo_name(url), error = %err, "sync failed");
                last_err = Some(err);
            }
        }
    }

    if infos.is_empty() {
        if let Some(err) = last_err {
            return Err(err);
        }
    }
    Ok(infos)
}

/// Check out the tagged semantic-conventions registry and return the path
/// of its model directory.
pub fn checkout_semconv(work_dir: &Path) -> Result<PathBuf, RepoError> {
    let clone_dir = work_dir.join(CLONE_DIR);
    std::fs::create_dir_all(&clone_dir)?;

    let name = repo_name(SEMCONV_REPO);
    let repo_path = clone_dir.join(&name);

    if !repo_path.exists() {
        clone(
            SEMCONV_REPO,
            &clone_dir,
            &["--depth", "1", "--branch", SEMCONV_TAG],
        )?;
    }

    info!(repo = %name, tag = SEMCONV_TAG, "semantic conventions ready");
    Ok(repo_path.join(SEMCONV_MODEL_DIR))
}
