//! Async entry points for callers running an event loop.
//!
//! The engine itself is blocking; these run it on tokio's blocking pool.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pyscope_domain::{ProjectInfo, ResolutionConfig};

use super::resolver::Resolver;

/// Classifies `cwd` without blocking the calling task.
///
/// # Errors
/// Returns an error only if the blocking task panicked or was aborted.
pub async fn resolve_project_async(
    resolver: Resolver,
    cwd: PathBuf,
    config: ResolutionConfig,
) -> Result<ProjectInfo> {
    tokio::task::spawn_blocking(move || resolver.classify(&cwd, &config))
        .await
        .context("project resolution task failed")
}

/// Runs the `--version` probe without blocking the calling task.
///
/// # Errors
/// Returns an error only if the blocking task panicked or was aborted.
pub async fn probe_version_async(
    resolver: Resolver,
    interpreter: Option<PathBuf>,
) -> Result<Option<String>> {
    tokio::task::spawn_blocking(move || resolver.get_version(interpreter.as_deref()))
        .await
        .context("version probe task failed")
}
