use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Clone a repository into `target` with a shallow, single-branch,
/// blob-size-limited fetch, and return the resolved default branch name.
///
/// Blocking; callers run this on a blocking worker so the scheduler keeps
/// serving other queries while the fetch runs.
pub fn clone_repo(url: &str, target: &Path, blob_limit_bytes: u64) -> Result<String> {
    tracing::info!("Cloning {} into {}", url, target.display());

    let output = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg("--single-branch")
        .arg(format!("--filter=blob:limit={blob_limit_bytes}"))
        .arg(url)
        .arg(target)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .with_context(|| format!("Failed to spawn git clone for {url}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git clone of {url} failed: {}", stderr.trim());
    }

    let branch = resolved_branch(target)?;
    tracing::info!("Clone complete: {} (branch {branch})", target.display());
    Ok(branch)
}

/// Read the branch name HEAD resolved to after the clone.
fn resolved_branch(target: &Path) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(target)
        .arg("rev-parse")
        .arg("--abbrev-ref")
        .arg("HEAD")
        .output()
        .context("Failed to spawn git rev-parse")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "Could not resolve branch in {}: {}",
            target.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
