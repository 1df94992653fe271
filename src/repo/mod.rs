//! Repository identity and read-only access to a single checkout.

pub mod cache;

use std::fmt;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, ServerError};
use crate::models::{FileContent, GET_FILES_LIMIT};

/// The (owner, repository-name) pair used as the cache key. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoKey {
    pub owner: String,
    pub repo: String,
}

impl RepoKey {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn clone_url(&self, host: &str) -> String {
        format!("{host}/{}/{}.git", self.owner, self.repo)
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A local, shallow, read-only checkout of one repository at its resolved
/// default branch. Created once per identity and never mutated afterward.
#[derive(Debug, Serialize)]
pub struct RepoHandle {
    pub key: RepoKey,
    pub branch: String,
    pub local_path: PathBuf,
    pub source_host: String,
    pub fetched_at: DateTime<Utc>,
}

impl RepoHandle {
    pub fn new(
        key: RepoKey,
        branch: String,
        local_path: &Path,
        source_host: String,
    ) -> anyhow::Result<Self> {
        let local_path = local_path
            .canonicalize()
            .with_context(|| format!("Checkout path {} is not resolvable", local_path.display()))?;
        Ok(Self {
            key,
            branch,
            local_path,
            source_host,
            fetched_at: Utc::now(),
        })
    }

    /// Browsable URL for a file at this handle's branch.
    pub fn file_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/blob/{}/{}",
            self.source_host, self.key.owner, self.key.repo, self.branch, path
        )
    }

    /// Resolve `path` against the checkout root, rejecting anything that
    /// escapes it. The path is normalized lexically first so traversal is
    /// caught even for files that do not exist; existing files are then
    /// canonicalized so symlinks cannot escape either.
    pub fn contained_path(&self, path: &str) -> Result<PathBuf> {
        let invalid = || ServerError::InvalidPath {
            owner: self.key.owner.clone(),
            repo: self.key.repo.clone(),
            path: path.to_string(),
        };

        let mut resolved = self.local_path.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() || !resolved.starts_with(&self.local_path) {
                        return Err(invalid());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(invalid()),
            }
        }
        if !resolved.starts_with(&self.local_path) {
            return Err(invalid());
        }

        if !resolved.exists() {
            return Err(ServerError::FileNotFound {
                owner: self.key.owner.clone(),
                repo: self.key.repo.clone(),
                path: path.to_string(),
            });
        }

        let real = resolved.canonicalize().map_err(|_| invalid())?;
        if !real.starts_with(&self.local_path) {
            return Err(invalid());
        }

        Ok(real)
    }

    /// Read one file, truncated to `truncate_lines`.
    pub async fn get_file(&self, path: &str, truncate_lines: usize) -> Result<FileContent> {
        let file_path = self.contained_path(path)?;

        let text = tokio::fs::read_to_string(&file_path).await.map_err(|e| {
            ServerError::Validation(format!(
                "Could not read {path} in repository {}: {e}",
                self.key
            ))
        })?;

        Ok(FileContent::from_text(
            self.file_url(path),
            &text,
            Some(truncate_lines),
        ))
    }

    /// Read up to [`GET_FILES_LIMIT`] files. The batch size is checked before
    /// any file is opened.
    pub async fn get_files(
        &self,
        paths: &[String],
        truncate_lines: usize,
    ) -> Result<Vec<FileContent>> {
        if paths.len() > GET_FILES_LIMIT {
            return Err(ServerError::TooManyPaths {
                given: paths.len(),
                limit: GET_FILES_LIMIT,
            });
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(self.get_file(path, truncate_lines).await?);
        }
        Ok(files)
    }
}
