//! Code search and file finding against a checkout, backed by the external
//! ripgrep engine.

pub mod context;
pub mod engine;
pub mod filters;
pub mod limit;

use crate::error::Result;
use crate::models::{FileResult, PathInfo, CONTEXT_AFTER, CONTEXT_BEFORE};
use crate::repo::RepoHandle;
use crate::search::engine::{FindStream, SearchStream};
use crate::search::filters::FilterSet;
use crate::search::limit::ResultLimiter;

/// Search the checkout for `patterns` and shape the engine's stream into at
/// most `max_results` per-file results, in the engine's order.
pub async fn search_code(
    handle: &RepoHandle,
    patterns: &[String],
    filters: &FilterSet,
    max_results: usize,
) -> Result<Vec<FileResult>> {
    let mut stream = SearchStream::spawn(&handle.local_path, patterns, filters)?;
    let mut limiter = ResultLimiter::new(max_results);

    while !limiter.is_full() {
        let Some(raw) = stream.next_file().await? else {
            break;
        };

        let matches = context::assemble(&raw, CONTEXT_BEFORE, CONTEXT_AFTER);
        if limiter.push(FileResult {
            url: handle.file_url(&raw.path),
            matches,
        }) {
            break;
        }
    }

    Ok(limiter.into_inner())
}

/// List up to `max_results` file paths in the checkout, names only.
pub async fn find_files(
    handle: &RepoHandle,
    filters: &FilterSet,
    max_results: usize,
) -> Result<Vec<PathInfo>> {
    let mut stream = FindStream::spawn(&handle.local_path, filters)?;
    let mut limiter = ResultLimiter::new(max_results);

    while !limiter.is_full() {
        let Some(path) = stream.next_path().await? else {
            break;
        };
        if limiter.push(PathInfo { path }) {
            break;
        }
    }

    Ok(limiter.into_inner())
}
