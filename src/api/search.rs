use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::{Result, ServerError};
use crate::models::{filter_list, FileResult, FindRequest, PathInfo, SearchRequest};
use crate::repo::RepoKey;
use crate::search;
use crate::search::filters::{self, FilterSet};
use crate::state::AppState;

/// POST /api/search - Search code in the default branch of a repository.
///
/// Case-insensitive, up to 3 matches per file, 4 context lines before and
/// after each match.
pub async fn search_code(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Vec<FileResult>>> {
    if req.patterns.iter().all(|p| p.trim().is_empty()) {
        return Err(ServerError::Validation(
            "At least one non-empty search pattern is required".to_string(),
        ));
    }

    let handle = state
        .cache
        .ensure(&RepoKey::new(req.owner, req.repo))
        .await?;

    let filters = FilterSet::build(
        filter_list(req.include_globs),
        filter_list(req.exclude_globs),
        filter_list(req.include_types),
        filter_list(req.exclude_types),
    );

    let results = search::search_code(&handle, &req.patterns, &filters, req.max_results).await?;
    Ok(Json(results))
}

/// POST /api/find - Find file names/paths (not contents) in a repository.
pub async fn find_files(
    State(state): State<AppState>,
    Json(req): Json<FindRequest>,
) -> Result<Json<Vec<PathInfo>>> {
    let handle = state
        .cache
        .ensure(&RepoKey::new(req.owner, req.repo))
        .await?;

    let filters = FilterSet::build(
        filter_list(req.include_globs),
        filter_list(req.exclude_globs),
        filter_list(req.include_types),
        filter_list(req.exclude_types),
    );

    let results = search::find_files(&handle, &filters, req.max_results).await?;
    Ok(Json(results))
}

#[derive(Debug, Serialize)]
pub struct FileTypesResponse {
    /// Tokens accepted by the include_types / exclude_types filters.
    pub types: Vec<&'static str>,
    /// Noise types a caller may want to exclude; never applied automatically.
    pub default_excluded: Vec<&'static str>,
}

/// GET /api/file-types - The type tokens recognized by search and find.
pub async fn file_types() -> Json<FileTypesResponse> {
    Json(FileTypesResponse {
        types: filters::RECOGNIZED_TYPES.to_vec(),
        default_excluded: filters::default_excluded_types(),
    })
}
