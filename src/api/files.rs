use axum::extract::State;
use axum::Json;

use crate::error::Result;
use crate::models::{FileContent, FileRequest, FilesRequest};
use crate::repo::RepoKey;
use crate::state::AppState;

/// POST /api/file - Read one file from the default branch of a repository.
pub async fn get_file(
    State(state): State<AppState>,
    Json(req): Json<FileRequest>,
) -> Result<Json<FileContent>> {
    let handle = state
        .cache
        .ensure(&RepoKey::new(req.owner, req.repo))
        .await?;

    let file = handle.get_file(&req.path, req.truncate_lines).await?;
    Ok(Json(file))
}

/// POST /api/files - Read up to 20 files from a repository in one batch.
pub async fn get_files(
    State(state): State<AppState>,
    Json(req): Json<FilesRequest>,
) -> Result<Json<Vec<FileContent>>> {
    let handle = state
        .cache
        .ensure(&RepoKey::new(req.owner, req.repo))
        .await?;

    let files = handle.get_files(&req.paths, req.truncate_lines).await?;
    Ok(Json(files))
}
