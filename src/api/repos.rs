use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// One cached checkout, for the read-only listing.
#[derive(Debug, Serialize)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub local_path: String,
    pub fetched_at: DateTime<Utc>,
}

/// GET /api/repos - List repositories fetched so far (oldest first).
pub async fn list_repos(State(state): State<AppState>) -> Json<Vec<RepoInfo>> {
    let mut repos: Vec<RepoInfo> = state
        .cache
        .list()
        .into_iter()
        .map(|handle| RepoInfo {
            owner: handle.key.owner.clone(),
            repo: handle.key.repo.clone(),
            branch: handle.branch.clone(),
            local_path: handle.local_path.display().to_string(),
            fetched_at: handle.fetched_at,
        })
        .collect();
    repos.sort_by_key(|r| r.fetched_at);
    Json(repos)
}
