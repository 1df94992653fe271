use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors surfaced to callers. Every variant carries enough context to name
/// the offending owner/repo/path in its message.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Repository {owner}/{repo} is unavailable: {source:#}")]
    RepositoryUnavailable {
        owner: String,
        repo: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("File path {path} is invalid for repository {owner}/{repo}")]
    InvalidPath {
        owner: String,
        repo: String,
        path: String,
    },

    #[error("File {path} not found in repository {owner}/{repo}")]
    FileNotFound {
        owner: String,
        repo: String,
        path: String,
    },

    #[error("Cannot get more than {limit} files from a repository ({given} requested)")]
    TooManyPaths { given: usize, limit: usize },

    #[error("{0}")]
    Validation(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::RepositoryUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ServerError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            ServerError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            ServerError::TooManyPaths { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_unavailable_reports_cause() {
        let err = ServerError::RepositoryUnavailable {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            source: anyhow::anyhow!("network is down"),
        };
        let msg = err.to_string();
        assert!(msg.contains("octocat/hello-world"));
        assert!(msg.contains("network is down"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_too_many_paths_names_both_counts() {
        let err = ServerError::TooManyPaths {
            given: 21,
            limit: 20,
        };
        assert!(err.to_string().contains("20"));
        assert!(err.to_string().contains("21"));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
