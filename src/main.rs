use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use github_code_search::api;
use github_code_search::config::Config;
use github_code_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Clone directory: {}", config.clone_dir.display());
    tracing::info!("Source host: {}", config.source_host);

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/api/file", post(api::files::get_file))
        .route("/api/files", post(api::files::get_files))
        .route("/api/find", post(api::search::find_files))
        .route("/api/search", post(api::search::search_code))
        .route("/api/file-types", get(api::search::file_types))
        .route("/api/repos", get(api::repos::list_repos))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
