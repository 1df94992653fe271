use std::sync::Arc;

use crate::config::Config;
use crate::repo::cache::RepoCache;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cache: Arc<RepoCache>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let cache = RepoCache::new(&config)?;
        Ok(Self {
            config,
            cache: Arc::new(cache),
        })
    }
}
