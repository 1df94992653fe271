//! Identity-keyed cache of checkouts with single-flight fetch admission.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::git;
use crate::repo::{RepoHandle, RepoKey};

/// The underlying fetch of one repository into a scratch directory. Blocking;
/// the cache runs it on a blocking worker. Returns the resolved branch name.
pub trait RepoFetcher: Send + Sync + 'static {
    fn fetch(&self, key: &RepoKey, target: &Path) -> anyhow::Result<String>;
}

/// Shallow, single-branch, blob-size-limited clone via the git CLI.
pub struct GitFetcher {
    pub host: String,
    pub blob_limit_bytes: u64,
}

impl RepoFetcher for GitFetcher {
    fn fetch(&self, key: &RepoKey, target: &Path) -> anyhow::Result<String> {
        git::clone_repo(&key.clone_url(&self.host), target, self.blob_limit_bytes)
    }
}

/// Owns the identity-to-handle mapping. At most one fetch ever runs per
/// identity; handles are never evicted for the process lifetime.
///
/// Admission uses one process-wide lock, so fetches for different
/// repositories are serialized against each other as well. Simplicity over
/// fetch throughput; revisit with a per-identity lock if it matters.
pub struct RepoCache {
    repos: RwLock<HashMap<RepoKey, Arc<RepoHandle>>>,
    admission: tokio::sync::Mutex<()>,
    clone_dir: PathBuf,
    source_host: String,
    fetcher: Arc<dyn RepoFetcher>,
}

impl RepoCache {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let fetcher = GitFetcher {
            host: config.source_host.clone(),
            blob_limit_bytes: config.blob_limit_bytes,
        };
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn RepoFetcher>) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.clone_dir)
            .with_context(|| format!("Could not create {}", config.clone_dir.display()))?;
        let clone_dir = config
            .clone_dir
            .canonicalize()
            .context("Clone directory is not resolvable")?;

        Ok(Self {
            repos: RwLock::new(HashMap::new()),
            admission: tokio::sync::Mutex::new(()),
            clone_dir,
            source_host: config.source_host.clone(),
            fetcher,
        })
    }

    /// All published handles, for the read-only listing surface.
    pub fn list(&self) -> Vec<Arc<RepoHandle>> {
        self.repos.read().values().cloned().collect()
    }

    /// Return the handle for `key`, fetching it first if this is the first
    /// access. Concurrent calls for the same identity collapse into one
    /// fetch; a failed fetch publishes nothing, so a later call retries.
    pub async fn ensure(&self, key: &RepoKey) -> Result<Arc<RepoHandle>> {
        // Hot path: published handles are immutable, a read lock suffices.
        if let Some(handle) = self.repos.read().get(key) {
            return Ok(handle.clone());
        }

        let _admission = self.admission.lock().await;

        // Another caller may have finished the fetch while we waited.
        if let Some(handle) = self.repos.read().get(key) {
            return Ok(handle.clone());
        }

        let handle = self.fetch_and_publish(key).await?;
        Ok(handle)
    }

    async fn fetch_and_publish(&self, key: &RepoKey) -> Result<Arc<RepoHandle>> {
        let unavailable = |source: anyhow::Error| ServerError::RepositoryUnavailable {
            owner: key.owner.clone(),
            repo: key.repo.clone(),
            source,
        };

        let scratch = tempfile::Builder::new()
            .prefix(&format!("{}_{}", key.owner, key.repo))
            .tempdir_in(&self.clone_dir)
            .map_err(|e| {
                unavailable(anyhow::Error::new(e).context("Could not create scratch directory"))
            })?
            .into_path();

        tracing::info!("Fetching repository {key} into {}", scratch.display());

        let fetcher = Arc::clone(&self.fetcher);
        let key_owned = key.clone();
        let target = scratch.clone();
        let fetched = tokio::task::spawn_blocking(move || fetcher.fetch(&key_owned, &target))
            .await
            .map_err(|e| unavailable(anyhow::anyhow!("Fetch task failed: {e}")));

        let branch = match fetched.and_then(|r| r.map_err(unavailable)) {
            Ok(branch) => branch,
            Err(e) => {
                let _ = std::fs::remove_dir_all(&scratch);
                tracing::error!("Fetch failed for {key}: {e}");
                return Err(e);
            }
        };

        let handle = RepoHandle::new(key.clone(), branch, &scratch, self.source_host.clone())
            .map_err(unavailable)?;
        let handle = Arc::new(handle);

        self.repos.write().insert(key.clone(), handle.clone());
        tracing::info!("Repository {key} ready at {}", handle.local_path.display());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RepoFetcher for CountingFetcher {
        fn fetch(&self, _key: &RepoKey, _target: &Path) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Widen the race window so concurrent callers pile up on admission.
            std::thread::sleep(Duration::from_millis(20));
            if self.fail {
                anyhow::bail!("simulated fetch failure");
            }
            Ok("main".to_string())
        }
    }

    fn test_cache(dir: &Path, fail: bool) -> (Arc<RepoCache>, Arc<CountingFetcher>) {
        let config = Config {
            clone_dir: dir.to_path_buf(),
            ..Config::default()
        };
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            fail,
        });
        let cache = RepoCache::with_fetcher(&config, fetcher.clone()).unwrap();
        (Arc::new(cache), fetcher)
    }

    #[tokio::test]
    async fn test_concurrent_ensure_fetches_once() {
        let dir = tempfile::tempdir().unwrap();
        let (cache, fetcher) = test_cache(dir.path(), false);
        let key = RepoKey::new("octocat", "hello-world");

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let key = key.clone();
            tasks.push(tokio::spawn(async move { cache.ensure(&key).await }));
        }

        let mut paths = Vec::new();
        for task in tasks {
            let handle = task.await.unwrap().unwrap();
            paths.push(handle.local_path.clone());
        }

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert!(paths.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn test_distinct_identities_get_distinct_handles() {
        let dir = tempfile::tempdir().unwrap();
        let (cache, fetcher) = test_cache(dir.path(), false);

        let a = cache.ensure(&RepoKey::new("octocat", "alpha")).await.unwrap();
        let b = cache.ensure(&RepoKey::new("octocat", "beta")).await.unwrap();

        assert_ne!(a.local_path, b.local_path);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.list().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_publishes_nothing_and_retries() {
        let dir = tempfile::tempdir().unwrap();
        let (cache, fetcher) = test_cache(dir.path(), true);
        let key = RepoKey::new("octocat", "broken");

        let err = cache.ensure(&key).await.unwrap_err();
        assert!(matches!(err, ServerError::RepositoryUnavailable { .. }));
        assert!(cache.list().is_empty());

        // No handle was published, so a second call issues a new fetch.
        let _ = cache.ensure(&key).await.unwrap_err();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_identity_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let (cache, fetcher) = test_cache(dir.path(), false);

        cache.ensure(&RepoKey::new("Octocat", "Repo")).await.unwrap();
        cache.ensure(&RepoKey::new("octocat", "repo")).await.unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
