//! Process-wide station directory cache.
//!
//! The registry is large and changes rarely, so it is fetched at most once
//! and the grouped directory is kept for the lifetime of the process. The
//! first build is single-flight: callers that arrive while it is running
//! wait on that same build and share its result or its error. A failed
//! build is not cached; the next caller starts a new one.

use std::sync::Arc;
use std::time::Instant;

use moka::future::Cache as MokaCache;
use tracing::{info, warn};

use crate::stops::{StopError, StopSource};

use super::error::DirectoryError;
use super::station::{Station, StationDirectory};

/// Lazily built, shared station directory.
pub struct StationDirectoryCache<S> {
    source: S,
    /// Holds at most one entry: the current snapshot.
    snapshot: MokaCache<(), Arc<StationDirectory>>,
}

impl<S: StopSource> StationDirectoryCache<S> {
    /// Create an empty cache. Nothing is fetched until the first query.
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: MokaCache::builder().build(),
        }
    }

    /// Fetch the registry and group it into a directory.
    async fn build(&self) -> Result<Arc<StationDirectory>, StopError> {
        let started = Instant::now();
        let stops = self.source.fetch().await?;
        let directory = StationDirectory::build(stops);

        info!(
            stations = directory.len(),
            stops = directory.stop_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built station directory"
        );

        Ok(Arc::new(directory))
    }

    /// Get the directory, building it on first use.
    pub async fn get_all(&self) -> Result<Arc<StationDirectory>, DirectoryError> {
        // Only the caller that runs the build logs its failure.
        let init = async {
            let result = self.build().await;
            if let Err(e) = &result {
                warn!(error = %e, "station directory build failed");
            }
            result
        };

        self.snapshot
            .try_get_with((), init)
            .await
            .map_err(DirectoryError::Build)
    }

    /// Look up one station by its exact name.
    pub async fn get_by_name(&self, name: &str) -> Result<Station, DirectoryError> {
        let directory = self.get_all().await?;
        directory
            .get(name)
            .cloned()
            .ok_or_else(|| DirectoryError::StationNotFound {
                name: name.to_string(),
            })
    }

    /// Rebuild the directory and swap it in whole.
    ///
    /// On failure the current snapshot (if any) stays in place.
    pub async fn refresh(&self) -> Result<usize, DirectoryError> {
        let directory = self
            .build()
            .await
            .map_err(|e| DirectoryError::Build(Arc::new(e)))?;
        let count = directory.len();

        self.snapshot.insert((), directory).await;

        Ok(count)
    }

    /// Whether a snapshot is currently held.
    pub fn is_loaded(&self) -> bool {
        self.snapshot.contains_key(&())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, StopId};
    use crate::stops::StopRecord;
    use futures::future::join_all;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Source that counts fetches and can be switched into failing.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
        stops: Vec<StopRecord>,
        delay: Duration,
    }

    impl CountingSource {
        fn new(stops: Vec<StopRecord>) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail: Arc::new(AtomicBool::new(false)),
                stops,
                delay: Duration::from_millis(20),
            }
        }
    }

    impl StopSource for CountingSource {
        async fn fetch(&self) -> Result<Vec<StopRecord>, StopError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail.load(Ordering::SeqCst) {
                return Err(StopError::Fetch {
                    message: "registry offline".into(),
                });
            }
            Ok(self.stops.clone())
        }
    }

    fn stop(id: u32, name: &str) -> StopRecord {
        StopRecord {
            id: StopId(id),
            name: name.to_string(),
            location: Coordinate::new(48.2, 16.37).unwrap(),
            diva: "60200001".to_string(),
        }
    }

    fn sample() -> Vec<StopRecord> {
        vec![
            stop(4111, "Karlsplatz"),
            stop(4118, "Karlsplatz"),
            stop(4201, "Stephansplatz"),
        ]
    }

    #[tokio::test]
    async fn builds_lazily() {
        let source = CountingSource::new(sample());
        let calls = source.calls.clone();
        let cache = StationDirectoryCache::new(source);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!cache.is_loaded());

        let directory = cache.get_all().await.unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_loaded());
    }

    #[tokio::test]
    async fn later_queries_do_not_refetch() {
        let source = CountingSource::new(sample());
        let calls = source.calls.clone();
        let cache = StationDirectoryCache::new(source);

        cache.get_all().await.unwrap();
        cache.get_by_name("Karlsplatz").await.unwrap();
        cache.get_by_name("Stephansplatz").await.unwrap();
        cache.get_all().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_first_callers_share_one_fetch() {
        let source = CountingSource::new(sample());
        let calls = source.calls.clone();
        let cache = StationDirectoryCache::new(source);

        let results = join_all((0..8).map(|_| cache.get_all())).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_a_failed_build() {
        let source = CountingSource::new(sample());
        source.fail.store(true, Ordering::SeqCst);
        let calls = source.calls.clone();
        let cache = StationDirectoryCache::new(source);

        let results = join_all((0..4).map(|_| cache.get_all())).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for result in results {
            assert!(matches!(result, Err(DirectoryError::Build(_))));
        }
        assert!(!cache.is_loaded());
    }

    /// Counts `WARN` events seen on the current thread.
    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn failed_shared_build_warns_once() {
        use tracing_subscriber::layer::SubscriberExt;

        let warnings = WarnCounter::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(warnings.clone()));

        let source = CountingSource::new(sample());
        source.fail.store(true, Ordering::SeqCst);
        let cache = StationDirectoryCache::new(source);

        let results = join_all((0..4).map(|_| cache.get_all())).await;

        assert!(results.iter().all(Result::is_err));
        assert_eq!(warnings.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_build_is_retried_by_next_caller() {
        let source = CountingSource::new(sample());
        let fail = source.fail.clone();
        let calls = source.calls.clone();
        fail.store(true, Ordering::SeqCst);
        let cache = StationDirectoryCache::new(source);

        assert!(cache.get_all().await.is_err());

        fail.store(false, Ordering::SeqCst);
        let directory = cache.get_all().await.unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_station_is_not_found() {
        let cache = StationDirectoryCache::new(CountingSource::new(sample()));

        let err = cache.get_by_name("NonexistentStation").await.unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::StationNotFound { ref name } if name == "NonexistentStation"
        ));
    }

    #[tokio::test]
    async fn get_by_name_returns_members() {
        let cache = StationDirectoryCache::new(CountingSource::new(sample()));

        let station = cache.get_by_name("Karlsplatz").await.unwrap();
        assert_eq!(station.stop_ids, vec![StopId(4111), StopId(4118)]);
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot() {
        let source = CountingSource::new(sample());
        let calls = source.calls.clone();
        let cache = StationDirectoryCache::new(source);

        let before = cache.get_all().await.unwrap();
        assert_eq!(cache.refresh().await.unwrap(), 2);
        let after = cache.get_all().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_snapshot() {
        let source = CountingSource::new(sample());
        let fail = source.fail.clone();
        let cache = StationDirectoryCache::new(source);

        let before = cache.get_all().await.unwrap();
        fail.store(true, Ordering::SeqCst);

        assert!(cache.refresh().await.is_err());
        let after = cache.get_all().await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }
}
