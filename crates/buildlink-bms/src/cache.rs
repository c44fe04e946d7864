//! Single-flight metadata cache.
//!
//! The full sensor list is fetched at most once at a time. Concurrent callers
//! join the in-flight fetch and receive the same outcome. A successful result
//! is kept until [`MetadataCache::invalidate`] is called; a failed fetch is
//! handed to every caller that joined it, after which the cache is empty again
//! and the next call starts a new fetch.
//!
//! The fetch itself runs on a spawned task. Dropping a waiting caller never
//! cancels it, and the state transition is made by that task so it happens
//! even when every waiter has gone away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use buildlink_core::{Error, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::model::MetadataRecord;

/// Provider of the full sensor list.
#[async_trait]
pub trait MetadataSource: Send + Sync + 'static {
    async fn fetch_metadata(&self) -> Result<Vec<MetadataRecord>>;
}

type Records = Arc<[MetadataRecord]>;
type Flight = Shared<BoxFuture<'static, Result<Records>>>;

enum CacheState {
    Empty,
    InFlight { id: u64, flight: Flight },
    Ready(Records),
}

/// Memoized, single-flight access to the sensor metadata list.
pub struct MetadataCache {
    source: Arc<dyn MetadataSource>,
    state: Arc<Mutex<CacheState>>,
    next_flight: AtomicU64,
}

impl MetadataCache {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(CacheState::Empty)),
            next_flight: AtomicU64::new(1),
        }
    }

    /// Return the cached list, fetching it if necessary.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn fetch(&self) -> Result<Records> {
        let flight = {
            let mut state = self.state.lock();
            match &*state {
                CacheState::Ready(records) => return Ok(records.clone()),
                CacheState::InFlight { flight, .. } => flight.clone(),
                CacheState::Empty => {
                    let id = self.next_flight.fetch_add(1, Ordering::Relaxed);
                    let flight = self.start_flight(id);
                    *state = CacheState::InFlight {
                        id,
                        flight: flight.clone(),
                    };
                    flight
                }
            }
        };
        flight.await
    }

    /// Drop a cached result so the next [`fetch`](Self::fetch) goes upstream.
    ///
    /// An in-flight fetch is left alone.
    pub fn invalidate(&self) {
        let mut state = self.state.lock();
        if matches!(*state, CacheState::Ready(_)) {
            info!("Metadata cache invalidated");
            *state = CacheState::Empty;
        }
    }

    /// Whether a successful result is cached.
    pub fn is_populated(&self) -> bool {
        matches!(*self.state.lock(), CacheState::Ready(_))
    }

    /// Whether a fetch is currently running.
    pub fn is_fetching(&self) -> bool {
        matches!(*self.state.lock(), CacheState::InFlight { .. })
    }

    fn start_flight(&self, id: u64) -> Flight {
        let source = self.source.clone();
        let state = self.state.clone();

        debug!(flight = id, "Starting metadata fetch");
        let task = tokio::spawn(async move {
            let outcome = source.fetch_metadata().await.map(Records::from);
            settle(&state, id, &outcome);
            outcome
        });

        async move {
            task.await
                .unwrap_or_else(|e| Err(Error::Transport(format!("Metadata fetch task failed: {}", e))))
        }
        .boxed()
        .shared()
    }
}

/// Move the cache out of flight `id`, unless something else already replaced it.
fn settle(state: &Mutex<CacheState>, id: u64, outcome: &Result<Records>) {
    let mut state = state.lock();
    if !matches!(&*state, CacheState::InFlight { id: current, .. } if *current == id) {
        return;
    }
    match outcome {
        Ok(records) => {
            info!(records = records.len(), "Metadata loaded");
            *state = CacheState::Ready(records.clone());
        }
        Err(e) => {
            warn!(error = %e, "Metadata fetch failed, next call will retry");
            *state = CacheState::Empty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Source returning a fixed list after a delay, counting calls.
    struct CountingSource {
        calls: AtomicUsize,
        delay: Duration,
        fail_first: usize,
    }

    impl CountingSource {
        fn new(delay: Duration, fail_first: usize) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
                fail_first,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataSource for CountingSource {
        async fn fetch_metadata(&self) -> Result<Vec<MetadataRecord>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if n < self.fail_first {
                return Err(Error::UpstreamStatus {
                    status: 503,
                    body: format!("attempt {}", n),
                });
            }
            Ok(vec![MetadataRecord {
                external_id: 1,
                source: "/B1_F1_R1/sensors/Temp".to_string(),
                unit: "C".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let source = CountingSource::new(Duration::from_millis(50), 0);
        let cache = Arc::new(MetadataCache::new(source.clone()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.fetch().await })
            })
            .collect();

        for handle in handles {
            let records = handle.await.unwrap().unwrap();
            assert_eq!(records.len(), 1);
        }
        assert_eq!(source.calls(), 1);
        assert!(cache.is_populated());

        // Served from cache afterwards
        cache.fetch().await.unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_shared_then_retried() {
        let source = CountingSource::new(Duration::from_millis(30), 1);
        let cache = Arc::new(MetadataCache::new(source.clone()));

        let (a, b) = tokio::join!(cache.fetch(), cache.fetch());
        for result in [a, b] {
            match result {
                Err(Error::UpstreamStatus { status, body }) => {
                    assert_eq!(status, 503);
                    assert_eq!(body, "attempt 0");
                }
                other => panic!("unexpected result: {:?}", other.map(|r| r.len())),
            }
        }
        assert_eq!(source.calls(), 1);
        assert!(!cache.is_populated());
        assert!(!cache.is_fetching());

        let records = cache.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_cancel_fetch() {
        let source = CountingSource::new(Duration::from_millis(50), 0);
        let cache = Arc::new(MetadataCache::new(source.clone()));

        let first = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.fetch().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        first.abort();

        let records = cache.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let source = CountingSource::new(Duration::from_millis(1), 0);
        let cache = MetadataCache::new(source.clone());

        cache.fetch().await.unwrap();
        cache.invalidate();
        assert!(!cache.is_populated());

        cache.fetch().await.unwrap();
        cache.fetch().await.unwrap();
        assert_eq!(source.calls(), 2);
    }
}
