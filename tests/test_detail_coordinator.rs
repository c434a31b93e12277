//! Integration tests for detail fetching: coordinator + cache + fetcher
//!
//! Key integration points tested:
//! - At most one network fetch per id inside the freshness window
//! - Refetch once the window has passed (mock clock)
//! - In-flight requests never exceed the concurrency limit
//! - A dropped call still leaves its fetched records in the cache

#[cfg(test)]
mod detail_coordinator_tests {
    use async_trait::async_trait;
    use mcsrflow::analytics::{Match, MatchDetail};
    use mcsrflow::enrichment::{DetailCache, DetailCoordinator, DetailFetcher, FetchError};
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Records call counts and the peak number of overlapping requests
    struct SlowFetcher {
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowFetcher {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DetailFetcher for SlowFetcher {
        async fn fetch_detail(&self, match_id: &str) -> Result<MatchDetail, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Match {
                id: match_id.to_string(),
                ..Default::default()
            })
        }

        fn source_name(&self) -> &'static str {
            "slow"
        }
    }

    fn create_mock_clock(start_ms: i64) -> (Arc<AtomicI64>, Box<dyn Fn() -> i64 + Send + Sync>) {
        let clock = Arc::new(AtomicI64::new(start_ms));
        let reader = Arc::clone(&clock);
        (clock, Box::new(move || reader.load(Ordering::SeqCst)))
    }

    #[tokio::test]
    async fn test_refetch_after_window_expires() {
        let fetcher = SlowFetcher::new(Duration::from_millis(1));
        let (clock, now_fn) = create_mock_clock(1_000_000);
        let cache = Arc::new(DetailCache::new_with_timestamp_fn(Duration::from_secs(300), now_fn));
        let coordinator = DetailCoordinator::new(fetcher.clone(), cache);

        coordinator.fetch_details(["m1", "m2"], 2).await.unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

        // Exactly at the window edge: still fresh
        clock.fetch_add(300_000, Ordering::SeqCst);
        let cached = coordinator.fetch_details(["m1", "m2"], 2).await.unwrap();
        assert_eq!(cached.cache_hits, 2);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

        clock.fetch_add(1, Ordering::SeqCst);
        let refreshed = coordinator.fetch_details(["m1"], 2).await.unwrap();
        assert_eq!(refreshed.network_fetches, 1);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_concurrency_limit_respected() {
        let fetcher = SlowFetcher::new(Duration::from_millis(20));
        let cache = Arc::new(DetailCache::new(Duration::from_secs(300)));
        let coordinator = DetailCoordinator::new(fetcher.clone(), cache);

        let ids: Vec<String> = (0..12).map(|i| format!("match_{}", i)).collect();
        let outcome = coordinator.fetch_details(ids, 3).await.unwrap();

        assert_eq!(outcome.details.len(), 12);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 12);
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 3);
        assert!(fetcher.peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_limit_larger_than_batch() {
        let fetcher = SlowFetcher::new(Duration::from_millis(5));
        let cache = Arc::new(DetailCache::new(Duration::from_secs(300)));
        let coordinator = DetailCoordinator::new(fetcher.clone(), cache);

        let outcome = coordinator.fetch_details(["a", "b"], 50).await.unwrap();

        assert_eq!(outcome.details.len(), 2);
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_dropped_call_still_populates_cache() {
        let fetcher = SlowFetcher::new(Duration::from_millis(50));
        let cache = Arc::new(DetailCache::new(Duration::from_secs(300)));
        let coordinator = Arc::new(DetailCoordinator::new(fetcher.clone(), Arc::clone(&cache)));

        let task = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.fetch_details(["late1", "late2"], 2).await })
        };

        // Let the workers start their requests, then abandon the caller
        tokio::time::sleep(Duration::from_millis(10)).await;
        task.abort();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get("late1").is_some());
        assert!(cache.get("late2").is_some());

        let again = coordinator.fetch_details(["late1", "late2"], 2).await.unwrap();
        assert_eq!(again.cache_hits, 2);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
