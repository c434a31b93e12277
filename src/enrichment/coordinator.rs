//! Bounded-parallelism detail fetching
//!
//! ```text
//! ids ──► dedupe ──► VecDeque (shared queue)
//!                       │  each worker pops one id at a time
//!        ┌──────────────┼──────────────┐
//!     worker 0       worker 1   ...  worker N-1      (N = min(limit, ids))
//!        │ cache hit? return cached │ else fetch + cache
//!        └──────────────┬──────────────┘
//!                  join all workers
//!                       ↓
//!                  FetchOutcome
//! ```
//!
//! Workers are spawned tasks: if the caller drops the future, in-flight
//! fetches still complete and populate the cache.

use super::cache::DetailCache;
use super::fetcher::{DetailFetcher, FetchError};
use crate::analytics::types::MatchDetail;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("concurrency limit is 0 with {pending} ids queued")]
    ZeroConcurrency { pending: usize },
    #[error("fetch worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result of one `fetch_details` call
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Successfully resolved records, cached or fetched
    pub details: HashMap<String, Arc<MatchDetail>>,
    /// Ids whose fetch failed; absent from `details`
    pub failures: HashMap<String, FetchError>,
    pub cache_hits: usize,
    pub network_fetches: usize,
}

enum Lookup {
    Cached(Arc<MatchDetail>),
    Fetched(Arc<MatchDetail>),
    Failed(FetchError),
}

pub struct DetailCoordinator {
    fetcher: Arc<dyn DetailFetcher>,
    cache: Arc<DetailCache>,
}

impl DetailCoordinator {
    pub fn new(fetcher: Arc<dyn DetailFetcher>, cache: Arc<DetailCache>) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &Arc<DetailCache> {
        &self.cache
    }

    /// Fetch detail records for `ids` with at most `concurrency_limit`
    /// requests in flight.
    ///
    /// Each id is handed to exactly one worker. A failed id is reported in
    /// `failures` and does not stop the others; nothing is retried. Returns
    /// only once every worker has drained the queue.
    pub async fn fetch_details<I, S>(&self, ids: I, concurrency_limit: usize) -> Result<FetchOutcome, CoordinatorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let queue: VecDeque<String> = ids
            .into_iter()
            .map(Into::into)
            .filter(|id: &String| seen.insert(id.clone()))
            .collect();

        if queue.is_empty() {
            return Ok(FetchOutcome::default());
        }
        if concurrency_limit == 0 {
            return Err(CoordinatorError::ZeroConcurrency { pending: queue.len() });
        }

        let started = Instant::now();
        let requested = queue.len();
        let worker_count = concurrency_limit.min(requested);
        let queue = Arc::new(Mutex::new(queue));

        let handles: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                let queue = Arc::clone(&queue);
                let fetcher = Arc::clone(&self.fetcher);
                let cache = Arc::clone(&self.cache);
                tokio::spawn(run_worker(worker_id, queue, fetcher, cache))
            })
            .collect();

        let mut outcome = FetchOutcome::default();
        for handle in handles {
            for (id, lookup) in handle.await? {
                match lookup {
                    Lookup::Cached(detail) => {
                        outcome.cache_hits += 1;
                        outcome.details.insert(id, detail);
                    }
                    Lookup::Fetched(detail) => {
                        outcome.network_fetches += 1;
                        outcome.details.insert(id, detail);
                    }
                    Lookup::Failed(err) => {
                        outcome.network_fetches += 1;
                        outcome.failures.insert(id, err);
                    }
                }
            }
        }

        log::info!(
            "📦 Resolved {}/{} match details ({} cached, {} fetched, {} failed) in {:?} with {} workers",
            outcome.details.len(),
            requested,
            outcome.cache_hits,
            outcome.network_fetches - outcome.failures.len(),
            outcome.failures.len(),
            started.elapsed(),
            worker_count,
        );

        Ok(outcome)
    }
}

fn next_id(queue: &Mutex<VecDeque<String>>) -> Option<String> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).pop_front()
}

async fn run_worker(
    worker_id: usize,
    queue: Arc<Mutex<VecDeque<String>>>,
    fetcher: Arc<dyn DetailFetcher>,
    cache: Arc<DetailCache>,
) -> Vec<(String, Lookup)> {
    let mut done = Vec::new();

    while let Some(id) = next_id(&queue) {
        if let Some(detail) = cache.get(&id) {
            log::debug!("worker {}: cache hit for {}", worker_id, id);
            done.push((id, Lookup::Cached(detail)));
            continue;
        }

        match fetcher.fetch_detail(&id).await {
            Ok(detail) => {
                let detail = cache.insert(&id, detail);
                done.push((id, Lookup::Fetched(detail)));
            }
            Err(e) => {
                log::warn!("⚠️  worker {}: {} fetch failed for {}: {}", worker_id, fetcher.source_name(), id, e);
                done.push((id, Lookup::Failed(e)));
            }
        }
    }

    done
}
