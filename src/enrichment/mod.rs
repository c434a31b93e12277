//! Enrichment - detail records for the timeline phases
//!
//! The only I/O in the crate. Match lists arrive without timeline events; the
//! coordinator batch-fetches detail records through a [`DetailFetcher`] and
//! keeps them in a [`DetailCache`] shared across calls.
//!
//! ## Module Organization
//!
//! - `fetcher` - fetcher trait and error type
//! - `cache` - freshness-windowed detail cache with injectable clock
//! - `coordinator` - worker pool over a shared id queue
//! - `client` - HTTP implementation against the ranked API

pub mod cache;
pub mod client;
pub mod coordinator;
pub mod fetcher;

pub use cache::{CacheEntry, DetailCache};
pub use client::RankedApiClient;
pub use coordinator::{CoordinatorError, DetailCoordinator, FetchOutcome};
pub use fetcher::{DetailFetcher, FetchError};
