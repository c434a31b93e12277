//! Match analytics for ranked speedrun records
//!
//! - [`analytics`] - outcome classification, seed variation decoding,
//!   filtering, phase segmentation and summary series (pure)
//! - [`enrichment`] - cached, concurrency-limited detail fetching
//! - [`config`] - environment configuration

pub mod analytics;
pub mod config;
pub mod enrichment;
