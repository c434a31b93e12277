//! Report Binary - filtered match statistics for one player
//!
//! Loads a player's matches, applies filters, and prints overview counts,
//! chart series and (optionally) per-phase timeline stats as JSON.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin report -- <identifier> [options]
//! ```
//!
//! ## Options
//!
//! - `--matches <file.json>` - read matches from a file instead of the API
//! - `--type <n>` - keep only this match type (repeatable; 1 casual, 2 ranked, 3 private, 4 event)
//! - `--count <n>` - only report the first n filtered matches (default: 100)
//! - `--hide-forfeits`, `--hide-decayed`, `--beginner-only`
//! - `--phases` - fetch match details and add timeline phase stats
//!
//! ## Environment Variables
//!
//! - MCSR_API_BASE - API base URL (default: https://api.mcsrranked.com)
//! - MCSR_API_KEY - Optional API key
//! - DETAIL_CACHE_TTL_SECS - Detail cache freshness window (default: 300)
//! - DETAIL_FETCH_CONCURRENCY - Parallel detail requests (default: 5)
//! - RUST_LOG - Logging level (optional, default: info)

use mcsrflow::analytics::overview::{bastion_category, completion_times, overworld_key};
use mcsrflow::analytics::{
    apply, breakdown_by_key, compute_overview, histogram, load_matches_json, segment_phases, time_series,
    BreakdownEntry, FilterSpec, HistogramBucket, Match, MatchType, Overview, Phase, PhaseBreakdown, TimePoint,
};
use mcsrflow::analytics::format;
use mcsrflow::config::EngineConfig;
use mcsrflow::enrichment::{DetailCache, DetailCoordinator, RankedApiClient};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_COUNT: usize = 100;

#[derive(Debug, Error, PartialEq)]
enum ReportError {
    #[error("usage: report <identifier> [--matches <file>] [--type <n>]... [--count <n>] [--phases]")]
    MissingIdentifier,
    #[error("{0} expects a value")]
    MissingValue(String),
    #[error("invalid value {value:?} for {flag}")]
    InvalidValue { flag: String, value: String },
    #[error("unknown option {0}")]
    UnknownFlag(String),
}

#[derive(Debug, Default, PartialEq)]
struct ReportArgs {
    identifier: String,
    matches_path: Option<PathBuf>,
    types: BTreeSet<MatchType>,
    count: Option<usize>,
    hide_forfeits: bool,
    hide_decayed: bool,
    beginner_only: bool,
    phases: bool,
}

impl ReportArgs {
    fn parse(args: &[String]) -> Result<Self, ReportError> {
        let mut parsed = ReportArgs::default();
        let mut identifier = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| iter.next().cloned().ok_or_else(|| ReportError::MissingValue(flag.to_string()));
            match arg.as_str() {
                "--matches" => parsed.matches_path = Some(value(arg.as_str())?.into()),
                "--type" => {
                    let raw = value(arg.as_str())?;
                    let code: u32 = raw.parse().map_err(|_| ReportError::InvalidValue {
                        flag: arg.clone(),
                        value: raw.clone(),
                    })?;
                    parsed.types.insert(MatchType::from(code));
                }
                "--count" => {
                    let raw = value(arg.as_str())?;
                    let count = raw.parse().map_err(|_| ReportError::InvalidValue {
                        flag: arg.clone(),
                        value: raw.clone(),
                    })?;
                    parsed.count = Some(count);
                }
                "--hide-forfeits" => parsed.hide_forfeits = true,
                "--hide-decayed" => parsed.hide_decayed = true,
                "--beginner-only" => parsed.beginner_only = true,
                "--phases" => parsed.phases = true,
                flag if flag.starts_with("--") => return Err(ReportError::UnknownFlag(flag.to_string())),
                positional => {
                    identifier.get_or_insert_with(|| positional.to_string());
                }
            }
        }

        parsed.identifier = identifier.ok_or(ReportError::MissingIdentifier)?;
        Ok(parsed)
    }

    fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            types: Some(self.types.clone()),
            hide_forfeits: self.hide_forfeits,
            hide_decayed: self.hide_decayed,
            beginner_only: self.beginner_only,
            ..Default::default()
        }
        .normalized()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhaseSummary {
    phase: &'static str,
    label: &'static str,
    segments: usize,
    average_ms: Option<f64>,
    average: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhaseReport {
    summary: Vec<PhaseSummary>,
    series: PhaseBreakdown,
    missing_details: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    identifier: String,
    loaded: usize,
    shown: usize,
    overview: Overview,
    average_time: String,
    series: Vec<TimePoint>,
    by_overworld: Vec<BreakdownEntry>,
    by_bastion: Vec<BreakdownEntry>,
    time_distribution: Vec<HistogramBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phases: Option<PhaseReport>,
}

fn summarize_phases(breakdown: &PhaseBreakdown) -> Vec<PhaseSummary> {
    Phase::all()
        .into_iter()
        .map(|phase| {
            let series = breakdown.get(phase);
            let average_ms = series.average_ms();
            PhaseSummary {
                phase: phase.as_str(),
                label: phase.label(),
                segments: series.len(),
                average_ms,
                average: average_ms.map(format::duration_ms).unwrap_or_else(|| "—".to_string()),
            }
        })
        .collect()
}

async fn load_matches(args: &ReportArgs, client: &RankedApiClient) -> Result<Vec<Match>, Box<dyn std::error::Error>> {
    match &args.matches_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let matches = load_matches_json(&json)?;
            log::info!("Loaded {} matches from {}", matches.len(), path.display());
            Ok(matches)
        }
        None => Ok(client.fetch_user_matches(&args.identifier).await?),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = EngineConfig::from_env();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .target(env_logger::Target::Stderr)
        .init();

    let cli: Vec<String> = std::env::args().skip(1).collect();
    let args = ReportArgs::parse(&cli)?;

    log::info!("🚀 Building report for {}", args.identifier);
    log::info!("   API base: {}", config.api_base);
    log::info!("   Detail cache TTL: {}s", config.cache_ttl_secs);
    log::info!("   Detail concurrency: {}", config.fetch_concurrency);

    let client = Arc::new(RankedApiClient::new(&config)?);
    let matches = load_matches(&args, &client).await?;

    let filtered = apply(&matches, &args.filter_spec());
    let shown: Vec<&Match> = filtered.into_iter().take(args.count.unwrap_or(DEFAULT_COUNT)).collect();
    log::info!("{} of {} matches after filters", shown.len(), matches.len());

    let viewpoint = Some(args.identifier.as_str());
    let overview = compute_overview(shown.iter().copied(), viewpoint);

    let phases = if args.phases {
        let cache = Arc::new(DetailCache::new(config.cache_ttl()));
        let coordinator = DetailCoordinator::new(client.clone(), cache);
        let ids: Vec<String> = shown.iter().map(|m| m.id.clone()).collect();
        let outcome = coordinator.fetch_details(ids, config.fetch_concurrency).await?;

        let mut missing_details: Vec<String> = outcome.failures.keys().cloned().collect();
        missing_details.sort();
        for (id, err) in &outcome.failures {
            log::warn!("No detail for match {}: {}", id, err);
        }

        let series = segment_phases(shown.iter().copied(), &outcome.details, &args.identifier);
        Some(PhaseReport {
            summary: summarize_phases(&series),
            series,
            missing_details,
        })
    } else {
        None
    };

    let report = Report {
        identifier: args.identifier.clone(),
        loaded: matches.len(),
        shown: shown.len(),
        average_time: overview.avg_time_ms.map(format::duration_ms).unwrap_or_else(|| "—".to_string()),
        overview,
        series: time_series(shown.iter().copied()),
        by_overworld: breakdown_by_key(shown.iter().copied(), overworld_key),
        by_bastion: breakdown_by_key(shown.iter().copied(), bastion_category),
        time_distribution: histogram(&completion_times(shown.iter().copied(), viewpoint)),
        phases,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
