//! Summary statistics and chart series over a filtered match list

use super::filter::bastion_key;
use super::format::seconds_compact;
use super::outcome::{classify, resolve_viewpoint, OutcomeKind};
use super::types::{Match, MatchType};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total: usize,
    /// Completion wins of the viewpoint player
    pub completions: usize,
    pub wins: usize,
    /// `None` without a viewpoint
    pub losses: Option<usize>,
    pub draws: usize,
    /// Decisive forfeits (a winner was recorded)
    pub forfeits: usize,
    /// Forfeits by the viewpoint player
    pub user_forfeits: usize,
    /// Forfeits by the opponent
    pub opponent_forfeits: usize,
    pub decays: usize,
    pub avg_time_ms: Option<f64>,
    pub win_rate: Option<f64>,
}

/// Compute overview counts for `viewpoint`.
///
/// Wins, completions and the average time only count completion wins. Losses
/// are everything that is neither a draw nor a win. The win rate excludes
/// draws and is `None` when no match contains the viewpoint player.
pub fn compute_overview<'a, I>(matches: I, viewpoint: Option<&str>) -> Overview
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut overview = Overview::default();
    let mut total_time_ms: i64 = 0;
    let mut timed_wins: usize = 0;
    let mut resolved_any = false;

    for m in matches {
        overview.total += 1;
        if m.decayed {
            overview.decays += 1;
        }

        let outcome = classify(m, viewpoint);
        if outcome.forfeited && outcome.kind != OutcomeKind::Draw {
            overview.forfeits += 1;
        }

        match outcome.kind {
            OutcomeKind::Draw => overview.draws += 1,
            OutcomeKind::CompletionWin => {
                overview.completions += 1;
                overview.wins += 1;
                if let Some(time_ms) = m.result.time_ms {
                    total_time_ms += time_ms;
                    timed_wins += 1;
                }
            }
            OutcomeKind::ForfeitLoss => overview.user_forfeits += 1,
            OutcomeKind::ForfeitWin => overview.opponent_forfeits += 1,
            OutcomeKind::CompletionLoss | OutcomeKind::Unknown => {}
        }

        if viewpoint.is_some_and(|v| resolve_viewpoint(m, v).is_some()) {
            resolved_any = true;
        }
    }

    overview.avg_time_ms = (timed_wins > 0).then(|| total_time_ms as f64 / timed_wins as f64);

    if viewpoint.is_some() {
        overview.losses = Some(overview.total - overview.draws - overview.wins);
        let decided = overview.total - overview.draws;
        if resolved_any && decided > 0 {
            overview.win_rate = Some(overview.wins as f64 / decided as f64);
        }
    }

    overview
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub count: usize,
}

/// Count matches per key, most frequent first. `None` keys are dropped;
/// equal counts keep first-seen order.
pub fn breakdown_by_key<'a, I, F>(matches: I, key_fn: F) -> Vec<BreakdownEntry>
where
    I: IntoIterator<Item = &'a Match>,
    F: Fn(&Match) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<BreakdownEntry> = Vec::new();

    for key in matches.into_iter().filter_map(|m| key_fn(m)) {
        match index.get(&key) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(key.clone(), entries.len());
                entries.push(BreakdownEntry { name: key, count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order on ties
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Overworld structure of a match, for [`breakdown_by_key`]
pub fn overworld_key(m: &Match) -> Option<String> {
    m.seed.as_ref()?.overworld.clone().filter(|o| !o.is_empty())
}

/// Bastion category of a match, for [`breakdown_by_key`]
pub fn bastion_category(m: &Match) -> Option<String> {
    bastion_key(m.seed.as_ref()?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub date_sec: i64,
    /// `None` for forfeited matches so chart lines break there
    pub time_ms: Option<i64>,
    pub match_type: MatchType,
}

/// Completion time per match, oldest first
pub fn time_series<'a, I>(matches: I) -> Vec<TimePoint>
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut points: Vec<TimePoint> = matches
        .into_iter()
        .map(|m| TimePoint {
            date_sec: m.date,
            time_ms: if m.forfeited { None } else { m.result.time_ms },
            match_type: m.match_type,
        })
        .collect();
    points.sort_by_key(|p| p.date_sec);
    points
}

/// Completion times of the viewpoint's completion wins, in input order
pub fn completion_times<'a, I>(matches: I, viewpoint: Option<&str>) -> Vec<i64>
where
    I: IntoIterator<Item = &'a Match>,
{
    matches
        .into_iter()
        .filter(|m| classify(m, viewpoint).kind == OutcomeKind::CompletionWin)
        .filter_map(|m| m.result.time_ms)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    pub start_sec: u64,
    pub end_sec: u64,
    pub label: String,
    pub count: usize,
}

const TARGET_BUCKETS: u64 = 10;
const BUCKET_STEP_SECS: u64 = 10;

/// Bucket durations for a distribution chart.
///
/// Bucket width targets ten buckets over the observed range, rounded up to a
/// multiple of ten seconds (at least ten). Only non-empty buckets are returned,
/// in ascending order.
pub fn histogram(times_ms: &[i64]) -> Vec<HistogramBucket> {
    let seconds: Vec<f64> = times_ms.iter().map(|t| (*t).max(0) as f64 / 1000.0).collect();
    let (Some(min), Some(max)) = (
        seconds.iter().copied().reduce(f64::min),
        seconds.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    let raw_width = ((max - min) / TARGET_BUCKETS as f64).ceil() as u64;
    let width = raw_width.div_ceil(BUCKET_STEP_SECS).max(1) * BUCKET_STEP_SECS;

    let mut counts: HashMap<u64, usize> = HashMap::new();
    for s in &seconds {
        let start = (*s / width as f64).floor() as u64 * width;
        *counts.entry(start).or_insert(0) += 1;
    }

    let mut buckets: Vec<HistogramBucket> = counts
        .into_iter()
        .map(|(start, count)| HistogramBucket {
            start_sec: start,
            end_sec: start + width,
            label: format!("{}–{}", seconds_compact(start as f64), seconds_compact((start + width) as f64)),
            count,
        })
        .collect();
    buckets.sort_by_key(|b| b.start_sec);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::{MatchResult, MatchSeed, UserProfile};

    fn create_test_match(date: i64, forfeited: bool, winner: Option<&str>, time_ms: Option<i64>) -> Match {
        Match {
            id: format!("m{}", date),
            match_type: MatchType::Ranked,
            date,
            players: vec![
                UserProfile { uuid: "P1".to_string(), nickname: "PlayerOne".to_string(), ..Default::default() },
                UserProfile { uuid: "P2".to_string(), nickname: "PlayerTwo".to_string(), ..Default::default() },
            ],
            result: MatchResult {
                winner: winner.map(str::to_string),
                time_ms,
            },
            forfeited,
            ..Default::default()
        }
    }

    #[test]
    fn test_overview_win_and_draw() {
        let matches = vec![
            create_test_match(1000, false, Some("P1"), Some(120_000)),
            create_test_match(2000, true, None, None),
        ];

        let overview = compute_overview(&matches, Some("P1"));
        assert_eq!(overview.total, 2);
        assert_eq!(overview.draws, 1);
        assert_eq!(overview.wins, 1);
        assert_eq!(overview.losses, Some(0));
        assert_eq!(overview.win_rate, Some(1.0));
        assert_eq!(overview.avg_time_ms, Some(120_000.0));
        assert_eq!(overview.forfeits, 0);
    }

    #[test]
    fn test_overview_forfeit_split() {
        let mut decayed = create_test_match(4000, false, Some("P2"), Some(500_000));
        decayed.decayed = true;
        let matches = vec![
            create_test_match(1000, true, Some("P1"), None),
            create_test_match(2000, true, Some("P2"), None),
            create_test_match(3000, true, Some("P2"), None),
            decayed,
        ];

        let overview = compute_overview(&matches, Some("playerone"));
        assert_eq!(overview.forfeits, 3);
        assert_eq!(overview.opponent_forfeits, 1);
        assert_eq!(overview.user_forfeits, 2);
        assert_eq!(overview.decays, 1);
        assert_eq!(overview.wins, 0);
        assert_eq!(overview.losses, Some(4));
        assert_eq!(overview.win_rate, Some(0.0));
        assert_eq!(overview.avg_time_ms, None);
    }

    #[test]
    fn test_overview_without_viewpoint() {
        let matches = vec![create_test_match(1000, false, Some("P1"), Some(120_000))];
        let overview = compute_overview(&matches, None);
        assert_eq!(overview.losses, None);
        assert_eq!(overview.win_rate, None);
        assert_eq!(overview.wins, 0);

        let overview = compute_overview(&matches, Some("stranger"));
        assert_eq!(overview.losses, Some(1));
        assert_eq!(overview.win_rate, None);
    }

    #[test]
    fn test_overview_unfinished_match_counts_against_rate() {
        let matches = vec![create_test_match(1000, false, None, None)];

        let overview = compute_overview(&matches, Some("P1"));
        assert_eq!(overview.total, 1);
        assert_eq!(overview.draws, 0);
        assert_eq!(overview.wins, 0);
        assert_eq!(overview.losses, Some(1));
        assert_eq!(overview.win_rate, Some(0.0));
    }

    #[test]
    fn test_overview_all_draws() {
        let matches = vec![create_test_match(1000, true, None, None)];
        let overview = compute_overview(&matches, Some("P1"));
        assert_eq!(overview.win_rate, None);
        assert_eq!(overview.losses, Some(0));
        assert_eq!(compute_overview(&Vec::<Match>::new(), Some("P1")).total, 0);
    }

    #[test]
    fn test_breakdown_sorted_with_stable_ties() {
        let mut matches = Vec::new();
        for (i, overworld) in ["SHIPWRECK", "VILLAGE", "VILLAGE", "RUINED_PORTAL"].iter().enumerate() {
            let mut m = create_test_match(i as i64, false, None, None);
            m.seed = Some(MatchSeed { overworld: Some(overworld.to_string()), ..Default::default() });
            matches.push(m);
        }
        matches.push(create_test_match(99, false, None, None));

        let breakdown = breakdown_by_key(&matches, overworld_key);
        let names: Vec<&str> = breakdown.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["VILLAGE", "SHIPWRECK", "RUINED_PORTAL"]);
        assert_eq!(breakdown.iter().map(|e| e.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_bastion_breakdown_uses_fallback() {
        let mut legacy = create_test_match(1, false, None, None);
        legacy.seed = Some(MatchSeed { nether: Some("BRIDGE".to_string()), ..Default::default() });
        let mut parsed = create_test_match(2, false, None, None);
        parsed.seed = Some(MatchSeed { variations: vec!["bastion:triple:1".to_string()], ..Default::default() });

        let breakdown = breakdown_by_key(&[legacy, parsed], bastion_category);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].name, "BRIDGE");
        assert_eq!(breakdown[1].name, "triple");
    }

    #[test]
    fn test_time_series_breaks_on_forfeit() {
        let matches = vec![
            create_test_match(3000, false, Some("P1"), Some(500_000)),
            create_test_match(1000, true, Some("P2"), Some(0)),
            create_test_match(2000, false, Some("P2"), Some(400_000)),
        ];

        let series = time_series(&matches);
        let dates: Vec<i64> = series.iter().map(|p| p.date_sec).collect();
        assert_eq!(dates, vec![1000, 2000, 3000]);
        assert_eq!(series[0].time_ms, None);
        assert_eq!(series[1].time_ms, Some(400_000));
    }

    #[test]
    fn test_completion_times_only_wins() {
        let matches = vec![
            create_test_match(1, false, Some("P1"), Some(500_000)),
            create_test_match(2, false, Some("P2"), Some(400_000)),
            create_test_match(3, true, Some("P1"), Some(300_000)),
        ];
        assert_eq!(completion_times(&matches, Some("P1")), vec![500_000]);
    }

    #[test]
    fn test_histogram_buckets() {
        // 9:00 .. 14:00 → range 300s → 30s buckets
        let times = [540_000, 545_000, 600_000, 840_000];
        let buckets = histogram(&times);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].start_sec, 540);
        assert_eq!(buckets[0].end_sec, 570);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].label, "9m–9m30s");
        assert_eq!(buckets[2].start_sec, 840);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), times.len());
    }

    #[test]
    fn test_histogram_minimum_width() {
        assert!(histogram(&[]).is_empty());
        let buckets = histogram(&[61_000, 61_000]);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].start_sec, 60);
        assert_eq!(buckets[0].end_sec, 70);
    }
}
