//! Run phase segmentation from per-player timeline events
//!
//! ```text
//! start(0) → enter nether → find bastion → find fortress → blind travel
//!          → follow ender eye → enter end → dragon death
//! ```
//!
//! Each adjacent pair of milestones bounds one phase. A phase is recorded for
//! a match only when both milestones were reached and they are in order.

use super::outcome::resolve_viewpoint;
use super::types::{Match, MatchType, TimelineEvent};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Overworld,
    TerrainToBastion,
    Bastion,
    Fortress,
    Blind,
    StrongholdNav,
    EndFight,
}

/// Milestones in run order. Each entry lists the event types accepted for
/// it; the earliest matching event wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Start,
    EnterNether,
    FindBastion,
    FindFortress,
    BlindTravel,
    FollowEnderEye,
    EnterEnd,
    DragonDeath,
}

impl Milestone {
    pub fn event_types(&self) -> &'static [&'static str] {
        match self {
            Milestone::Start => &[],
            Milestone::EnterNether => &["story.enter_the_nether"],
            Milestone::FindBastion => &["nether.find_bastion"],
            Milestone::FindFortress => &["nether.find_fortress"],
            Milestone::BlindTravel => &["projectelo.timeline.blind_travel"],
            Milestone::FollowEnderEye => &["story.follow_ender_eye"],
            Milestone::EnterEnd => &["story.enter_the_end", "end.root"],
            Milestone::DragonDeath => &["projectelo.timeline.dragon_death"],
        }
    }

    /// Elapsed time the milestone was first reached, if at all
    pub fn reached_at(&self, events: &[&TimelineEvent]) -> Option<i64> {
        if *self == Milestone::Start {
            return Some(0);
        }
        let accepted = self.event_types();
        events
            .iter()
            .filter(|e| accepted.contains(&e.event_type.as_str()))
            .map(|e| e.time_ms)
            .min()
    }
}

impl Phase {
    pub fn all() -> [Phase; 7] {
        [
            Phase::Overworld,
            Phase::TerrainToBastion,
            Phase::Bastion,
            Phase::Fortress,
            Phase::Blind,
            Phase::StrongholdNav,
            Phase::EndFight,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Overworld => "overworld",
            Phase::TerrainToBastion => "terrainToBastion",
            Phase::Bastion => "bastion",
            Phase::Fortress => "fortress",
            Phase::Blind => "blind",
            Phase::StrongholdNav => "strongholdNav",
            Phase::EndFight => "endFight",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Overworld => "Overworld",
            Phase::TerrainToBastion => "Terrain to Bastion",
            Phase::Bastion => "Bastion",
            Phase::Fortress => "Fortress",
            Phase::Blind => "Blind",
            Phase::StrongholdNav => "Stronghold Nav",
            Phase::EndFight => "End Fight",
        }
    }

    /// Start and end milestone
    pub fn bounds(&self) -> (Milestone, Milestone) {
        match self {
            Phase::Overworld => (Milestone::Start, Milestone::EnterNether),
            Phase::TerrainToBastion => (Milestone::EnterNether, Milestone::FindBastion),
            Phase::Bastion => (Milestone::FindBastion, Milestone::FindFortress),
            Phase::Fortress => (Milestone::FindFortress, Milestone::BlindTravel),
            Phase::Blind => (Milestone::BlindTravel, Milestone::FollowEnderEye),
            Phase::StrongholdNav => (Milestone::FollowEnderEye, Milestone::EnterEnd),
            Phase::EndFight => (Milestone::EnterEnd, Milestone::DragonDeath),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown phase {0:?}")]
pub struct UnknownPhase(pub String);

impl FromStr for Phase {
    type Err = UnknownPhase;

    /// Parse the camelCase key produced by [`Phase::as_str`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::all()
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSample {
    pub date_sec: i64,
    pub duration_ms: i64,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSeries {
    /// Durations in match processing order
    pub durations_ms: Vec<i64>,
    /// Same durations with their match date, sorted by date
    pub samples: Vec<PhaseSample>,
}

impl PhaseSeries {
    fn push(&mut self, sample: PhaseSample) {
        self.durations_ms.push(sample.duration_ms);
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.durations_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations_ms.is_empty()
    }

    pub fn average_ms(&self) -> Option<f64> {
        if self.durations_ms.is_empty() {
            return None;
        }
        let total: i64 = self.durations_ms.iter().sum();
        Some(total as f64 / self.durations_ms.len() as f64)
    }
}

/// All seven phase series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseBreakdown {
    pub overworld: PhaseSeries,
    pub terrain_to_bastion: PhaseSeries,
    pub bastion: PhaseSeries,
    pub fortress: PhaseSeries,
    pub blind: PhaseSeries,
    pub stronghold_nav: PhaseSeries,
    pub end_fight: PhaseSeries,
}

impl PhaseBreakdown {
    pub fn get(&self, phase: Phase) -> &PhaseSeries {
        match phase {
            Phase::Overworld => &self.overworld,
            Phase::TerrainToBastion => &self.terrain_to_bastion,
            Phase::Bastion => &self.bastion,
            Phase::Fortress => &self.fortress,
            Phase::Blind => &self.blind,
            Phase::StrongholdNav => &self.stronghold_nav,
            Phase::EndFight => &self.end_fight,
        }
    }

    fn get_mut(&mut self, phase: Phase) -> &mut PhaseSeries {
        match phase {
            Phase::Overworld => &mut self.overworld,
            Phase::TerrainToBastion => &mut self.terrain_to_bastion,
            Phase::Bastion => &mut self.bastion,
            Phase::Fortress => &mut self.fortress,
            Phase::Blind => &mut self.blind,
            Phase::StrongholdNav => &mut self.stronghold_nav,
            Phase::EndFight => &mut self.end_fight,
        }
    }
}

/// Phase durations for one run, `None` where a phase was skipped
pub fn phase_durations(events: &[&TimelineEvent]) -> [(Phase, Option<i64>); 7] {
    Phase::all().map(|phase| {
        let (from, to) = phase.bounds();
        let duration = match (from.reached_at(events), to.reached_at(events)) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        };
        (phase, duration)
    })
}

/// Build phase series for the viewpoint player across `matches`.
///
/// `details` maps match id to a detail record carrying timeline events;
/// matches without a detail entry, or where the viewpoint cannot be
/// resolved, contribute nothing.
pub fn segment_phases<'a, I, D>(matches: I, details: &HashMap<String, D>, viewpoint: &str) -> PhaseBreakdown
where
    I: IntoIterator<Item = &'a Match>,
    D: AsRef<Match>,
{
    let mut breakdown = PhaseBreakdown::default();

    for m in matches {
        let Some(detail) = details.get(&m.id) else {
            continue;
        };
        let detail: &Match = detail.as_ref();
        let Some(player) = resolve_viewpoint(m, viewpoint).or_else(|| resolve_viewpoint(detail, viewpoint)) else {
            log::debug!("viewpoint {} not found in match {}", viewpoint, m.id);
            continue;
        };

        let events: Vec<&TimelineEvent> = detail.timelines.iter().filter(|e| e.player == player).collect();
        if events.is_empty() {
            continue;
        }

        for (phase, duration) in phase_durations(&events) {
            if let Some(duration_ms) = duration {
                breakdown.get_mut(phase).push(PhaseSample {
                    date_sec: m.date,
                    duration_ms,
                    match_type: m.match_type,
                });
            }
        }
    }

    for phase in Phase::all() {
        breakdown.get_mut(phase).samples.sort_by_key(|s| s.date_sec);
    }

    breakdown
}
