//! Match outcome classification relative to a viewpoint player

use super::types::Match;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    Draw,
    ForfeitWin,
    ForfeitLoss,
    CompletionWin,
    CompletionLoss,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    /// Copied from the source match
    pub forfeited: bool,
}

/// Resolve a viewpoint identifier to a player id within one match.
///
/// A case-insensitive nickname match on any player takes priority over an
/// exact id match. A nickname equal to another player's id therefore resolves
/// to the nickname's owner.
pub fn resolve_viewpoint<'a>(m: &'a Match, identifier: &str) -> Option<&'a str> {
    let lowered = identifier.to_lowercase();

    m.players
        .iter()
        .find(|p| !p.nickname.is_empty() && p.nickname.to_lowercase() == lowered)
        .or_else(|| m.players.iter().find(|p| !p.uuid.is_empty() && p.uuid == identifier))
        .map(|p| p.uuid.as_str())
}

/// Classify a match for the given viewpoint.
///
/// Rules, in order:
/// 1. forfeited, no winner → draw (viewpoint ignored)
/// 2. forfeited, winner → forfeit win/loss, or unknown when unresolved
/// 3. finished, winner → completion win/loss, or unknown when unresolved
/// 4. no winner → unknown
pub fn classify(m: &Match, viewpoint: Option<&str>) -> Outcome {
    let player = viewpoint.and_then(|id| resolve_viewpoint(m, id));

    let kind = match (m.forfeited, m.winner()) {
        (true, None) => OutcomeKind::Draw,
        (_, None) => OutcomeKind::Unknown,
        (forfeited, Some(winner)) => match (player, forfeited) {
            (None, _) => OutcomeKind::Unknown,
            (Some(p), true) if p == winner => OutcomeKind::ForfeitWin,
            (Some(_), true) => OutcomeKind::ForfeitLoss,
            (Some(p), false) if p == winner => OutcomeKind::CompletionWin,
            (Some(_), false) => OutcomeKind::CompletionLoss,
        },
    };

    Outcome {
        kind,
        forfeited: m.forfeited,
    }
}
