//! Match records as returned by the ranked API
//!
//! Only the fields the analytics read are modelled. Every optional field
//! carries a serde default so sparse records (list endpoint vs. detail
//! endpoint) deserialize into the same shape.

use serde::{Deserialize, Deserializer, Serialize};

/// Match category. Wire format is the numeric API code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum MatchType {
    Casual,
    #[default]
    Ranked,
    PrivateRoom,
    Event,
    /// Codes the API may add later; kept so one new code never fails a whole page.
    Other(u32),
}

impl From<u32> for MatchType {
    fn from(code: u32) -> Self {
        match code {
            1 => MatchType::Casual,
            2 => MatchType::Ranked,
            3 => MatchType::PrivateRoom,
            4 => MatchType::Event,
            other => MatchType::Other(other),
        }
    }
}

impl From<MatchType> for u32 {
    fn from(kind: MatchType) -> Self {
        match kind {
            MatchType::Casual => 1,
            MatchType::Ranked => 2,
            MatchType::PrivateRoom => 3,
            MatchType::Event => 4,
            MatchType::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable player id
    pub uuid: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub role_type: Option<i32>,
    #[serde(default)]
    pub elo_rate: Option<i32>,
    #[serde(default)]
    pub elo_rank: Option<i32>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSeed {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub overworld: Option<String>,
    #[serde(default)]
    pub bastion: Option<String>,
    /// Legacy bastion key used by older records
    #[serde(default)]
    pub nether: Option<String>,
    #[serde(default)]
    pub end_towers: Vec<u32>,
    /// Raw variation tags, e.g. `biome:fortress:crimson_forest`
    #[serde(default)]
    pub variations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Winner's player id
    #[serde(rename = "uuid", default)]
    pub winner: Option<String>,
    /// Completion time in milliseconds
    #[serde(rename = "time", default)]
    pub time_ms: Option<i64>,
}

/// A single milestone reached by a player during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(rename = "uuid")]
    pub player: String,
    #[serde(rename = "type")]
    pub event_type: String,
    /// Elapsed milliseconds since run start
    #[serde(rename = "time")]
    pub time_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(rename = "uuid")]
    pub player: String,
    #[serde(rename = "time")]
    pub time_ms: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub match_type: MatchType,
    #[serde(default)]
    pub season: Option<u32>,
    /// Epoch seconds
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub players: Vec<UserProfile>,
    #[serde(default)]
    pub seed: Option<MatchSeed>,
    #[serde(default)]
    pub result: MatchResult,
    #[serde(default)]
    pub forfeited: bool,
    #[serde(default)]
    pub decayed: bool,
    #[serde(default)]
    pub beginner: bool,
    #[serde(default)]
    pub completions: Vec<Completion>,
    /// Only filled by the detail endpoint
    #[serde(default)]
    pub timelines: Vec<TimelineEvent>,
}

/// Detail records share the match shape; the detail endpoint fills `timelines`.
pub type MatchDetail = Match;

impl AsRef<Match> for Match {
    fn as_ref(&self) -> &Match {
        self
    }
}

impl Match {
    /// Parse a single match from a JSON object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn winner(&self) -> Option<&str> {
        self.result.winner.as_deref().filter(|w| !w.is_empty())
    }

    /// Forfeited with no winner: nobody finished and nobody won.
    pub fn is_draw(&self) -> bool {
        self.forfeited && self.winner().is_none()
    }

    /// Forfeited with a winner recorded.
    pub fn is_decisive_forfeit(&self) -> bool {
        self.forfeited && self.winner().is_some()
    }

    pub fn variations(&self) -> &[String] {
        self.seed.as_ref().map(|s| s.variations.as_slice()).unwrap_or(&[])
    }
}

/// Parse a match list. Accepts a bare array or an API envelope
/// (`{"data": [...]}` / `{"matches": [...]}`).
pub fn load_matches_json(json: &str) -> Result<Vec<Match>, serde_json::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MatchList {
        Bare(Vec<Match>),
        Data { data: Vec<Match> },
        Matches { matches: Vec<Match> },
    }

    Ok(match serde_json::from_str::<MatchList>(json)? {
        MatchList::Bare(matches) => matches,
        MatchList::Data { data } => data,
        MatchList::Matches { matches } => matches,
    })
}

/// Match ids are numeric on some endpoints and strings on others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detail_record() {
        let json = r#"{"id":1843302,"type":2,"season":6,"date":1718000000,
            "players":[{"uuid":"abc","nickname":"Feinberg","roleType":0,"eloRate":2100,"eloRank":3,"country":"us"}],
            "seed":{"id":"s1","overworld":"VILLAGE","bastion":"HOUSING","endTowers":[76,82],"variations":["biome:fortress:basalt_deltas"]},
            "result":{"uuid":"abc","time":612345},"forfeited":false,"decayed":false,"beginner":false,
            "timelines":[{"uuid":"abc","time":95000,"type":"story.enter_the_nether"}]}"#;

        let m = Match::from_json(json).unwrap();
        assert_eq!(m.id, "1843302");
        assert_eq!(m.match_type, MatchType::Ranked);
        assert_eq!(m.winner(), Some("abc"));
        assert_eq!(m.result.time_ms, Some(612345));
        assert_eq!(m.seed.as_ref().unwrap().end_towers, vec![76, 82]);
        assert_eq!(m.timelines[0].event_type, "story.enter_the_nether");
        assert_eq!(m.timelines[0].time_ms, 95000);
    }

    #[test]
    fn test_sparse_record_defaults() {
        let m = Match::from_json(r#"{"id":"x","type":9,"seed":null,"result":{"uuid":null,"time":0},"forfeited":true}"#)
            .unwrap();
        assert_eq!(m.match_type, MatchType::Other(9));
        assert!(m.seed.is_none());
        assert!(m.is_draw());
        assert!(!m.is_decisive_forfeit());
        assert!(m.variations().is_empty());
    }

    #[test]
    fn test_load_enveloped_list() {
        let bare = load_matches_json(r#"[{"id":"a"},{"id":2}]"#).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[1].id, "2");

        let wrapped = load_matches_json(r#"{"status":"success","data":[{"id":"a"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 1);

        assert!(load_matches_json(r#"{"invalid": "json"#).is_err());
    }

    #[test]
    fn test_match_type_codes() {
        assert_eq!(MatchType::from(1), MatchType::Casual);
        assert_eq!(u32::from(MatchType::PrivateRoom), 3);
        assert_eq!(serde_json::to_string(&MatchType::Event).unwrap(), "4");
    }
}
