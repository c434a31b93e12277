//! Display helpers for durations, match types and seed keys

use super::types::MatchType;
use chrono::{DateTime, Datelike};

/// `HH:MM:SS:mmm`, negative input clamps to zero
pub fn duration_ms(ms: f64) -> String {
    let total = ms.max(0.0).floor() as u64;
    let hours = total / 3_600_000;
    let minutes = (total % 3_600_000) / 60_000;
    let seconds = (total % 60_000) / 1_000;
    let millis = total % 1_000;
    format!("{:02}:{:02}:{:02}:{:03}", hours, minutes, seconds, millis)
}

/// Drops zero leading components: `1:234`, `1:01:500`, `1:01:01:005`
pub fn seconds_short(seconds: f64) -> String {
    let total = (seconds * 1000.0).round().max(0.0) as u64;
    let hours = total / 3_600_000;
    let minutes = (total % 3_600_000) / 60_000;
    let secs = (total % 60_000) / 1_000;
    let millis = total % 1_000;

    if hours > 0 {
        format!("{}:{:02}:{:02}:{:03}", hours, minutes, secs, millis)
    } else if minutes > 0 {
        format!("{}:{:02}:{:03}", minutes, secs, millis)
    } else {
        format!("{}:{:03}", secs, millis)
    }
}

/// Axis labels: `45s`, `12m`, `7m30s`, `1h1m`
pub fn seconds_compact(seconds: f64) -> String {
    let s = seconds.round().max(0.0) as u64;
    let hours = s / 3600;
    let minutes = (s % 3600) / 60;
    let secs = s % 60;

    match (hours, minutes, secs) {
        (0, 0, _) => format!("{}s", s),
        (0, m, 0) => format!("{}m", m),
        (0, m, sec) => format!("{}m{}s", m, sec),
        (h, 0, _) => format!("{}h", h),
        (h, m, 0) => format!("{}h{}m", h, m),
        (h, m, sec) => format!("{}h{}m{}s", h, m, sec),
    }
}

pub fn type_label(kind: MatchType) -> &'static str {
    match kind {
        MatchType::Casual => "Casual",
        MatchType::Ranked => "Ranked",
        MatchType::PrivateRoom => "Private Room",
        MatchType::Event => "Event",
        MatchType::Other(_) => "Unknown",
    }
}

/// `Jun. 10th, 2024`
pub fn date_sec(epoch_sec: i64) -> String {
    let Some(date) = DateTime::from_timestamp(epoch_sec, 0) else {
        return "—".to_string();
    };
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}. {}{}, {}", date.format("%b"), day, suffix, date.year())
}

const STRUCTURE_LABELS: &[(&str, &str)] = &[
    ("RUINED_PORTAL", "Ruined Portal"),
    ("SHIPWRECK", "Shipwreck"),
    ("VILLAGE", "Village"),
    ("STRONGHOLD", "Stronghold"),
];

const BIOME_LABELS: &[(&str, &str)] = &[
    ("basalts", "Basalt Deltas"),
    ("CRIMSON_FOREST", "Crimson Forest"),
    ("warped_forest", "Warped Forest"),
    ("plains", "Plains"),
];

const VARIATION_LABELS: &[(&str, &str)] = &[
    ("bastion:good_gap:1", "Right Good Gap"),
    ("bastion:good_gap:2", "Left Good Gap"),
    ("bastion:single:1", "1 Single Chest"),
    ("bastion:single:2", "2 Single Chests"),
    ("bastion:single:3", "3 Single Chests"),
    ("bastion:triple:1", "1 Triple Chest"),
    ("bastion:triple:2", "2 Triple Chests"),
    ("bastion:triple:3", "3 Triple Chests"),
    ("bastion:small_single:1", "1 Small Single Chest"),
    ("bastion:small_single:2", "2 Small Single Chests"),
    ("chest:structure:carrot", "Chest (Carrot)"),
    ("chest:structure:diamond", "Diamond"),
    ("chest:structure:egap", "Enchanted Golden Apple"),
    ("chest:structure:looting_sword", "Looting Sword"),
    ("chest:structure:shield", "Chest (Shield)"),
];

/// Variations that imply a bastion filter selection
const VARIATION_BASTION_LINKS: &[(&str, &str)] = &[
    ("bastion:good_gap:1", "STABLES"),
    ("bastion:good_gap:2", "STABLES"),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, label)| *label)
}

/// Uppercase the first letter of every whitespace-separated word
fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

fn humanize_key(key: &str) -> String {
    capitalize_words(&key.replace('_', " ").to_lowercase())
}

pub fn humanize_structure(key: Option<&str>) -> String {
    match key.filter(|k| !k.is_empty()) {
        None => "—".to_string(),
        Some(k) => lookup(STRUCTURE_LABELS, k).map(str::to_string).unwrap_or_else(|| humanize_key(k)),
    }
}

pub fn humanize_biome(key: Option<&str>) -> String {
    match key.filter(|k| !k.is_empty()) {
        None => "Any".to_string(),
        Some(k) => lookup(BIOME_LABELS, k).map(str::to_string).unwrap_or_else(|| humanize_key(k)),
    }
}

pub fn humanize_variation(tag: &str) -> String {
    if let Some(label) = lookup(VARIATION_LABELS, tag) {
        return label.to_string();
    }
    capitalize_words(&tag.replace([':', '_'], " "))
}

/// Bastion key a variation selection implies, e.g. good gaps only spawn in stables
pub fn variation_auto_link(tag: &str) -> Option<&'static str> {
    lookup(VARIATION_BASTION_LINKS, tag)
}
