//! Match filtering
//!
//! Each configured dimension must hold (AND across dimensions). Within a
//! dimension any member of the configured set may match (OR), except the raw
//! variation dimension, where every selected tag must be present: those tags
//! are co-occurring seed facts, so selecting more narrows the result.
//!
//! An absent set and an empty set both mean "unconstrained".

use super::types::{Match, MatchSeed, MatchType};
use super::variations::{parse_variations, VariationCategories};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub types: Option<BTreeSet<MatchType>>,
    /// Inclusive lower bound, epoch seconds
    pub start_date_sec: Option<i64>,
    /// Inclusive upper bound, epoch seconds
    pub end_date_sec: Option<i64>,
    pub overworld: Option<BTreeSet<String>>,
    /// Matched against [`bastion_key`]
    pub bastion: Option<BTreeSet<String>>,
    /// Also matched against [`bastion_key`]; kept as its own dimension for saved filters
    pub bastion_subtypes: Option<BTreeSet<String>>,
    pub fortress_biomes: Option<BTreeSet<String>>,
    pub bastion_biomes: Option<BTreeSet<String>>,
    pub structures: Option<BTreeSet<String>>,
    /// Raw tags; all must be present
    pub variations: Option<BTreeSet<String>>,
    pub end_tower_heights: Option<BTreeSet<u32>>,
    pub hide_decayed: bool,
    pub hide_forfeits: bool,
    pub beginner_only: bool,
}

/// Treat an empty set as unset.
fn active<T>(set: &Option<BTreeSet<T>>) -> Option<&BTreeSet<T>> {
    set.as_ref().filter(|s| !s.is_empty())
}

fn normalize<T>(set: Option<BTreeSet<T>>) -> Option<BTreeSet<T>> {
    set.filter(|s| !s.is_empty())
}

impl FilterSpec {
    /// Copy with every empty set replaced by `None`
    pub fn normalized(self) -> Self {
        Self {
            types: normalize(self.types),
            overworld: normalize(self.overworld),
            bastion: normalize(self.bastion),
            bastion_subtypes: normalize(self.bastion_subtypes),
            fortress_biomes: normalize(self.fortress_biomes),
            bastion_biomes: normalize(self.bastion_biomes),
            structures: normalize(self.structures),
            variations: normalize(self.variations),
            end_tower_heights: normalize(self.end_tower_heights),
            ..self
        }
    }

    fn has_seed_constraints(&self) -> bool {
        active(&self.overworld).is_some()
            || active(&self.bastion).is_some()
            || active(&self.bastion_subtypes).is_some()
            || active(&self.fortress_biomes).is_some()
            || active(&self.bastion_biomes).is_some()
            || active(&self.structures).is_some()
            || active(&self.variations).is_some()
            || active(&self.end_tower_heights).is_some()
    }

    /// Per-match predicate
    pub fn matches(&self, m: &Match) -> bool {
        if let Some(types) = active(&self.types) {
            if !types.contains(&m.match_type) {
                return false;
            }
        }
        if self.start_date_sec.is_some_and(|start| m.date < start) {
            return false;
        }
        if self.end_date_sec.is_some_and(|end| m.date > end) {
            return false;
        }
        if self.hide_decayed && m.decayed {
            return false;
        }
        // Draws (forfeited, no winner) survive this toggle
        if self.hide_forfeits && m.is_decisive_forfeit() {
            return false;
        }
        if self.beginner_only && !m.beginner {
            return false;
        }

        if !self.has_seed_constraints() {
            return true;
        }
        match &m.seed {
            Some(seed) => self.seed_matches(seed),
            None => false,
        }
    }

    fn seed_matches(&self, seed: &MatchSeed) -> bool {
        let categories = parse_variations(&seed.variations);

        if let Some(wanted) = active(&self.overworld) {
            if !seed.overworld.as_ref().is_some_and(|o| wanted.contains(o)) {
                return false;
            }
        }
        let bastion = bastion_key_from(seed, &categories);
        for wanted in [active(&self.bastion), active(&self.bastion_subtypes)].into_iter().flatten() {
            if !bastion.is_some_and(|b| wanted.contains(b)) {
                return false;
            }
        }
        if let Some(wanted) = active(&self.fortress_biomes) {
            if wanted.is_disjoint(&categories.fortress_biomes) {
                return false;
            }
        }
        if let Some(wanted) = active(&self.bastion_biomes) {
            if wanted.is_disjoint(&categories.bastion_biomes) {
                return false;
            }
        }
        if let Some(wanted) = active(&self.structures) {
            if wanted.is_disjoint(&categories.structures) {
                return false;
            }
        }
        if let Some(required) = active(&self.variations) {
            if !required.iter().all(|tag| categories.raw.contains(tag)) {
                return false;
            }
        }
        if let Some(heights) = active(&self.end_tower_heights) {
            if !seed.end_towers.iter().any(|h| heights.contains(h)) {
                return false;
            }
        }
        true
    }
}

/// Filter matches, preserving input order
pub fn apply<'a, I>(matches: I, spec: &FilterSpec) -> Vec<&'a Match>
where
    I: IntoIterator<Item = &'a Match>,
{
    matches.into_iter().filter(|m| spec.matches(m)).collect()
}

/// Bastion category of a seed.
///
/// Fallback chain, first non-empty wins:
/// 1. explicit `bastion` key
/// 2. legacy `nether` key
/// 3. parsed `bastion:<subtype>` variation
///
/// Every place that groups or filters by bastion goes through this.
pub fn bastion_key(seed: &MatchSeed) -> Option<String> {
    let categories = parse_variations(&seed.variations);
    bastion_key_from(seed, &categories).map(str::to_string)
}

fn bastion_key_from<'a>(seed: &'a MatchSeed, categories: &'a VariationCategories) -> Option<&'a str> {
    seed.bastion
        .as_deref()
        .filter(|b| !b.is_empty())
        .or_else(|| seed.nether.as_deref().filter(|n| !n.is_empty()))
        .or(categories.bastion_subtype.as_deref())
}

/// Distinct seed values present in a match list, for building filter choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub overworlds: BTreeSet<String>,
    pub bastions: BTreeSet<String>,
    pub variations: BTreeSet<String>,
    pub end_tower_heights: BTreeSet<u32>,
}

pub fn facets<'a, I>(matches: I) -> Facets
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut facets = Facets::default();

    for seed in matches.into_iter().filter_map(|m| m.seed.as_ref()) {
        if let Some(overworld) = seed.overworld.as_ref().filter(|o| !o.is_empty()) {
            facets.overworlds.insert(overworld.clone());
        }
        if let Some(bastion) = bastion_key(seed) {
            facets.bastions.insert(bastion);
        }
        facets.variations.extend(seed.variations.iter().filter(|v| !v.is_empty()).cloned());
        facets.end_tower_heights.extend(seed.end_towers.iter().copied());
    }

    facets
}
