//! Seed variation tag decoding
//!
//! Tags are colon-delimited facts about a generated seed:
//!
//! ```text
//! biome:<fortress|bastion|structure>:<biome_key>
//! bastion:<subtype>:<n>
//! end_spawn:buried:<height>
//! end_tower:<...>            (recognized, no category)
//! anything else              (kept in `raw` only)
//! ```

use serde::Serialize;
use std::collections::BTreeSet;

/// Categorized view of a seed's variation tags
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationCategories {
    /// Overworld structure biomes (`biome:structure:*`)
    pub structures: BTreeSet<String>,
    pub fortress_biomes: BTreeSet<String>,
    pub bastion_biomes: BTreeSet<String>,
    pub bastion_subtype: Option<String>,
    /// Buried end-spawn depth; fractional payloads are kept as-is
    pub end_spawn_buried: Option<f64>,
    /// Every input tag in input order
    pub raw: Vec<String>,
}

/// One decoded tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariationTag<'a> {
    FortressBiome(&'a str),
    BastionBiome(&'a str),
    StructureBiome(&'a str),
    BastionSubtype(&'a str),
    /// `None` when the payload is missing or not a finite number
    BuriedEndSpawn(Option<f64>),
    EndTower,
    Unrecognized,
}

impl<'a> VariationTag<'a> {
    pub fn parse(tag: &'a str) -> Self {
        let mut parts = tag.split(':');
        let head = parts.next().unwrap_or_default();
        let second = parts.next().filter(|p| !p.is_empty());
        let third = parts.next().filter(|p| !p.is_empty());

        match (head, second, third) {
            ("biome", Some("fortress"), Some(key)) => VariationTag::FortressBiome(key),
            ("biome", Some("bastion"), Some(key)) => VariationTag::BastionBiome(key),
            ("biome", Some("structure"), Some(key)) => VariationTag::StructureBiome(key),
            ("bastion", Some(subtype), _) => VariationTag::BastionSubtype(subtype),
            ("end_spawn", Some("buried"), payload) => {
                let height = payload.and_then(|p| p.trim().parse::<f64>().ok());
                VariationTag::BuriedEndSpawn(height.filter(|h| h.is_finite()))
            }
            ("end_tower", _, _) => VariationTag::EndTower,
            _ => VariationTag::Unrecognized,
        }
    }
}

/// Decode a seed's raw tags. Total: unknown or malformed tags only land in `raw`.
pub fn parse_variations<S: AsRef<str>>(tags: &[S]) -> VariationCategories {
    let mut categories = VariationCategories {
        raw: Vec::with_capacity(tags.len()),
        ..Default::default()
    };

    for tag in tags {
        let tag = tag.as_ref();
        categories.raw.push(tag.to_string());

        match VariationTag::parse(tag) {
            VariationTag::FortressBiome(key) => {
                categories.fortress_biomes.insert(key.to_string());
            }
            VariationTag::BastionBiome(key) => {
                categories.bastion_biomes.insert(key.to_string());
            }
            VariationTag::StructureBiome(key) => {
                categories.structures.insert(key.to_string());
            }
            VariationTag::BastionSubtype(subtype) => {
                categories.bastion_subtype = Some(subtype.to_string());
            }
            VariationTag::BuriedEndSpawn(Some(height)) => {
                categories.end_spawn_buried = Some(height);
            }
            VariationTag::BuriedEndSpawn(None) | VariationTag::EndTower | VariationTag::Unrecognized => {}
        }
    }

    categories
}
