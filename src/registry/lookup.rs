//! Tag resolution over the immutable registry.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::asset::AssetId;
use crate::error::{Result, SoundscapeError};
use crate::tags::{Tag, TagSet};

/// Mapping from tag to an ordered list of clips.
///
/// Lookups are exact matches on the normalized tag; there is no fuzzy or
/// prefix matching. The registry is never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: BTreeMap<Tag, Vec<AssetId>>,
}

impl AssetRegistry {
    /// Builds a registry from `(tag, clips)` pairs.
    ///
    /// Tags are normalized; pairs sharing a tag after normalization are merged.
    /// Duplicate clips under one tag are kept once, in first-seen order.
    /// Returns `REGISTRY_LOAD_FAILED` for a tag that is empty or contains whitespace.
    pub fn from_entries<I, S, A>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<A>)>,
        S: AsRef<str>,
        A: Into<AssetId>,
    {
        let mut map: BTreeMap<Tag, Vec<AssetId>> = BTreeMap::new();
        for (raw_tag, assets) in entries {
            let raw_tag = raw_tag.as_ref();
            let tag = Tag::new(raw_tag).ok_or_else(|| {
                SoundscapeError::registry_load_failed(format!("invalid tag '{}'", raw_tag))
            })?;
            let slot = map.entry(tag).or_default();
            for asset in assets {
                let asset = asset.into();
                if !slot.contains(&asset) {
                    slot.push(asset);
                }
            }
        }
        Ok(Self { entries: map })
    }

    /// Returns the clips registered for `tag`, or an empty slice if unknown.
    pub fn resolve(&self, tag: &str) -> &[AssetId] {
        Tag::new(tag)
            .and_then(|t| self.entries.get(&t))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolves every tag and returns the union of their clips.
    ///
    /// A clip reachable from several tags appears once.
    pub fn resolve_all(&self, tags: &TagSet) -> BTreeSet<AssetId> {
        let assets: BTreeSet<AssetId> = tags
            .iter()
            .flat_map(|tag| self.resolve(tag.as_str()).iter().cloned())
            .collect();
        debug!(
            tags = tags.len(),
            assets = assets.len(),
            "Resolved tags against registry"
        );
        assets
    }

    /// Returns the tags that have no registered clips, in sorted order.
    pub fn missing_tags(&self, tags: &TagSet) -> Vec<Tag> {
        tags.iter()
            .filter(|tag| self.resolve(tag.as_str()).is_empty())
            .cloned()
            .collect()
    }

    /// Iterates over registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.entries.keys()
    }

    /// Returns the number of registered tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no tags are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of distinct clips across all tags.
    pub fn asset_count(&self) -> usize {
        self.entries
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::parse_tag_list;

    fn registry() -> AssetRegistry {
        AssetRegistry::from_entries([
            ("water", vec!["sounds/water_0.mp3", "sounds/water_1.mp3"]),
            ("river", vec!["sounds/river_0.mp3", "sounds/water_1.mp3"]),
            ("forest", vec!["sounds/forest_0.mp3"]),
        ])
        .unwrap()
    }

    #[test]
    fn resolve_known_tag_keeps_order() {
        let reg = registry();
        let assets = reg.resolve("water");
        assert_eq!(
            assets,
            &[
                AssetId::from("sounds/water_0.mp3"),
                AssetId::from("sounds/water_1.mp3")
            ]
        );
    }

    #[test]
    fn resolve_unknown_tag_is_empty() {
        assert!(registry().resolve("volcano").is_empty());
    }

    #[test]
    fn resolve_is_case_normalized_but_exact() {
        let reg = registry();
        assert_eq!(reg.resolve("WATER").len(), 2);
        assert!(reg.resolve("wat").is_empty());
        assert!(reg.resolve("waters").is_empty());
    }

    #[test]
    fn resolve_all_is_deduplicated_union() {
        let reg = registry();
        let assets = reg.resolve_all(&parse_tag_list("water,river").unwrap());

        let expected: BTreeSet<AssetId> = [
            "sounds/river_0.mp3",
            "sounds/water_0.mp3",
            "sounds/water_1.mp3",
        ]
        .into_iter()
        .map(AssetId::from)
        .collect();
        assert_eq!(assets, expected);

        let reversed = reg.resolve_all(&parse_tag_list("river,water").unwrap());
        assert_eq!(assets, reversed);
    }

    #[test]
    fn missing_tags_lists_unregistered() {
        let reg = registry();
        let missing = reg.missing_tags(&parse_tag_list("water,volcano,anvil").unwrap());
        let names: Vec<&str> = missing.iter().map(Tag::as_str).collect();
        assert_eq!(names, vec!["anvil", "volcano"]);
    }

    #[test]
    fn from_entries_merges_normalized_tags() {
        let reg = AssetRegistry::from_entries([
            ("Rain", vec!["a.wav"]),
            ("rain", vec!["b.wav", "a.wav"]),
        ])
        .unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.resolve("rain").len(), 2);
        assert_eq!(reg.asset_count(), 2);
    }

    #[test]
    fn from_entries_rejects_bad_tag() {
        let err = AssetRegistry::from_entries([("two words", vec!["a.wav"])]).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::RegistryLoadFailed);
    }
}
