//! Tag and TagSet types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized keyword: lower-cased, trimmed, non-empty, no internal whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Normalizes `raw` into a tag.
    ///
    /// Returns `None` when the trimmed value is empty or still contains whitespace.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self(normalized))
    }

    /// Returns the tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Tag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Tag::new(&value).ok_or_else(|| format!("invalid tag: '{}'", value))
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

/// A deduplicated set of tags.
///
/// Iteration is lexicographic so anything derived from a set (resolution
/// order, logs, metadata) is reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the set contains the given tag text (after normalization).
    pub fn contains(&self, tag: &str) -> bool {
        Tag::new(tag).is_some_and(|t| self.0.contains(&t))
    }

    /// Iterates over tags in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Returns the tags as plain strings, in lexicographic order.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|t| t.to_string()).collect()
    }

    pub(crate) fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::collections::btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_strings().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_normalizes_case_and_whitespace() {
        let tag = Tag::new("  Water ").unwrap();
        assert_eq!(tag.as_str(), "water");
    }

    #[test]
    fn tag_rejects_empty_and_inner_whitespace() {
        assert!(Tag::new("").is_none());
        assert!(Tag::new("   ").is_none());
        assert!(Tag::new("rain forest").is_none());
    }

    #[test]
    fn tag_set_iterates_sorted() {
        let set: TagSet = ["river", "forest", "water"]
            .iter()
            .filter_map(|s| Tag::new(s))
            .collect();
        assert_eq!(set.to_strings(), vec!["forest", "river", "water"]);
        assert_eq!(set.to_string(), "forest,river,water");
    }

    #[test]
    fn tag_set_contains_normalizes_query() {
        let set: TagSet = Tag::new("water").into_iter().collect();
        assert!(set.contains("WATER"));
        assert!(!set.contains("river"));
    }

    #[test]
    fn tag_deserialize_rejects_invalid() {
        let ok: Tag = serde_json::from_str("\"Birds\"").unwrap();
        assert_eq!(ok.as_str(), "birds");
        assert!(serde_json::from_str::<Tag>("\"two words\"").is_err());
    }
}
