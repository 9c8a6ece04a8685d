//! Tag input accepted by the pipeline: a ready tag set or a delimited list.

use crate::error::{Result, SoundscapeError};
use crate::tags::{parse_tag_list, TagSet};

/// Tags supplied to a soundscape build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagInput {
    /// An already extracted tag set.
    Set(TagSet),
    /// A raw comma-separated tag string, e.g. `"water,forest,birds"`.
    Delimited(String),
}

impl TagInput {
    /// Resolves the input to a non-empty tag set.
    ///
    /// Returns `EMPTY_TAG_SET` if no tags remain.
    pub fn into_tag_set(self) -> Result<TagSet> {
        match self {
            TagInput::Set(tags) if tags.is_empty() => Err(SoundscapeError::empty_tag_set()),
            TagInput::Set(tags) => Ok(tags),
            TagInput::Delimited(raw) => parse_tag_list(&raw),
        }
    }
}

impl From<TagSet> for TagInput {
    fn from(tags: TagSet) -> Self {
        TagInput::Set(tags)
    }
}

impl From<&str> for TagInput {
    fn from(raw: &str) -> Self {
        TagInput::Delimited(raw.to_string())
    }
}

impl From<String> for TagInput {
    fn from(raw: String) -> Self {
        TagInput::Delimited(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::tags::extract_tags;

    #[test]
    fn delimited_is_split_on_commas() {
        let tags = TagInput::from("Water, forest,,water").into_tag_set().unwrap();
        assert_eq!(tags.to_strings(), vec!["forest", "water"]);
    }

    #[test]
    fn empty_inputs_are_empty_tag_set() {
        for input in [TagInput::from(" , ,"), TagInput::from(TagSet::new())] {
            assert_eq!(input.into_tag_set().unwrap_err().code, ErrorCode::EmptyTagSet);
        }
    }

    #[test]
    fn set_passes_through() {
        let tags = extract_tags("rain on the roof");
        assert_eq!(TagInput::from(tags.clone()).into_tag_set().unwrap(), tags);
    }
}
