//! Caption and tag-string parsing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tag::{Tag, TagSet};
use crate::error::{Result, SoundscapeError};

/// Words that never become tags.
pub const STOPWORDS: [&str; 15] = [
    "a", "on", "the", "is", "it", "of", "and", "to", "in", "for", "with", "as", "that", "this",
    "by",
];

/// How punctuation attached to caption tokens is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationPolicy {
    /// Tokens keep their punctuation: `"water."` and `"water"` are distinct tags.
    #[default]
    Preserve,
    /// Leading and trailing ASCII punctuation is trimmed before filtering.
    Strip,
}

impl PunctuationPolicy {
    /// Returns the string representation of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            PunctuationPolicy::Preserve => "preserve",
            PunctuationPolicy::Strip => "strip",
        }
    }

    fn apply<'a>(&self, token: &'a str) -> &'a str {
        match self {
            PunctuationPolicy::Preserve => token,
            PunctuationPolicy::Strip => token.trim_matches(|c: char| c.is_ascii_punctuation()),
        }
    }
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Extracts tags from caption text, keeping punctuation attached to tokens.
///
/// Splits on whitespace, lower-cases, drops stopwords and deduplicates.
/// Empty text yields an empty set.
///
/// # Example
///
/// ```
/// use soundscape_engine::tags::extract_tags;
///
/// let tags = extract_tags("water flowing over the water by a river");
/// assert_eq!(tags.to_strings(), vec!["flowing", "over", "river", "water"]);
/// ```
pub fn extract_tags(text: &str) -> TagSet {
    extract_tags_with(text, PunctuationPolicy::Preserve)
}

/// Extracts tags from caption text using the given punctuation policy.
pub fn extract_tags_with(text: &str, policy: PunctuationPolicy) -> TagSet {
    let mut tags = TagSet::new();
    for token in text.split_whitespace() {
        let Some(tag) = Tag::new(policy.apply(token)) else {
            continue;
        };
        if is_stopword(tag.as_str()) {
            continue;
        }
        tags.insert(tag);
    }
    debug!(tags = %tags, policy = policy.as_str(), "Extracted tags from caption");
    tags
}

/// Parses a comma-separated tag string such as `"water,forest,birds"`.
///
/// Entries are trimmed and lower-cased; empty entries and entries containing
/// whitespace are skipped. Stopwords are not filtered here since the caller
/// supplied the tags directly.
///
/// Returns `EMPTY_TAG_SET` if nothing usable remains.
pub fn parse_tag_list(raw: &str) -> Result<TagSet> {
    let tags: TagSet = raw.split(',').filter_map(Tag::new).collect();
    if tags.is_empty() {
        return Err(SoundscapeError::empty_tag_set());
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn deduplicates_repeated_words() {
        let tags = extract_tags("water water river");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("water"));
        assert!(tags.contains("river"));
    }

    #[test]
    fn removes_every_stopword() {
        let caption = STOPWORDS.join(" ");
        assert!(extract_tags(&caption).is_empty());

        let tags = extract_tags("a bird on the branch of this tree by that lake");
        for stop in STOPWORDS {
            assert!(!tags.contains(stop), "stopword '{}' leaked", stop);
        }
        assert_eq!(tags.to_strings(), vec!["bird", "branch", "lake", "tree"]);
    }

    #[test]
    fn stopwords_match_after_lowercasing() {
        let tags = extract_tags("The Cathedral IS Old");
        assert_eq!(tags.to_strings(), vec!["cathedral", "old"]);
    }

    #[test]
    fn empty_text_yields_empty_set() {
        assert!(extract_tags("").is_empty());
        assert!(extract_tags("   \n\t ").is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let caption = "a stone bridge over a river with trees and birds";
        assert_eq!(extract_tags(caption), extract_tags(caption));
    }

    #[test]
    fn preserve_keeps_punctuated_tokens_distinct() {
        let tags = extract_tags("water, water");
        assert_eq!(tags.to_strings(), vec!["water", "water,"]);
    }

    #[test]
    fn strip_merges_punctuated_tokens() {
        let tags = extract_tags_with("Water, water. the... (forest)", PunctuationPolicy::Strip);
        assert_eq!(tags.to_strings(), vec!["forest", "water"]);
    }

    #[test]
    fn strip_drops_tokens_that_become_stopwords() {
        let tags = extract_tags_with("the, rain", PunctuationPolicy::Strip);
        assert_eq!(tags.to_strings(), vec!["rain"]);
    }

    #[test]
    fn parse_tag_list_splits_on_commas() {
        let tags = parse_tag_list(" Water,forest ,,unknownword,water").unwrap();
        assert_eq!(tags.to_strings(), vec!["forest", "unknownword", "water"]);
    }

    #[test]
    fn parse_tag_list_empty_is_error() {
        let err = parse_tag_list(" , ,").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyTagSet);
        assert_eq!(parse_tag_list("").unwrap_err().code, ErrorCode::EmptyTagSet);
    }
}
