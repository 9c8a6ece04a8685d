//! Keyword tags.
//!
//! Turns caption text or a delimited tag string into a [`TagSet`]:
//! - [`Tag`]: a normalized, whitespace-free keyword
//! - [`TagSet`]: deduplicated tags with lexicographic iteration order
//! - [`extract_tags`]: caption text -> tags, with stopwords removed
//! - [`parse_tag_list`]: `"water,forest"` -> tags

mod extractor;
mod tag;

pub use extractor::{
    extract_tags, extract_tags_with, parse_tag_list, PunctuationPolicy, STOPWORDS,
};
pub use tag::{Tag, TagSet};
