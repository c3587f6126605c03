//! Wire types returned by the gallery endpoints.
//!
//! Field names follow the server's JSON (`fileName`, `description`, `tags`).
//! Everything here is raw, unescaped server text; escaping happens at render
//! time through [`crate::escape::Escaped`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A text label grouping images. Identity is the string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One image matching a tag, as listed by `rest/gallery/tag/{tag}`.
///
/// The server serializes its whole image record here; fields other than
/// `fileName` and `description` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailEntry {
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

/// Metadata for one original image, from `rest/gallery/image/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDetail {
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Opaque tag text. Arrays are joined with `","`.
    #[serde(default, deserialize_with = "tag_line")]
    pub tags: String,
}

/// Separator used when the server sends tags as a list. Matches how a
/// browser stringifies an array, so both clients show the same line.
const TAG_SEPARATOR: &str = ",";

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn tag_line<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTags {
        Text(String),
        List(Vec<String>),
    }

    Ok(match Option::<RawTags>::deserialize(deserializer)? {
        Some(RawTags::Text(text)) => text,
        Some(RawTags::List(list)) => list.join(TAG_SEPARATOR),
        None => String::new(),
    })
}
