//! Catalog API response types
//!
//! Data structures for deserializing Deezer-compatible search responses.

use serde::Deserialize;

/// Search response envelope
///
/// See: https://developers.deezer.com/api/search
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Result rows in API ranking order
    #[serde(default)]
    pub data: Vec<SearchRow>,
}

/// A single search result row
///
/// Only the fields the core consumes are modeled; unknown fields are
/// ignored during deserialization.
#[derive(Debug, Deserialize)]
pub struct SearchRow {
    /// Numeric track ID
    pub id: u64,

    /// Track title
    pub title: String,

    /// Preview asset URL (~30 seconds); may be absent or empty
    #[serde(default)]
    pub preview: String,

    /// Track artist
    pub artist: SearchArtist,
}

/// Artist sub-resource of a search row
#[derive(Debug, Deserialize)]
pub struct SearchArtist {
    /// Artist display name
    pub name: String,
}
