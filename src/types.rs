//! Shared types exchanged with the block-tree store and the fetch/upload
//! collaborators.
//!
//! Everything here is plain data with serde derives. Field names follow the
//! block attribute names the editor persists (`opensInNewTab`, `type`, ...),
//! so store snapshots and CLI fixtures round-trip without a mapping layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a source page (a post in the content source).
///
/// Only non-negative ids denote real pages; negative values can show up in
/// hand-edited block markup and are treated like a missing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub i64);

impl PageId {
    /// Whether this id can refer to a source page.
    pub fn is_page(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an attachment in the media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(pub u64);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle of a block in the block tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A navigation link inside a navigation block.
///
/// `id` is set when the link was created from a source page; manually
/// created links carry no id. Everything else is presentation data the
/// reconciler passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub opens_in_new_tab: bool,
}

impl NavigationItem {
    /// The id, if it refers to a source page.
    pub fn page_id(&self) -> Option<PageId> {
        self.id.filter(|id| id.is_page())
    }
}

/// A top-level page as delivered by the fetch collaborator, already
/// normalized (decoded title, resolved type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePage {
    pub id: PageId,
    pub url: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One image of a gallery block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Unset while the image only exists as a local blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MediaId>,
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A size variant listed directly on a media record (`sizes.<slug>.url`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeVariant {
    pub url: String,
}

/// A size variant listed under `media_details.sizes.<slug>.source_url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailSizeVariant {
    pub source_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(default)]
    pub sizes: BTreeMap<String, DetailSizeVariant>,
}

/// A media record handed over by the media library or the uploader.
///
/// Carries more than a gallery keeps; [`crate::gallery::pick_relevant_media`]
/// reduces it to a [`GalleryImage`] for the active image size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MediaId>,
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sizes: BTreeMap<String, SizeVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_details: Option<MediaDetails>,
}
