//! Merging a media selection into the gallery.
//!
//! When the user (re)selects images in the media library, the selection
//! replaces the image list. Captions need care: the user may have edited a
//! caption inside the gallery, and the media library may have a different,
//! possibly also edited, caption. The rule:
//!
//! - keep the gallery's caption for an image already in the gallery,
//! - unless the library caption changed since the previous selection, in
//!   which case the library caption wins.
//!
//! "Changed since the previous selection" is decided against a
//! [`CaptionSnapshot`] of `{id, caption}` pairs captured at that selection.
//! The snapshot is replaced wholesale on every selection.

use crate::types::{GalleryImage, MediaId, MediaRecord};
use serde::{Deserialize, Serialize};

/// Library caption of one image at the time of the last selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionEntry {
    pub id: Option<MediaId>,
    pub caption: String,
}

/// Library captions captured at the last selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptionSnapshot(Vec<CaptionEntry>);

impl CaptionSnapshot {
    pub fn new(entries: Vec<CaptionEntry>) -> Self {
        Self(entries)
    }

    /// Capture the library captions of a selection, in selection order.
    pub fn capture(selection: &[MediaRecord]) -> Self {
        Self(
            selection
                .iter()
                .map(|record| CaptionEntry {
                    id: record.id,
                    caption: record.caption.clone(),
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[CaptionEntry] {
        &self.0
    }

    /// First entry recorded for `id`.
    pub fn find(&self, id: MediaId) -> Option<&CaptionEntry> {
        self.0.iter().find(|entry| entry.id == Some(id))
    }

    /// Whether the library caption of `record` differs from the captured one.
    ///
    /// Records without an id, or not in the snapshot, count as unchanged.
    pub fn upstream_changed(&self, record: &MediaRecord) -> bool {
        record
            .id
            .and_then(|id| self.find(id))
            .is_some_and(|entry| entry.caption != record.caption)
    }
}

/// Resolve the caption a selected record gets in the merged list.
pub fn select_caption(
    record: &MediaRecord,
    current: &[GalleryImage],
    snapshot: Option<&CaptionSnapshot>,
) -> String {
    let current_caption = record
        .id
        .and_then(|id| current.iter().find(|image| image.id == Some(id)))
        .map_or(&record.caption, |image| &image.caption);

    match snapshot {
        Some(snapshot) if snapshot.upstream_changed(record) => record.caption.clone(),
        _ => current_caption.clone(),
    }
}

/// Reduce a media record to the fields a gallery keeps, using the url of the
/// `size_slug` variant when the record has one.
pub fn pick_relevant_media(record: &MediaRecord, size_slug: &str) -> GalleryImage {
    let sized_url = record
        .sizes
        .get(size_slug)
        .map(|size| size.url.clone())
        .or_else(|| {
            record
                .media_details
                .as_ref()
                .and_then(|details| details.sizes.get(size_slug))
                .map(|size| size.source_url.clone())
        })
        .filter(|url| !url.is_empty());

    GalleryImage {
        id: record.id,
        url: sized_url.unwrap_or_else(|| record.url.clone()),
        alt: record.alt.clone(),
        caption: record.caption.clone(),
        link: record.link.clone(),
    }
}

/// Merge a selection into the current images.
///
/// Returns the new image list, in selection order, and the snapshot to
/// keep for the next merge.
pub fn merge_selection(
    current: &[GalleryImage],
    selection: &[MediaRecord],
    snapshot: Option<&CaptionSnapshot>,
    size_slug: &str,
) -> (Vec<GalleryImage>, CaptionSnapshot) {
    let merged = selection
        .iter()
        .map(|record| GalleryImage {
            caption: select_caption(record, current, snapshot),
            ..pick_relevant_media(record, size_slug)
        })
        .collect();
    (merged, CaptionSnapshot::capture(selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{captions, image, image_ids, media};
    use crate::types::{DetailSizeVariant, MediaDetails, SizeVariant};

    fn snapshot(entries: &[(u64, &str)]) -> CaptionSnapshot {
        CaptionSnapshot::new(
            entries
                .iter()
                .map(|&(id, caption)| CaptionEntry {
                    id: Some(MediaId(id)),
                    caption: caption.into(),
                })
                .collect(),
        )
    }

    #[test]
    fn upstream_change_is_adopted() {
        let current = vec![image(5, "a")];
        let (merged, _) = merge_selection(&current, &[media(5, "b")], Some(&snapshot(&[(5, "a")])), "large");
        assert_eq!(captions(&merged), vec!["b"]);
    }

    #[test]
    fn local_edit_kept_when_upstream_unchanged() {
        // Library caption is still what was captured; the gallery caption
        // was edited locally.
        let current = vec![image(5, "a")];
        let (merged, _) = merge_selection(&current, &[media(5, "b")], Some(&snapshot(&[(5, "b")])), "large");
        assert_eq!(captions(&merged), vec!["a"]);
    }

    #[test]
    fn first_selection_keeps_current_caption() {
        let current = vec![image(5, "edited")];
        let (merged, _) = merge_selection(&current, &[media(5, "library")], None, "large");
        assert_eq!(captions(&merged), vec!["edited"]);
    }

    #[test]
    fn new_image_takes_library_caption() {
        let current = vec![image(5, "a")];
        let (merged, _) = merge_selection(&current, &[media(5, "x"), media(6, "fresh")], None, "large");
        assert_eq!(captions(&merged), vec!["a", "fresh"]);
    }

    #[test]
    fn image_missing_from_snapshot_keeps_current_caption() {
        let current = vec![image(7, "mine")];
        let (merged, _) =
            merge_selection(&current, &[media(7, "theirs")], Some(&snapshot(&[(5, "a")])), "large");
        assert_eq!(captions(&merged), vec!["mine"]);
    }

    #[test]
    fn upstream_change_for_image_not_in_gallery() {
        let (merged, _) = merge_selection(&[], &[media(8, "new")], Some(&snapshot(&[(8, "old")])), "large");
        assert_eq!(captions(&merged), vec!["new"]);
    }

    #[test]
    fn first_match_wins_for_duplicate_current_ids() {
        let current = vec![image(5, "first"), image(5, "second")];
        let (merged, _) = merge_selection(&current, &[media(5, "lib")], None, "large");
        assert_eq!(captions(&merged), vec!["first"]);
    }

    #[test]
    fn merged_list_follows_selection_order() {
        let current = vec![image(1, ""), image(2, ""), image(3, "")];
        let (merged, _) = merge_selection(&current, &[media(3, ""), media(1, "")], None, "large");
        assert_eq!(image_ids(&merged), vec![Some(3), Some(1)]);
    }

    #[test]
    fn snapshot_replaced_wholesale() {
        let (_, next) = merge_selection(
            &[image(1, "")],
            &[media(2, "two"), media(3, "three")],
            Some(&snapshot(&[(1, "one")])),
            "large",
        );
        assert_eq!(next, snapshot(&[(2, "two"), (3, "three")]));
    }

    #[test]
    fn upstream_changed_ignores_records_without_id() {
        let mut record = media(1, "x");
        record.id = None;
        assert!(!snapshot(&[(1, "y")]).upstream_changed(&record));
    }

    #[test]
    fn pick_prefers_sizes_url() {
        let mut record = media(1, "");
        record.sizes.insert(
            "large".into(),
            SizeVariant {
                url: "https://example.test/1-1024.jpg".into(),
            },
        );
        assert_eq!(pick_relevant_media(&record, "large").url, "https://example.test/1-1024.jpg");
    }

    #[test]
    fn pick_falls_back_to_media_details() {
        let mut record = media(1, "");
        let mut details = MediaDetails::default();
        details.sizes.insert(
            "medium".into(),
            DetailSizeVariant {
                source_url: "https://example.test/1-300.jpg".into(),
            },
        );
        record.media_details = Some(details);
        assert_eq!(pick_relevant_media(&record, "medium").url, "https://example.test/1-300.jpg");
    }

    #[test]
    fn pick_falls_back_to_full_url() {
        let record = media(1, "");
        let picked = pick_relevant_media(&record, "large");
        assert_eq!(picked.url, record.url);
        assert_eq!(picked.link, record.link);
        assert_eq!(picked.id, Some(MediaId(1)));
    }
}
