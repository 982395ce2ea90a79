//! Shared test fixtures for the block-reconcile test suite.
//!
//! Builders for navigation links, pages and gallery images, plus extractors
//! that make list assertions read as plain data.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let current = vec![page_item(1), manual_item("WP", "https://wordpress.org")];
//! let pages = vec![source_page(1, "Home"), source_page(2, "About")];
//! let result = reconcile(&current, Some(&pages));
//! assert_eq!(item_ids(&current), vec![Some(1), None]);
//! ```

use crate::fetch::{RawPage, Rendered};
use crate::types::{GalleryImage, MediaId, MediaRecord, NavigationItem, PageId, SourcePage};

// =========================================================================
// Navigation fixtures
// =========================================================================

/// A link created from page `id`.
pub fn page_item(id: i64) -> NavigationItem {
    NavigationItem {
        id: Some(PageId(id)),
        url: Some(format!("https://example.test/?page_id={id}")),
        label: Some(format!("Page {id}")),
        title: Some(format!("Page {id}")),
        kind: Some("page".into()),
        opens_in_new_tab: false,
    }
}

/// A manually created link without a page id.
pub fn manual_item(label: &str, url: &str) -> NavigationItem {
    NavigationItem {
        url: Some(url.into()),
        label: Some(label.into()),
        ..Default::default()
    }
}

/// A normalized page.
pub fn source_page(id: i64, title: &str) -> SourcePage {
    SourcePage {
        id: PageId(id),
        url: format!("https://example.test/?page_id={id}"),
        title: title.into(),
        kind: "page".into(),
    }
}

/// A page record in REST shape, title given as rendered HTML.
pub fn raw_page(id: i64, rendered_title: &str) -> RawPage {
    RawPage {
        id,
        link: format!("https://example.test/?page_id={id}"),
        title: Rendered {
            rendered: rendered_title.into(),
        },
        kind: "page".into(),
        subtype: None,
    }
}

/// Raw page ids of links in order (`None` for manual links).
pub fn item_ids(items: &[NavigationItem]) -> Vec<Option<i64>> {
    items.iter().map(|i| i.id.map(|id| id.0)).collect()
}

// =========================================================================
// Gallery fixtures
// =========================================================================

/// An uploaded gallery image.
pub fn image(id: u64, caption: &str) -> GalleryImage {
    GalleryImage {
        id: Some(MediaId(id)),
        url: format!("https://example.test/uploads/{id}.jpg"),
        alt: String::new(),
        caption: caption.into(),
        link: Some(format!("https://example.test/?attachment_id={id}")),
    }
}

/// A gallery image that only exists as a local blob.
pub fn blob_image(name: &str) -> GalleryImage {
    GalleryImage {
        id: None,
        url: format!("blob:https://example.test/{name}"),
        ..Default::default()
    }
}

/// A media record as the media library returns it.
pub fn media(id: u64, caption: &str) -> MediaRecord {
    MediaRecord {
        id: Some(MediaId(id)),
        url: format!("https://example.test/uploads/{id}.jpg"),
        alt: String::new(),
        caption: caption.into(),
        link: Some(format!("https://example.test/?attachment_id={id}")),
        sizes: Default::default(),
        media_details: None,
    }
}

/// Raw media ids of images in order.
pub fn image_ids(images: &[GalleryImage]) -> Vec<Option<u64>> {
    images.iter().map(|i| i.id.map(|id| id.0)).collect()
}

/// Captions of images in order.
pub fn captions(images: &[GalleryImage]) -> Vec<&str> {
    images.iter().map(|i| i.caption.as_str()).collect()
}
