//! Gallery block: image list synchronization.
//!
//! The gallery keeps an ordered list of images plus settings derived from it.
//! Two invariants hold after every mutation:
//!
//! - `ids` is exactly the id sequence of `images`. It is a projection of the
//!   image list ([`GalleryAttributes::ids`]) and cannot be written.
//! - `columns`, when set, never exceeds the number of images. Shrinking the
//!   list shrinks `columns`; nothing grows it automatically.
//!
//! | Module | Role |
//! |--------|------|
//! | [`attributes`] | The attribute value type and its list operations |
//! | [`caption`] | Merging a media selection while keeping caption edits |
//! | [`upload`] | Blob detection, upload hand-off, notices |
//! | [`editor`] | Per-block UI state (selection, caption snapshot) driving the store |

pub mod attributes;
pub mod caption;
pub mod editor;
pub mod upload;

pub use attributes::{AttributeUpdate, GalleryAttributes, ImagePatch, ResizedImages};
pub use caption::{merge_selection, pick_relevant_media, select_caption, CaptionEntry, CaptionSnapshot};
pub use editor::GalleryEditor;
pub use upload::{
    is_blob_url, BlobFile, BlobStore, MediaUpload, MemoryBlobStore, Notice, NoticeStatus, Notices,
    UploadRequest, ALLOWED_MEDIA_TYPES,
};

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GalleryError {
    /// `ids` is derived from `images` and cannot be set.
    #[error("the \"ids\" attribute cannot be set directly; it is managed automatically when \"images\" changes")]
    IdsAreDerived,
    #[error("ids {ids:?} do not match the ids of the images {expected:?}")]
    IdsMismatch { ids: Vec<Option<u64>>, expected: Vec<Option<u64>> },
    #[error("columns must be between 1 and {max}, got {value}")]
    ColumnsOutOfRange { value: u32, max: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What each gallery image links to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTo {
    /// The attachment page of the image.
    Attachment,
    /// The media file itself.
    Media,
    #[default]
    None,
}
