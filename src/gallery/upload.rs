//! Upload hand-off for galleries created from local files.
//!
//! Files dropped into the editor first exist as `blob:` urls. A gallery whose
//! images are all blobs has nothing in the media library yet; on mount the
//! files are handed to the [`MediaUpload`] collaborator and the blob urls are
//! revoked. The uploader reports back through
//! [`GalleryEditor::on_select_images`](crate::gallery::GalleryEditor::on_select_images)
//! with the persisted records, or through
//! [`GalleryEditor::on_upload_error`](crate::gallery::GalleryEditor::on_upload_error).

use std::collections::HashMap;

/// Media types a gallery accepts.
pub const ALLOWED_MEDIA_TYPES: &[&str] = &["image"];

const BLOB_PREFIX: &str = "blob:";

/// Whether `url` points at a transient local blob.
pub fn is_blob_url(url: &str) -> bool {
    url.starts_with(BLOB_PREFIX)
}

/// A local file behind a blob url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Registry of blob urls.
pub trait BlobStore {
    fn get_blob(&self, url: &str) -> Option<BlobFile>;

    /// Release a blob url. Unknown urls are ignored.
    fn revoke(&mut self, url: &str);
}

/// In-memory blob registry.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, BlobFile>,
    next: u64,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its blob url.
    pub fn create(&mut self, file: BlobFile) -> String {
        self.next += 1;
        let url = format!("{BLOB_PREFIX}local/{}", self.next);
        self.blobs.insert(url.clone(), file);
        url
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get_blob(&self, url: &str) -> Option<BlobFile> {
        self.blobs.get(url).cloned()
    }

    fn revoke(&mut self, url: &str) {
        self.blobs.remove(url);
    }
}

/// Files handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub files: Vec<BlobFile>,
    pub allowed_types: Vec<String>,
}

/// The media upload collaborator.
///
/// Called once per qualifying mount. Completion and failure are reported
/// back to the gallery editor by the host.
pub trait MediaUpload {
    fn upload(&mut self, request: UploadRequest);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStatus {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub status: NoticeStatus,
    pub message: String,
}

/// Notices shown on a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices {
    list: Vec<Notice>,
}

impl Notices {
    pub fn list(&self) -> &[Notice] {
        &self.list
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn remove_all(&mut self) {
        self.list.clear();
    }

    pub fn create_error(&mut self, message: impl Into<String>) {
        self.push(NoticeStatus::Error, message.into());
    }

    pub fn create_warning(&mut self, message: impl Into<String>) {
        self.push(NoticeStatus::Warning, message.into());
    }

    fn push(&mut self, status: NoticeStatus, message: String) {
        self.list.push(Notice { status, message });
    }
}
