//! Per-block gallery editor.
//!
//! Holds the state that belongs to the editing session rather than to the
//! block: which image is selected, the caption snapshot of the last media
//! selection, and notices. Block attributes are read from the store at the
//! start of every event and written back whole.

use crate::config::GalleryConfig;
use crate::gallery::attributes::{AttributeUpdate, GalleryAttributes, ImagePatch, ResizedImages};
use crate::gallery::caption::{merge_selection, CaptionSnapshot};
use crate::gallery::upload::{
    is_blob_url, BlobStore, MediaUpload, Notices, UploadRequest, ALLOWED_MEDIA_TYPES,
};
use crate::gallery::{GalleryError, LinkTo};
use crate::store::{BlockStore, StoreError};
use crate::types::{ClientId, MediaRecord};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct GalleryEditor {
    client: ClientId,
    config: GalleryConfig,
    selected_image: Option<usize>,
    attachment_captions: Option<CaptionSnapshot>,
    notices: Notices,
}

impl GalleryEditor {
    pub fn new(client: ClientId, config: GalleryConfig) -> Self {
        Self {
            client,
            config,
            selected_image: None,
            attachment_captions: None,
            notices: Notices::default(),
        }
    }

    pub fn client(&self) -> &ClientId {
        &self.client
    }

    pub fn selected_image(&self) -> Option<usize> {
        self.selected_image
    }

    /// Caption snapshot of the last media selection.
    pub fn attachment_captions(&self) -> Option<&CaptionSnapshot> {
        self.attachment_captions.as_ref()
    }

    /// Seed the caption snapshot, e.g. when resuming a session.
    pub fn restore_attachment_captions(&mut self, snapshot: CaptionSnapshot) {
        self.attachment_captions = Some(snapshot);
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    fn read<B: BlockStore>(&self, store: &B) -> Result<GalleryAttributes, GalleryError> {
        Ok(store.get_attributes(&self.client)?)
    }

    /// Media was selected in the library, or an upload completed.
    ///
    /// A gallery the store does not hold yet starts from the configured
    /// link target and image size.
    pub fn on_select_images<B: BlockStore>(
        &mut self,
        store: &mut B,
        selection: &[MediaRecord],
    ) -> Result<(), GalleryError> {
        let mut attributes = match store.get_attributes(&self.client) {
            Ok(attributes) => attributes,
            Err(StoreError::UnknownBlock(_)) => {
                debug!(client = %self.client, "new gallery, using configured defaults");
                GalleryAttributes::from_config(&self.config)
            }
        };
        let (images, snapshot) = merge_selection(
            attributes.images(),
            selection,
            self.attachment_captions.as_ref(),
            attributes.size_slug(),
        );
        debug!(client = %self.client, count = images.len(), "merging media selection");
        self.attachment_captions = Some(snapshot);
        attributes.replace_images(images);
        store.set_attributes(&self.client, attributes);
        Ok(())
    }

    pub fn on_select_image(&mut self, index: usize) {
        self.selected_image = Some(index);
    }

    /// Swap two images; the selection follows the moved image.
    pub fn on_move<B: BlockStore>(
        &mut self,
        store: &mut B,
        old_index: usize,
        new_index: usize,
    ) -> Result<bool, GalleryError> {
        let mut attributes = self.read(store)?;
        if !attributes.move_item(old_index, new_index) {
            return Ok(false);
        }
        self.selected_image = Some(new_index);
        store.set_attributes(&self.client, attributes);
        Ok(true)
    }

    /// Move an image one place towards the end. No-op for the last image.
    pub fn on_move_forward<B: BlockStore>(
        &mut self,
        store: &mut B,
        index: usize,
    ) -> Result<bool, GalleryError> {
        let len = self.read(store)?.len();
        if index.saturating_add(1) >= len {
            return Ok(false);
        }
        self.on_move(store, index, index + 1)
    }

    /// Move an image one place towards the start. No-op for the first image.
    pub fn on_move_backward<B: BlockStore>(
        &mut self,
        store: &mut B,
        index: usize,
    ) -> Result<bool, GalleryError> {
        if index == 0 {
            return Ok(false);
        }
        self.on_move(store, index, index - 1)
    }

    /// Remove an image and clear the selection.
    pub fn on_remove_image<B: BlockStore>(
        &mut self,
        store: &mut B,
        index: usize,
    ) -> Result<bool, GalleryError> {
        let mut attributes = self.read(store)?;
        self.selected_image = None;
        if attributes.remove_item(index).is_none() {
            return Ok(false);
        }
        store.set_attributes(&self.client, attributes);
        Ok(true)
    }

    /// Edit one image. A stale index is ignored.
    pub fn set_image_attributes<B: BlockStore>(
        &mut self,
        store: &mut B,
        index: usize,
        patch: ImagePatch,
    ) -> Result<bool, GalleryError> {
        let mut attributes = self.read(store)?;
        if !attributes.set_image_attributes(index, patch) {
            debug!(client = %self.client, index, "image no longer present, ignoring edit");
            return Ok(false);
        }
        store.set_attributes(&self.client, attributes);
        Ok(true)
    }

    /// Generic attribute write from block controls. Writes carrying `ids`
    /// are refused.
    pub fn update<B: BlockStore>(
        &mut self,
        store: &mut B,
        update: AttributeUpdate,
    ) -> Result<(), GalleryError> {
        let mut attributes = self.read(store)?;
        attributes.apply(update)?;
        store.set_attributes(&self.client, attributes);
        Ok(())
    }

    pub fn set_columns<B: BlockStore>(&mut self, store: &mut B, columns: u32) -> Result<(), GalleryError> {
        let mut attributes = self.read(store)?;
        attributes.set_columns(columns, self.config.max_columns)?;
        store.set_attributes(&self.client, attributes);
        Ok(())
    }

    /// Columns to render, using the configured default when none are set.
    pub fn effective_columns<B: BlockStore>(&self, store: &B) -> Result<u32, GalleryError> {
        Ok(self.read(store)?.effective_columns(self.config.default_columns))
    }

    pub fn update_images_size<B: BlockStore>(
        &mut self,
        store: &mut B,
        size_slug: &str,
        resized: &ResizedImages,
    ) -> Result<(), GalleryError> {
        let mut attributes = self.read(store)?;
        attributes.update_images_size(size_slug, resized);
        store.set_attributes(&self.client, attributes);
        Ok(())
    }

    pub fn toggle_image_crop<B: BlockStore>(&mut self, store: &mut B) -> Result<(), GalleryError> {
        let mut attributes = self.read(store)?;
        attributes.toggle_image_crop();
        store.set_attributes(&self.client, attributes);
        Ok(())
    }

    pub fn set_link_to<B: BlockStore>(&mut self, store: &mut B, link_to: LinkTo) -> Result<(), GalleryError> {
        let mut attributes = self.read(store)?;
        attributes.set_link_to(link_to);
        store.set_attributes(&self.client, attributes);
        Ok(())
    }

    /// The gallery caption got focus; image selection is dropped.
    pub fn on_focus_gallery_caption(&mut self) {
        self.selected_image = None;
    }

    pub fn on_block_deselected(&mut self) {
        self.selected_image = None;
    }

    /// Hand locally dropped files to the uploader.
    ///
    /// Runs only when the gallery is non-empty and every image is a blob.
    /// Blobs are revoked once handed off. Returns whether an upload started.
    pub fn mount<B: BlockStore, L: BlobStore, U: MediaUpload>(
        &mut self,
        store: &B,
        blobs: &mut L,
        uploader: &mut U,
    ) -> Result<bool, GalleryError> {
        let attributes = self.read(store)?;
        let images = attributes.images();
        if images.is_empty() || !images.iter().all(|image| is_blob_url(&image.url)) {
            return Ok(false);
        }

        let mut files = Vec::with_capacity(images.len());
        for image in images {
            match blobs.get_blob(&image.url) {
                Some(file) => files.push(file),
                None => {
                    warn!(client = %self.client, url = %image.url, "blob not found, skipping");
                    self.notices
                        .create_warning(format!("A local file could not be read: {}", image.url));
                }
            }
        }
        for image in images {
            blobs.revoke(&image.url);
        }

        info!(client = %self.client, files = files.len(), "uploading local gallery files");
        uploader.upload(UploadRequest {
            files,
            allowed_types: ALLOWED_MEDIA_TYPES.iter().map(|t| t.to_string()).collect(),
        });
        Ok(true)
    }

    /// The uploader failed. Replaces all notices with the error.
    pub fn on_upload_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(client = %self.client, %message, "gallery upload failed");
        self.notices.remove_all();
        self.notices.create_error(message);
    }
}
