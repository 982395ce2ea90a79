//! Gallery block attributes.
//!
//! [`GalleryAttributes`] owns the image list. The only ways to change it are
//! [`GalleryAttributes::replace_images`] and the list operations built on it,
//! each of which re-clamps `columns`. `ids` is never stored; it is computed
//! from the images when read or serialized.

use crate::gallery::{GalleryError, LinkTo};
use crate::types::{GalleryImage, MediaId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resized image urls per media id and size slug.
pub type ResizedImages = HashMap<MediaId, HashMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AttributesRepr", try_from = "AttributesRepr")]
pub struct GalleryAttributes {
    images: Vec<GalleryImage>,
    columns: Option<u32>,
    caption: String,
    image_crop: bool,
    link_to: LinkTo,
    size_slug: String,
}

impl Default for GalleryAttributes {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            columns: None,
            caption: String::new(),
            image_crop: true,
            link_to: LinkTo::None,
            size_slug: default_size_slug(),
        }
    }
}

fn default_size_slug() -> String {
    "large".to_string()
}

fn default_image_crop() -> bool {
    true
}

fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl GalleryAttributes {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }

    /// Empty gallery using configured link target and image size.
    pub fn from_config(config: &crate::config::GalleryConfig) -> Self {
        Self {
            link_to: config.link_to,
            size_slug: config.default_size_slug.clone(),
            ..Self::default()
        }
    }

    /// Parse stored attributes. `sizeSlug` and `linkTo` fall back to the
    /// configured values when the stored object omits them.
    pub fn from_value_with_defaults(
        mut value: serde_json::Value,
        config: &crate::config::GalleryConfig,
    ) -> Result<Self, serde_json::Error> {
        if let Some(object) = value.as_object_mut() {
            object
                .entry("sizeSlug")
                .or_insert_with(|| serde_json::Value::from(config.default_size_slug.clone()));
            object
                .entry("linkTo")
                .or_insert(serde_json::to_value(config.link_to)?);
        }
        serde_json::from_value(value)
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    /// Id of every image, in image order.
    pub fn ids(&self) -> Vec<Option<MediaId>> {
        self.images.iter().map(|image| image.id).collect()
    }

    pub fn columns(&self) -> Option<u32> {
        self.columns
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn image_crop(&self) -> bool {
        self.image_crop
    }

    pub fn link_to(&self) -> LinkTo {
        self.link_to
    }

    pub fn size_slug(&self) -> &str {
        &self.size_slug
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Whether any image has been uploaded to the media library.
    pub fn has_images_with_id(&self) -> bool {
        self.images.iter().any(|image| image.id.is_some())
    }

    /// Columns to render: the setting, or `default_columns` capped by the
    /// image count when unset.
    pub fn effective_columns(&self, default_columns: u32) -> u32 {
        self.columns
            .unwrap_or_else(|| default_columns.min(len_u32(self.images.len())))
    }

    /// Replace the image list, shrinking `columns` to fit.
    pub fn replace_images(&mut self, images: Vec<GalleryImage>) {
        self.images = images;
        let len = len_u32(self.images.len());
        self.columns = self.columns.map(|columns| columns.min(len));
    }

    /// Apply an attribute update. An update that carries `ids` is rejected
    /// as a whole.
    pub fn apply(&mut self, update: AttributeUpdate) -> Result<(), GalleryError> {
        if update.ids.is_some() {
            return Err(GalleryError::IdsAreDerived);
        }
        if let Some(images) = update.images {
            self.replace_images(images);
        }
        if let Some(columns) = update.columns {
            self.columns = Some(columns.min(len_u32(self.images.len())));
        }
        if let Some(caption) = update.caption {
            self.caption = caption;
        }
        if let Some(image_crop) = update.image_crop {
            self.image_crop = image_crop;
        }
        if let Some(link_to) = update.link_to {
            self.link_to = link_to;
        }
        if let Some(size_slug) = update.size_slug {
            self.size_slug = size_slug;
        }
        Ok(())
    }

    /// Swap the images at `old_index` and `new_index`.
    ///
    /// Returns `false` without changes if either index is out of range.
    pub fn move_item(&mut self, old_index: usize, new_index: usize) -> bool {
        if old_index >= self.images.len() || new_index >= self.images.len() {
            return false;
        }
        let mut images = self.images.clone();
        images.swap(old_index, new_index);
        self.replace_images(images);
        true
    }

    /// Remove the image at `index`, shrinking `columns` to fit.
    pub fn remove_item(&mut self, index: usize) -> Option<GalleryImage> {
        if index >= self.images.len() {
            return None;
        }
        let mut images = self.images.clone();
        let removed = images.remove(index);
        self.replace_images(images);
        Some(removed)
    }

    /// Patch the image at `index`. A missing index is ignored; it happens
    /// when an edit races a removal.
    pub fn set_image_attributes(&mut self, index: usize, patch: ImagePatch) -> bool {
        let Some(current) = self.images.get(index) else {
            return false;
        };
        let patched = patch.apply_to(current.clone());
        let mut images = self.images.clone();
        images[index] = patched;
        self.replace_images(images);
        true
    }

    /// Set the columns explicitly. Valid values are `1..=min(max_columns, len)`.
    pub fn set_columns(&mut self, value: u32, max_columns: u32) -> Result<(), GalleryError> {
        let max = max_columns.min(len_u32(self.images.len()));
        if value == 0 || value > max {
            return Err(GalleryError::ColumnsOutOfRange { value, max });
        }
        self.columns = Some(value);
        Ok(())
    }

    /// Switch every uploaded image to its `size_slug` variant, where known.
    pub fn update_images_size(&mut self, size_slug: &str, resized: &ResizedImages) {
        let images = self
            .images
            .iter()
            .map(|image| {
                let url = image
                    .id
                    .and_then(|id| resized.get(&id))
                    .and_then(|sizes| sizes.get(size_slug));
                match url {
                    Some(url) => GalleryImage {
                        url: url.clone(),
                        ..image.clone()
                    },
                    None => image.clone(),
                }
            })
            .collect();
        self.replace_images(images);
        self.size_slug = size_slug.to_string();
    }

    pub fn toggle_image_crop(&mut self) {
        self.image_crop = !self.image_crop;
    }

    pub fn set_link_to(&mut self, link_to: LinkTo) {
        self.link_to = link_to;
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }
}

/// A partial attribute write, as sent by block controls.
///
/// `ids` exists only so that a write containing it can be recognized and
/// refused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AttributeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<GalleryImage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<Option<MediaId>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_crop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_to: Option<LinkTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_slug: Option<String>,
}

/// A partial write to one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagePatch {
    #[serde(default)]
    pub id: Option<MediaId>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl ImagePatch {
    fn apply_to(self, mut image: GalleryImage) -> GalleryImage {
        if let Some(id) = self.id {
            image.id = Some(id);
        }
        if let Some(url) = self.url {
            image.url = url;
        }
        if let Some(alt) = self.alt {
            image.alt = alt;
        }
        if let Some(caption) = self.caption {
            image.caption = caption;
        }
        if let Some(link) = self.link {
            image.link = Some(link);
        }
        image
    }
}

/// Serialized form. Carries `ids` for consumers that read it; on the way in,
/// `ids` is only checked against the images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributesRepr {
    #[serde(default)]
    images: Vec<GalleryImage>,
    #[serde(default)]
    ids: Option<Vec<Option<MediaId>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    columns: Option<u32>,
    #[serde(default)]
    caption: String,
    #[serde(default = "default_image_crop")]
    image_crop: bool,
    #[serde(default)]
    link_to: LinkTo,
    #[serde(default = "default_size_slug")]
    size_slug: String,
}

impl From<GalleryAttributes> for AttributesRepr {
    fn from(attributes: GalleryAttributes) -> Self {
        Self {
            ids: Some(attributes.ids()),
            images: attributes.images,
            columns: attributes.columns,
            caption: attributes.caption,
            image_crop: attributes.image_crop,
            link_to: attributes.link_to,
            size_slug: attributes.size_slug,
        }
    }
}

impl TryFrom<AttributesRepr> for GalleryAttributes {
    type Error = GalleryError;

    fn try_from(repr: AttributesRepr) -> Result<Self, Self::Error> {
        let mut attributes = GalleryAttributes {
            images: Vec::new(),
            columns: repr.columns,
            caption: repr.caption,
            image_crop: repr.image_crop,
            link_to: repr.link_to,
            size_slug: repr.size_slug,
        };
        attributes.replace_images(repr.images);
        if let Some(ids) = repr.ids {
            let expected = attributes.ids();
            if ids != expected {
                let raw = |ids: &[Option<MediaId>]| -> Vec<Option<u64>> {
                    ids.iter().map(|id| id.map(|id| id.0)).collect()
                };
                return Err(GalleryError::IdsMismatch {
                    ids: raw(ids.as_slice()),
                    expected: raw(expected.as_slice()),
                });
            }
        }
        Ok(attributes)
    }
}
