//! Block-tree store seam.
//!
//! The canonical navigation items and gallery attributes are owned by the
//! block-tree store. The navigation block and gallery editor read through it
//! on every event and write whole values back; they never keep a private copy
//! between events.

use crate::gallery::GalleryAttributes;
use crate::types::{ClientId, NavigationItem};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("no block with client id {0}")]
    UnknownBlock(ClientId),
}

/// Read/write access to canonical block state.
pub trait BlockStore {
    /// Navigation links of a navigation block, in display order.
    fn get_items(&self, client: &ClientId) -> Vec<NavigationItem>;

    /// Replace all navigation links of a block.
    fn replace_items(&mut self, client: &ClientId, items: Vec<NavigationItem>);

    /// The `automaticallyAdd` attribute of a navigation block.
    fn get_automatically_add(&self, client: &ClientId) -> bool;

    fn set_automatically_add(&mut self, client: &ClientId, value: bool);

    /// Attributes of a gallery block.
    fn get_attributes(&self, client: &ClientId) -> Result<GalleryAttributes, StoreError>;

    /// Replace the attributes of a gallery block.
    fn set_attributes(&mut self, client: &ClientId, attributes: GalleryAttributes);
}

/// In-memory store, keyed by client id.
///
/// Unknown navigation blocks read as empty; unknown gallery blocks are an
/// error because a gallery always has attributes once inserted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<ClientId, Vec<NavigationItem>>,
    automatically_add: HashMap<ClientId, bool>,
    galleries: HashMap<ClientId, GalleryAttributes>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of write operations performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BlockStore for MemoryStore {
    fn get_items(&self, client: &ClientId) -> Vec<NavigationItem> {
        self.items.get(client).cloned().unwrap_or_default()
    }

    fn replace_items(&mut self, client: &ClientId, items: Vec<NavigationItem>) {
        self.writes += 1;
        self.items.insert(client.clone(), items);
    }

    fn get_automatically_add(&self, client: &ClientId) -> bool {
        self.automatically_add.get(client).copied().unwrap_or(false)
    }

    fn set_automatically_add(&mut self, client: &ClientId, value: bool) {
        self.writes += 1;
        self.automatically_add.insert(client.clone(), value);
    }

    fn get_attributes(&self, client: &ClientId) -> Result<GalleryAttributes, StoreError> {
        self.galleries
            .get(client)
            .cloned()
            .ok_or_else(|| StoreError::UnknownBlock(client.clone()))
    }

    fn set_attributes(&mut self, client: &ClientId, attributes: GalleryAttributes) {
        self.writes += 1;
        self.galleries.insert(client.clone(), attributes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::page_item;

    #[test]
    fn unknown_navigation_block_reads_empty() {
        let store = MemoryStore::new();
        assert!(store.get_items(&ClientId::new("nav")).is_empty());
        assert!(!store.get_automatically_add(&ClientId::new("nav")));
    }

    #[test]
    fn replace_items_overwrites_whole_list() {
        let mut store = MemoryStore::new();
        let nav = ClientId::new("nav");
        store.replace_items(&nav, vec![page_item(1), page_item(2)]);
        store.replace_items(&nav, vec![page_item(3)]);
        assert_eq!(store.get_items(&nav), vec![page_item(3)]);
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn unknown_gallery_is_error() {
        let store = MemoryStore::new();
        let gallery = ClientId::new("gallery");
        assert_eq!(
            store.get_attributes(&gallery),
            Err(StoreError::UnknownBlock(gallery.clone()))
        );
    }

    #[test]
    fn gallery_attributes_round_trip() {
        let mut store = MemoryStore::new();
        let gallery = ClientId::new("gallery");
        store.set_attributes(&gallery, GalleryAttributes::default());
        assert_eq!(
            store.get_attributes(&gallery).unwrap(),
            GalleryAttributes::default()
        );
    }
}
