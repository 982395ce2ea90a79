//! # Block Reconcile
//!
//! Editor-side reconciliation for two list-valued blocks:
//!
//! - a **navigation block**, whose links are checked against the site's
//!   top-level pages so that missing pages can be added in one step, and
//! - a **gallery block**, whose image list is kept in sync with media-library
//!   selections and uploads without losing caption edits.
//!
//! Both blocks read canonical state from a block-tree store on every event
//! and write whole values back ([`store::BlockStore`]). The blocks themselves
//! only hold session state: fetched pages and the placeholder state for
//! navigation, the selected image and caption snapshot for galleries.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`navigation`] | Coverage analysis, merge candidates, the placeholder state machine |
//! | [`gallery`] | Gallery attributes, selection merge with caption preservation, upload hand-off |
//! | [`fetch`] | Page source seam, REST page records, cancellable fetch |
//! | [`store`] | Block-tree store seam and an in-memory store |
//! | [`config`] | `config.toml` loading, stock defaults, merging and validation |
//! | [`types`] | Shared data exchanged with the store and collaborators |
//! | [`html`] | Escaping labels and decoding rendered titles |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Detect, Then Commit
//!
//! Populating navigation from pages happens in two phases. Detection runs
//! after every fetch and every edit and only computes what would be added.
//! The commit happens on explicit user intent, once per block, and recomputes
//! the candidate from the store's links at that moment. An edit made between
//! the two phases is therefore never overwritten by a stale candidate.
//!
//! ## Derived `ids`
//!
//! A gallery's `ids` attribute is the id sequence of its images. It is
//! computed when read or serialized and never stored, so it cannot drift.
//! Writes that try to set it are rejected with
//! [`gallery::GalleryError::IdsAreDerived`].
//!
//! ## Cancellation Instead of Mount Flags
//!
//! A navigation block owns a `CancellationToken`. Unmounting cancels it and
//! any fetch still in flight resolves to "discarded" instead of writing into
//! a block that no longer exists.

pub mod config;
pub mod fetch;
pub mod gallery;
pub mod html;
pub mod navigation;
pub mod output;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
