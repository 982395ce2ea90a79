//! Navigation block: page coverage and population from existing pages.
//!
//! | Module | Role |
//! |--------|------|
//! | [`reconcile`] | Pure coverage analysis and merge-candidate construction |
//! | [`block`] | Per-block placeholder state machine with the two-phase detect/commit |

pub mod block;
pub mod reconcile;

pub use block::{NavigationBlock, PlaceholderState};
pub use reconcile::{
    item_from_page, items_from_pages, merge_candidate, reconcile, ReconciliationResult,
};

use serde::{Deserialize, Serialize};

/// Where links created from pages go relative to the existing links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewItemPlacement {
    #[default]
    Append,
    Prepend,
}
