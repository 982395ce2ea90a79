//! CLI output formatting.
//!
//! Output is a readable inventory: every entity leads with a positional
//! index and its label, with urls and status as indented context lines.
//!
//! # Output Format
//!
//! ## Reconcile
//!
//! ```text
//! Links
//! 001 Home (page 1)
//!     https://example.test/?page_id=1
//! 002 WordPress (custom link)
//!     https://wordpress.org
//!
//! Pages
//! 001 Home (linked)
//! 002 About
//! 003 Contact
//!
//! Missing pages: 4, 7
//! State: awaiting user intent (2 links to add)
//! ```
//!
//! ## Merge
//!
//! ```text
//! Gallery (2 images, 2 columns)
//! 001 #5 Dawn
//!     https://example.test/uploads/5.jpg
//! 002 (local file)
//!     blob:local/1
//! Settings
//!     crop: yes
//!     link to: none
//!     size: large
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::gallery::{is_blob_url, GalleryAttributes, LinkTo};
use crate::navigation::{PlaceholderState, ReconciliationResult};
use crate::types::{NavigationItem, SourcePage};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn join_ids<T: ToString>(ids: impl IntoIterator<Item = T>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Navigation
// ============================================================================

/// Format the links of a navigation block.
///
/// Empty links (as left by "start empty") show as `(empty link)`.
pub fn format_navigation(items: &[NavigationItem]) -> Vec<String> {
    let mut lines = vec!["Links".to_string()];
    if items.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
        return lines;
    }
    for (i, item) in items.iter().enumerate() {
        let label = item.label.as_deref().filter(|l| !l.is_empty());
        let origin = match item.page_id() {
            Some(id) => format!("page {}", id),
            None => "custom link".to_string(),
        };
        let header = match label {
            Some(label) => format!("{} {} ({})", format_index(i + 1), label, origin),
            None => format!("{} (empty link)", format_index(i + 1)),
        };
        lines.push(header);
        if let Some(url) = item.url.as_deref().filter(|u| !u.is_empty()) {
            lines.push(format!("{}{}", indent(1), url));
        }
    }
    lines
}

fn describe_state(state: &PlaceholderState) -> String {
    match state {
        PlaceholderState::NoItems => "no pages loaded".to_string(),
        PlaceholderState::Detecting => "loading pages".to_string(),
        PlaceholderState::AwaitingUserIntent { candidate: None } => {
            "awaiting user intent (nothing to add)".to_string()
        }
        PlaceholderState::AwaitingUserIntent {
            candidate: Some(_),
        } => "awaiting user intent".to_string(),
        PlaceholderState::Populated => "populated".to_string(),
    }
}

/// Format a reconciliation report: current links, fetched pages with
/// coverage, missing and repeated ids, and the placeholder state.
pub fn format_reconciliation(
    items: &[NavigationItem],
    pages: Option<&[SourcePage]>,
    result: &ReconciliationResult,
    state: &PlaceholderState,
) -> Vec<String> {
    let mut lines = format_navigation(items);

    lines.push(String::new());
    lines.push("Pages".to_string());
    match pages {
        None => lines.push(format!("{}(not loaded)", indent(1))),
        Some([]) => lines.push(format!("{}(none)", indent(1))),
        Some(pages) => {
            for (i, page) in pages.iter().enumerate() {
                let marker = if result.items_by_id.contains_key(&page.id) {
                    " (linked)"
                } else {
                    ""
                };
                lines.push(format!("{} {}{}", format_index(i + 1), page.title, marker));
            }
        }
    }

    lines.push(String::new());
    if result.has_unadded() {
        lines.push(format!(
            "Missing pages: {}",
            join_ids(result.unadded_page_ids.iter())
        ));
    }
    if result.has_duplicates() {
        lines.push(format!("Repeated ids: {}", join_ids(result.repeated_ids.iter())));
    }
    let state_line = match state {
        PlaceholderState::AwaitingUserIntent {
            candidate: Some(candidate),
        } => format!(
            "State: {} ({} to add)",
            describe_state(state),
            plural(candidate.len().saturating_sub(items.len()), "link")
        ),
        _ => format!("State: {}", describe_state(state)),
    };
    lines.push(state_line);
    lines
}

/// Print a reconciliation report to stdout.
pub fn print_reconciliation(
    items: &[NavigationItem],
    pages: Option<&[SourcePage]>,
    result: &ReconciliationResult,
    state: &PlaceholderState,
) {
    for line in format_reconciliation(items, pages, result, state) {
        println!("{}", line);
    }
}

// ============================================================================
// Gallery
// ============================================================================

fn link_to_label(link_to: LinkTo) -> &'static str {
    match link_to {
        LinkTo::Attachment => "attachment page",
        LinkTo::Media => "media file",
        LinkTo::None => "none",
    }
}

/// Format the images and settings of a gallery.
///
/// `default_columns` is used for the column count when none is set.
pub fn format_gallery(attributes: &GalleryAttributes, default_columns: u32) -> Vec<String> {
    let columns = attributes.effective_columns(default_columns);
    let mut lines = vec![format!(
        "Gallery ({}, {})",
        plural(attributes.len(), "image"),
        plural(columns as usize, "column")
    )];

    for (i, image) in attributes.images().iter().enumerate() {
        let index = format_index(i + 1);
        let header = match (image.id, image.caption.is_empty()) {
            (Some(id), false) => format!("{} #{} {}", index, id, image.caption),
            (Some(id), true) => format!("{} #{}", index, id),
            (None, _) if is_blob_url(&image.url) => format!("{} (local file)", index),
            (None, false) => format!("{} {}", index, image.caption),
            (None, true) => index,
        };
        lines.push(header);
        lines.push(format!("{}{}", indent(1), image.url));
    }

    if !attributes.caption().is_empty() {
        lines.push(format!("Caption: {}", attributes.caption()));
    }
    lines.push("Settings".to_string());
    let crop = if attributes.image_crop() { "yes" } else { "no" };
    lines.push(format!("{}crop: {}", indent(1), crop));
    lines.push(format!("{}link to: {}", indent(1), link_to_label(attributes.link_to())));
    lines.push(format!("{}size: {}", indent(1), attributes.size_slug()));
    lines
}

/// Print a gallery summary to stdout.
pub fn print_gallery(attributes: &GalleryAttributes, default_columns: u32) {
    for line in format_gallery(attributes, default_columns) {
        println!("{}", line);
    }
}
