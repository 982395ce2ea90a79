//! Page coverage analysis for a navigation block.
//!
//! [`reconcile`] compares the block's current links against the fetched
//! top-level pages: which page ids are linked, which are linked more than
//! once, and which pages have no link yet. [`merge_candidate`] turns the
//! missing pages into new links and places them around the existing ones.
//!
//! Both are pure; the result is recomputed from scratch on every change of
//! either input.

use crate::html::escape;
use crate::navigation::NewItemPlacement;
use crate::types::{NavigationItem, PageId, SourcePage};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Coverage of fetched pages by the current navigation links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Occurrence count of each page id among the current links.
    pub items_by_id: HashMap<PageId, usize>,
    /// Page ids of the current links, in link order.
    pub current_ids: Vec<PageId>,
    /// Ids linked more than once, each listed once, in order of detection.
    pub repeated_ids: Vec<PageId>,
    /// Fetched page ids without a link.
    pub unadded_page_ids: BTreeSet<PageId>,
}

impl ReconciliationResult {
    pub fn has_duplicates(&self) -> bool {
        !self.repeated_ids.is_empty()
    }

    pub fn has_unadded(&self) -> bool {
        !self.unadded_page_ids.is_empty()
    }
}

/// Compare current links against fetched pages.
///
/// `pages` is `None` while the fetch is pending; that is not an error and
/// simply yields no unadded ids. Links without a page id are left out of
/// the analysis.
pub fn reconcile(current: &[NavigationItem], pages: Option<&[SourcePage]>) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();

    for id in current.iter().filter_map(NavigationItem::page_id) {
        let count = result.items_by_id.entry(id).or_insert(0);
        *count += 1;
        if *count == 2 {
            result.repeated_ids.push(id);
        }
        result.current_ids.push(id);
    }

    if let Some(pages) = pages {
        result.unadded_page_ids = pages
            .iter()
            .map(|page| page.id)
            .filter(|id| !result.items_by_id.contains_key(id))
            .collect();
    }

    debug_assert!(
        result
            .repeated_ids
            .iter()
            .all(|id| !result.unadded_page_ids.contains(id)),
        "a repeated id cannot also be unadded"
    );

    result
}

/// Build a navigation link for a page.
pub fn item_from_page(page: &SourcePage) -> NavigationItem {
    let label = escape(&page.title);
    NavigationItem {
        id: Some(page.id),
        url: Some(page.url.clone()),
        label: Some(label.clone()),
        title: Some(label),
        kind: Some(page.kind.clone()),
        opens_in_new_tab: false,
    }
}

/// Links for every page in `result.unadded_page_ids`, in fetch order.
///
/// A page listed twice in one fetch yields a single link.
pub fn items_from_pages(pages: &[SourcePage], result: &ReconciliationResult) -> Vec<NavigationItem> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .filter(|page| result.unadded_page_ids.contains(&page.id) && seen.insert(page.id))
        .map(item_from_page)
        .collect()
}

/// The merged list population would write, or `None` when nothing is missing.
///
/// Existing links keep their relative order and are never dropped.
pub fn merge_candidate(
    current: &[NavigationItem],
    pages: &[SourcePage],
    result: &ReconciliationResult,
    placement: NewItemPlacement,
) -> Option<Vec<NavigationItem>> {
    if !result.has_unadded() {
        return None;
    }
    let new_items = items_from_pages(pages, result);
    let merged = match placement {
        NewItemPlacement::Append => current.iter().cloned().chain(new_items).collect(),
        NewItemPlacement::Prepend => new_items.into_iter().chain(current.iter().cloned()).collect(),
    };
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{item_ids, manual_item, page_item, source_page};

    fn ids(values: &[i64]) -> BTreeSet<PageId> {
        values.iter().copied().map(PageId).collect()
    }

    #[test]
    fn missing_page_is_unadded() {
        let current = vec![page_item(1), page_item(2)];
        let pages = vec![source_page(1, "Home"), source_page(2, "About"), source_page(3, "Contact")];
        let result = reconcile(&current, Some(&pages));
        assert_eq!(result.unadded_page_ids, ids(&[3]));
        assert_eq!(result.current_ids, vec![PageId(1), PageId(2)]);
        assert!(result.repeated_ids.is_empty());
    }

    #[test]
    fn duplicate_ids_are_reported_once() {
        let current = vec![page_item(1), page_item(1), page_item(1), page_item(2)];
        let result = reconcile(&current, None);
        assert_eq!(result.repeated_ids, vec![PageId(1)]);
        assert_eq!(result.items_by_id[&PageId(1)], 3);
        assert_eq!(result.items_by_id[&PageId(2)], 1);
    }

    #[test]
    fn repeated_ids_keep_detection_order() {
        let current = vec![page_item(2), page_item(1), page_item(1), page_item(2)];
        let result = reconcile(&current, None);
        assert_eq!(result.repeated_ids, vec![PageId(1), PageId(2)]);
    }

    #[test]
    fn pending_fetch_has_no_unadded_ids() {
        let result = reconcile(&[page_item(1)], None);
        assert!(result.unadded_page_ids.is_empty());
    }

    #[test]
    fn empty_fetch_has_no_unadded_ids() {
        let result = reconcile(&[], Some(&[]));
        assert!(!result.has_unadded());
    }

    #[test]
    fn manual_and_negative_ids_are_ignored() {
        let mut negative = page_item(0);
        negative.id = Some(PageId(-1));
        let current = vec![manual_item("WP", "https://wordpress.org"), negative, page_item(5)];
        let result = reconcile(&current, None);
        assert_eq!(result.current_ids, vec![PageId(5)]);
        assert_eq!(result.items_by_id.len(), 1);
    }

    #[test]
    fn page_id_zero_counts() {
        let result = reconcile(&[page_item(0)], Some(&[source_page(0, "Root")]));
        assert_eq!(result.current_ids, vec![PageId(0)]);
        assert!(result.unadded_page_ids.is_empty());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let current = vec![page_item(1), page_item(1), manual_item("x", "https://x.test")];
        let pages = vec![source_page(1, "A"), source_page(4, "B")];
        assert_eq!(reconcile(&current, Some(&pages)), reconcile(&current, Some(&pages)));
    }

    #[test]
    fn item_from_page_escapes_title() {
        let item = item_from_page(&source_page(7, "Q&A <live>"));
        assert_eq!(item.label.as_deref(), Some("Q&amp;A &lt;live&gt;"));
        assert_eq!(item.title, item.label);
        assert_eq!(item.id, Some(PageId(7)));
        assert_eq!(item.kind.as_deref(), Some("page"));
        assert!(!item.opens_in_new_tab);
    }

    #[test]
    fn items_from_pages_follow_fetch_order_without_duplicates() {
        let pages = vec![source_page(5, "E"), source_page(3, "C"), source_page(5, "E")];
        let result = reconcile(&[], Some(&pages));
        let items = items_from_pages(&pages, &result);
        assert_eq!(item_ids(&items), vec![Some(5), Some(3)]);
    }

    #[test]
    fn merge_candidate_appends_new_items() {
        let current = vec![page_item(1), manual_item("WP", "https://wordpress.org"), page_item(2)];
        let pages = vec![source_page(1, "A"), source_page(2, "B"), source_page(3, "C")];
        let result = reconcile(&current, Some(&pages));
        let merged = merge_candidate(&current, &pages, &result, NewItemPlacement::Append).unwrap();
        assert_eq!(item_ids(&merged), vec![Some(1), None, Some(2), Some(3)]);
    }

    #[test]
    fn merge_candidate_prepends_new_items() {
        let current = vec![page_item(2)];
        let pages = vec![source_page(1, "A"), source_page(2, "B"), source_page(3, "C")];
        let result = reconcile(&current, Some(&pages));
        let merged = merge_candidate(&current, &pages, &result, NewItemPlacement::Prepend).unwrap();
        assert_eq!(item_ids(&merged), vec![Some(1), Some(3), Some(2)]);
    }

    #[test]
    fn merge_candidate_none_when_covered() {
        let current = vec![page_item(1)];
        let pages = vec![source_page(1, "A")];
        let result = reconcile(&current, Some(&pages));
        assert!(merge_candidate(&current, &pages, &result, NewItemPlacement::Append).is_none());
    }

    #[test]
    fn merge_candidate_keeps_duplicates_in_current() {
        let current = vec![page_item(1), page_item(1)];
        let pages = vec![source_page(1, "A"), source_page(2, "B")];
        let result = reconcile(&current, Some(&pages));
        let merged = merge_candidate(&current, &pages, &result, NewItemPlacement::Append).unwrap();
        assert_eq!(item_ids(&merged), vec![Some(1), Some(1), Some(2)]);
    }
}
