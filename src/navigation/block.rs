//! Placeholder state machine of a single navigation block.
//!
//! Population from existing pages is split in two phases:
//!
//! 1. **Detect** runs on every data change (fetch completed, links edited).
//!    It recomputes coverage and holds the merged candidate list without
//!    writing it anywhere.
//! 2. **Commit** runs only when the user asks for it ([`NavigationBlock::populate`]),
//!    at most once per block. The intent is recorded, so later detections
//!    never write on their own.
//!
//! ```text
//!  NoItems ──begin_fetch──▶ Detecting ──pages fetched──▶ AwaitingUserIntent
//!                              ▲                               │
//!                              └────────begin_fetch────────────┤
//!                                                       populate / create_empty
//!                                                              ▼
//!                                                          Populated
//! ```
//!
//! `Populated` is terminal. Fetches after it still refresh
//! [`NavigationBlock::last_result`] so duplicates keep being reported.

use crate::config::NavigationConfig;
use crate::fetch::{self, FetchError, PageSource};
use crate::navigation::reconcile::{merge_candidate, reconcile, ReconciliationResult};
use crate::navigation::NewItemPlacement;
use crate::store::BlockStore;
use crate::types::{ClientId, NavigationItem, SourcePage};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderState {
    /// No fetch has been started.
    NoItems,
    /// Pages are being fetched; detection sees them as absent.
    Detecting,
    /// Pages are known. `candidate` is the list population would write,
    /// `None` when every page already has a link.
    AwaitingUserIntent { candidate: Option<Vec<NavigationItem>> },
    /// The user committed; no further automatic writes.
    Populated,
}

/// Population controller for one navigation block.
#[derive(Debug)]
pub struct NavigationBlock {
    client: ClientId,
    placement: NewItemPlacement,
    state: PlaceholderState,
    pages: Option<Vec<SourcePage>>,
    last_result: ReconciliationResult,
    intent_recorded: bool,
    cancel: CancellationToken,
}

impl NavigationBlock {
    pub fn new(client: ClientId, placement: NewItemPlacement) -> Self {
        Self {
            client,
            placement,
            state: PlaceholderState::NoItems,
            pages: None,
            last_result: ReconciliationResult::default(),
            intent_recorded: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn client(&self) -> &ClientId {
        &self.client
    }

    pub fn state(&self) -> &PlaceholderState {
        &self.state
    }

    /// Coverage computed by the most recent detection.
    pub fn last_result(&self) -> &ReconciliationResult {
        &self.last_result
    }

    /// Pages from the most recent completed fetch.
    pub fn pages(&self) -> Option<&[SourcePage]> {
        self.pages.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.state == PlaceholderState::Detecting
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Token that tears the block down when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the "create from pages" action is available.
    pub fn can_populate(&self) -> bool {
        self.is_mounted()
            && !self.intent_recorded
            && matches!(
                self.state,
                PlaceholderState::AwaitingUserIntent { candidate: Some(_) }
            )
    }

    /// Whether the block should render its placeholder instead of its links.
    pub fn show_placeholder<B: BlockStore>(&self, store: &B) -> bool {
        !self.intent_recorded && store.get_items(&self.client).is_empty()
    }

    /// A fetch was started; previous pages no longer count.
    pub fn begin_fetch(&mut self) {
        self.pages = None;
        if self.state != PlaceholderState::Populated {
            self.state = PlaceholderState::Detecting;
        }
        debug!(client = %self.client, "navigation pages requested");
    }

    /// A fetch completed. Returns `false` if the block was unmounted and
    /// the pages were discarded.
    pub fn on_pages_fetched<B: BlockStore>(&mut self, store: &B, pages: Vec<SourcePage>) -> bool {
        if !self.is_mounted() {
            info!(client = %self.client, "block unmounted, discarding fetched pages");
            return false;
        }
        self.pages = Some(pages);
        self.detect(store);
        true
    }

    /// Phase 1: recompute coverage against the store's current links.
    ///
    /// Call after fetches and after any edit of the block's links.
    pub fn detect<B: BlockStore>(&mut self, store: &B) {
        let items = store.get_items(&self.client);
        let result = reconcile(&items, self.pages.as_deref());

        if result.has_duplicates() && result.repeated_ids != self.last_result.repeated_ids {
            let repeated: Vec<String> = result.repeated_ids.iter().map(ToString::to_string).collect();
            warn!(client = %self.client, ids = %repeated.join(","), "navigation links repeat page ids");
        }

        if self.state != PlaceholderState::Populated {
            if let Some(pages) = self.pages.as_deref() {
                let candidate = merge_candidate(&items, pages, &result, self.placement);
                debug!(
                    client = %self.client,
                    unadded = result.unadded_page_ids.len(),
                    "awaiting user intent"
                );
                self.state = PlaceholderState::AwaitingUserIntent { candidate };
            }
        }
        self.last_result = result;
    }

    /// Phase 2: write the missing page links into the store.
    ///
    /// Runs at most once per block. The candidate is rebuilt from the
    /// store's links at commit time. Returns whether anything was written.
    pub fn populate<B: BlockStore>(&mut self, store: &mut B) -> bool {
        if !self.can_populate() {
            debug!(client = %self.client, state = ?self.state, "populate not available");
            return false;
        }
        let Some(pages) = self.pages.as_deref() else {
            return false;
        };
        let items = store.get_items(&self.client);
        let result = reconcile(&items, Some(pages));
        let Some(merged) = merge_candidate(&items, pages, &result, self.placement) else {
            self.state = PlaceholderState::AwaitingUserIntent { candidate: None };
            self.last_result = result;
            return false;
        };

        info!(
            client = %self.client,
            added = merged.len() - items.len(),
            "populating navigation from pages"
        );
        store.replace_items(&self.client, merged);
        self.intent_recorded = true;
        self.state = PlaceholderState::Populated;
        self.last_result = reconcile(&store.get_items(&self.client), Some(pages));
        true
    }

    /// Replace the links with one empty link and leave the placeholder.
    pub fn create_empty<B: BlockStore>(&mut self, store: &mut B) {
        info!(client = %self.client, "creating empty navigation");
        store.replace_items(&self.client, vec![NavigationItem::default()]);
        self.intent_recorded = true;
        self.state = PlaceholderState::Populated;
    }

    /// Store the `automaticallyAdd` attribute. Turning it on while the
    /// placeholder is shown counts as the user asking for population.
    ///
    /// Returns whether population ran.
    pub fn set_automatically_add<B: BlockStore>(&mut self, store: &mut B, value: bool) -> bool {
        store.set_automatically_add(&self.client, value);
        if value && self.show_placeholder(store) {
            return self.populate(store);
        }
        false
    }

    /// Tear the block down. Pending and later fetch results are discarded.
    pub fn unmount(&mut self) {
        debug!(client = %self.client, "navigation block unmounted");
        self.cancel.cancel();
    }

    /// One full fetch-and-detect cycle against `source`.
    ///
    /// Returns `Ok(true)` when pages were applied, `Ok(false)` when the
    /// block was torn down before the fetch resolved. On a fetch error the
    /// block stays in `Detecting`.
    pub async fn refresh<B: BlockStore, S: PageSource>(
        &mut self,
        store: &B,
        source: &S,
        config: &NavigationConfig,
    ) -> Result<bool, FetchError> {
        self.begin_fetch();
        let cancel = self.cancel.clone();
        let fetched =
            fetch::fetch_pages(source, &config.query, &config.untitled_label, &cancel).await?;
        match fetched {
            Some(pages) => Ok(self.on_pages_fetched(store, pages)),
            None => Ok(false),
        }
    }
}
