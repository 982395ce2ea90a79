//! Page fetch collaborator.
//!
//! The navigation block offers existing top-level pages as links. Pages come
//! from a [`PageSource`] (a REST client in the editor, a JSON file in the
//! CLI, a fixed list in tests). This module owns the query shape, the mapping
//! from REST records to [`SourcePage`], and the cancellable fetch.
//!
//! ## Cancellation
//!
//! A block can be torn down while its fetch is still in flight. The fetch
//! races against the block's [`CancellationToken`]; once the token fires the
//! result is dropped and `Ok(None)` is returned, so nothing is applied to a
//! block that no longer exists.
//!
//! Retry, backoff and timeouts belong to the source, not to this module.

use crate::html::decode_entities;
use crate::types::{PageId, SourcePage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid page payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("page source failed: {0}")]
    Source(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    Id,
    Title,
    Date,
    MenuOrder,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl OrderBy {
    fn as_str(self) -> &'static str {
        match self {
            OrderBy::Id => "id",
            OrderBy::Title => "title",
            OrderBy::Date => "date",
            OrderBy::MenuOrder => "menu_order",
        }
    }
}

/// Query for the pages offered to a navigation block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageQuery {
    /// Parent page id; `0` selects top-level pages.
    pub parent: u64,
    pub order: SortOrder,
    pub orderby: OrderBy,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            parent: 0,
            order: SortOrder::Asc,
            orderby: OrderBy::Id,
        }
    }
}

impl PageQuery {
    /// REST path for this query.
    pub fn path(&self) -> String {
        format!(
            "/wp/v2/pages?parent={}&order={}&orderby={}",
            self.parent,
            self.order.as_str(),
            self.orderby.as_str()
        )
    }
}

impl fmt::Display for PageQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A rendered text field as the REST API returns it (`{"rendered": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// A page record in REST shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    pub id: i64,
    pub link: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl RawPage {
    /// Normalize into a [`SourcePage`].
    ///
    /// The title is entity-decoded and falls back to `untitled_label` when
    /// empty; the subtype, when present, wins over the type.
    pub fn into_source_page(self, untitled_label: &str) -> SourcePage {
        let decoded = decode_entities(&self.title.rendered);
        let title = if decoded.trim().is_empty() {
            untitled_label.to_string()
        } else {
            decoded
        };
        let kind = match self.subtype {
            Some(subtype) if !subtype.is_empty() => subtype,
            _ => self.kind,
        };
        SourcePage {
            id: PageId(self.id),
            url: self.link,
            title,
            kind,
        }
    }
}

/// Anything that can answer a [`PageQuery`].
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_pages(&self, query: &PageQuery) -> Result<Vec<RawPage>, FetchError>;
}

/// A fixed list of pages, returned for every query.
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages: Vec<RawPage>,
}

impl StaticPageSource {
    pub fn new(pages: Vec<RawPage>) -> Self {
        Self { pages }
    }
}

impl PageSource for StaticPageSource {
    async fn fetch_pages(&self, _query: &PageQuery) -> Result<Vec<RawPage>, FetchError> {
        Ok(self.pages.clone())
    }
}

/// Pages read from a JSON file holding a REST `pages` response.
///
/// The file is re-read on every fetch, so edits between runs are picked up.
#[derive(Debug, Clone)]
pub struct JsonFilePageSource {
    path: PathBuf,
}

impl JsonFilePageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for JsonFilePageSource {
    async fn fetch_pages(&self, query: &PageQuery) -> Result<Vec<RawPage>, FetchError> {
        debug!(path = %self.path.display(), %query, "reading pages file");
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Fetch and normalize pages, unless `cancel` fires first.
///
/// Returns `Ok(None)` when cancelled; the in-flight result is discarded.
pub async fn fetch_pages<S: PageSource>(
    source: &S,
    query: &PageQuery,
    untitled_label: &str,
    cancel: &CancellationToken,
) -> Result<Option<Vec<SourcePage>>, FetchError> {
    debug!(%query, "fetching pages");
    let raw = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!(%query, "page fetch cancelled, discarding result");
            return Ok(None);
        }
        result = source.fetch_pages(query) => result?,
    };
    let pages: Vec<SourcePage> = raw
        .into_iter()
        .map(|page| page.into_source_page(untitled_label))
        .collect();
    debug!(count = pages.len(), "pages fetched");
    Ok(Some(pages))
}
