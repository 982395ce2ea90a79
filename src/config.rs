//! Reconciler configuration.
//!
//! Loaded from an optional `config.toml`. Stock defaults are the base layer;
//! a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [navigation]
//! placement = "append"          # Where new page links go: "append" | "prepend"
//! untitled_label = "(no title)" # Label for pages whose title is empty
//!
//! [navigation.query]
//! parent = 0                    # Only top-level pages
//! order = "asc"                 # "asc" | "desc"
//! orderby = "id"                # "id" | "title" | "date" | "menu_order"
//!
//! [gallery]
//! max_columns = 8               # Upper bound for the columns setting
//! default_columns = 3           # Columns shown when none are set
//! default_size_slug = "large"   # Image size picked from media records
//! link_to = "none"              # "attachment" | "media" | "none"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::fetch::PageQuery;
use crate::gallery::LinkTo;
use crate::navigation::NewItemPlacement;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Navigation block population settings.
    pub navigation: NavigationConfig,
    /// Gallery block settings.
    pub gallery: GalleryConfig,
}

impl ReconcileConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.max_columns == 0 {
            return Err(ConfigError::Validation(
                "gallery.max_columns must be at least 1".into(),
            ));
        }
        if self.gallery.default_columns == 0
            || self.gallery.default_columns > self.gallery.max_columns
        {
            return Err(ConfigError::Validation(format!(
                "gallery.default_columns must be 1-{}",
                self.gallery.max_columns
            )));
        }
        if self.gallery.default_size_slug.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gallery.default_size_slug must not be empty".into(),
            ));
        }
        if self.navigation.untitled_label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "navigation.untitled_label must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Navigation population settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Where links created from pages are placed relative to existing ones.
    pub placement: NewItemPlacement,
    /// Label used when a fetched page has an empty title.
    pub untitled_label: String,
    /// Query sent to the page source.
    pub query: PageQuery,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            placement: NewItemPlacement::Append,
            untitled_label: "(no title)".to_string(),
            query: PageQuery::default(),
        }
    }
}

/// Gallery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Largest value the columns setting accepts.
    pub max_columns: u32,
    /// Columns used when the block has none set (capped by image count).
    pub default_columns: u32,
    /// Image size slug used when picking urls out of media records.
    pub default_size_slug: String,
    /// Link target for new galleries.
    pub link_to: LinkTo,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_columns: 8,
            default_columns: 3,
            default_size_slug: "large".to_string(),
            link_to: LinkTo::None,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ReconcileConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if there is no `config.toml` in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the base, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ReconcileConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ReconcileConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in `dir`, on top of the stock defaults.
pub fn load_config(dir: &Path) -> Result<ReconcileConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// A fully commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# block-reconcile configuration
# ============================
# Every key is optional. Values below are the defaults.

[navigation]
# Where links created from existing pages are placed:
# "append" puts them after the current links, "prepend" before.
placement = "append"
# Label for pages whose rendered title is empty.
untitled_label = "(no title)"

[navigation.query]
# Only pages with this parent are offered (0 = top-level pages).
parent = 0
# "asc" or "desc".
order = "asc"
# "id", "title", "date" or "menu_order".
orderby = "id"

[gallery]
# Upper bound for the columns setting.
max_columns = 8
# Columns used when a gallery has none set, capped by its image count.
default_columns = 3
# Image size picked from media records, for galleries that do not set one.
default_size_slug = "large"
# Link target for galleries that do not set one: "attachment", "media" or "none".
link_to = "none"
"##
}
