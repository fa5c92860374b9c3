//! Catalog seed loading from the JSON feed
//!
//! The feed is a JSON array of bean records using the catalog field names
//! (`_id`, `index`, `isBOTD`, `Cost`, `Image`, `colour`, `Name`, `Description`,
//! `Country`). Loading only parses the file; inserting happens in
//! `core::bean::seed_beans`, which skips ids already present.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// One record of the seed feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedBean {
    /// Identifier kept as-is in the catalog
    #[serde(rename = "_id")]
    pub id: String,
    /// Display ordering
    #[serde(default)]
    pub index: i64,
    /// Whether the feed marks this bean as bean of the day
    #[serde(rename = "isBOTD", default)]
    pub is_botd: bool,
    /// Display-formatted cost
    #[serde(rename = "Cost")]
    pub cost: String,
    /// Image URL
    #[serde(rename = "Image")]
    pub image: Option<String>,
    /// Roast colour
    pub colour: Option<String>,
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
    /// Tasting notes
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Country of origin
    #[serde(rename = "Country")]
    pub country: Option<String>,
}

/// Parses the JSON feed.
pub fn parse_seed(contents: &str) -> Result<Vec<SeedBean>> {
    serde_json::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed data: {e}"),
    })
}

/// Loads the seed feed from `path`.
///
/// # Returns
/// * `Ok(Some(records))` - The file was read and parsed
/// * `Ok(None)` - No file at `path`; seeding is skipped
/// * `Err(Error)` - The file exists but cannot be read or parsed
pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Option<Vec<SeedBean>>> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        warn!("Seed file {} not found, skipping seed", path_ref.display());
        return Ok(None);
    }

    debug!("Loading seed data from {}", path_ref.display());
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path_ref.display()),
    })?;
    parse_seed(&contents).map(Some)
}
