//! Catalog rows: one item family per row

use serde::{Deserialize, Deserializer};

/// One row of the input catalog
///
/// Column names follow the spreadsheet the catalog is exported from:
/// `data-image-key`, `URL`, `levels` and the optional `regex` variant column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "data-image-key")]
    pub identifier_key: String,

    #[serde(rename = "URL")]
    pub page_url: String,

    #[serde(rename = "levels")]
    pub level_count: u32,

    #[serde(rename = "regex", default, deserialize_with = "empty_as_none")]
    pub naming_variant: Option<String>,
}

impl CatalogRow {
    pub fn new(
        identifier_key: impl Into<String>,
        page_url: impl Into<String>,
        level_count: u32,
        naming_variant: Option<String>,
    ) -> Self {
        Self {
            identifier_key: identifier_key.into(),
            page_url: page_url.into(),
            level_count,
            naming_variant: naming_variant.filter(|v| !v.trim().is_empty()),
        }
    }

    /// Levels covered by this row, 1-indexed and inclusive
    pub fn levels(&self) -> impl Iterator<Item = u32> {
        1..=self.level_count
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
