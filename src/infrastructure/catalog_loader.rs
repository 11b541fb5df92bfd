//! CSV catalog loading
//!
//! Rows that fail to deserialize are logged and skipped; the schema itself
//! is not validated beyond what deserialization requires.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{info, warn};

use crate::domain::catalog::CatalogRow;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Load every readable row of a catalog file
pub fn load_catalog(path: &Path) -> ScrapeResult<Vec<CatalogRow>> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_path(path)
        .map_err(|source| ScrapeError::Catalog {
            path: path.to_path_buf(),
            source,
        })?;

    let rows = read_rows(reader);
    info!("Loaded {} catalog rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Parse catalog rows from any reader (used for in-memory catalogs)
pub fn parse_catalog<R: Read>(input: R) -> Vec<CatalogRow> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(input);
    read_rows(reader)
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>) -> Vec<CatalogRow> {
    let mut rows = Vec::new();

    for (index, result) in reader.deserialize::<CatalogRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Skipping catalog row {}: {}", index + 1, e),
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_rows_with_and_without_variant() {
        let csv = "\
data-image-key,URL,levels,regex
Cannon,https://wiki.example/Cannon,3,
Wall,https://wiki.example/Wall,2,-alt
";
        let rows = parse_catalog(csv.as_bytes());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].identifier_key, "Cannon");
        assert_eq!(rows[0].level_count, 3);
        assert_eq!(rows[0].naming_variant, None);
        assert_eq!(rows[1].naming_variant.as_deref(), Some("-alt"));
    }

    #[test]
    fn variant_column_is_optional() {
        let csv = "data-image-key,URL,levels\nMortar,https://wiki.example/Mortar,1\n";
        let rows = parse_catalog(csv.as_bytes());

        assert_eq!(rows, vec![CatalogRow::new("Mortar", "https://wiki.example/Mortar", 1, None)]);
    }

    #[test]
    fn unreadable_rows_are_skipped() {
        let csv = "\
data-image-key,URL,levels
Cannon,https://wiki.example/Cannon,three
Tower,https://wiki.example/Tower,2
";
        let rows = parse_catalog(csv.as_bytes());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].identifier_key, "Tower");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data-image-key,URL,levels,regex").unwrap();
        writeln!(file, "Cannon,https://wiki.example/Cannon,2,").unwrap();

        let rows = load_catalog(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn missing_file_is_catalog_error() {
        let err = load_catalog(Path::new("/no/such/catalog.csv")).unwrap_err();
        assert!(matches!(err, ScrapeError::Catalog { .. }));
    }
}
