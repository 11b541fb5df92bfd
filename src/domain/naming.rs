//! Naming convention shared by gallery selection and destination paths
//!
//! Wiki galleries tag each image with a `data-image-key` such as
//! `Cannon3-2.png`: the item family prefix, the level, an optional
//! `-[1-5]` rendering suffix and an optional naming variant. The same
//! convention decides which elements are selected and where the downloaded
//! file lands, so both live here and nowhere else.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::domain::catalog::CatalogRow;

/// Marker after which wiki image URLs carry thumbnail/versioning parts
pub const REVISION_MARKER: &str = "/revision";

/// Naming convention for one item family (identifier key + optional variant)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    identifier_key: String,
    naming_variant: Option<String>,
}

impl NamingConvention {
    pub fn new(identifier_key: impl Into<String>, naming_variant: Option<String>) -> Self {
        Self {
            identifier_key: identifier_key.into(),
            naming_variant: naming_variant.filter(|v| !v.is_empty()),
        }
    }

    pub fn for_row(row: &CatalogRow) -> Self {
        Self::new(row.identifier_key.clone(), row.naming_variant.clone())
    }

    pub fn identifier_key(&self) -> &str {
        &self.identifier_key
    }

    pub fn naming_variant(&self) -> Option<&str> {
        self.naming_variant.as_deref()
    }

    fn variant_suffix(&self) -> &str {
        self.naming_variant.as_deref().unwrap_or("")
    }

    /// Pattern selecting every level of the family: `key\d+(-[1-5])?(variant)?\.png`
    pub fn gallery_pattern(&self) -> Result<Regex, regex::Error> {
        self.build_pattern(r"\d+")
    }

    /// Pattern selecting a single level: `key<level>(-[1-5])?(variant)?\.png`
    pub fn level_pattern(&self, level: u32) -> Result<Regex, regex::Error> {
        self.build_pattern(&level.to_string())
    }

    // Anchored at the start only; trailing characters after `.png` are accepted.
    fn build_pattern(&self, level_fragment: &str) -> Result<Regex, regex::Error> {
        let variant = self
            .naming_variant
            .as_deref()
            .map(|v| format!("(?:{})?", regex::escape(v)))
            .unwrap_or_default();

        Regex::new(&format!(
            r"^{}{}(?:-[1-5])?{}\.png",
            regex::escape(&self.identifier_key),
            level_fragment,
            variant
        ))
    }

    /// Directory name for one level, e.g. `Cannon_3-alt`
    pub fn level_dir_name(&self, level: u32) -> String {
        format!("{}_{}{}", self.identifier_key, level, self.variant_suffix())
    }

    /// File stem for one image, e.g. `Cannon_3_2-alt`
    pub fn file_stem(&self, level: u32, sequential_index: usize) -> String {
        format!(
            "{}_{}_{}{}",
            self.identifier_key,
            level,
            sequential_index,
            self.variant_suffix()
        )
    }

    /// `<base_dir>/<key>/<key>_<level>[<variant>]`
    pub fn level_dir(&self, base_dir: &Path, level: u32) -> PathBuf {
        base_dir
            .join(&self.identifier_key)
            .join(self.level_dir_name(level))
    }

    /// Full destination path once the image format's extension is known
    pub fn destination_path(
        &self,
        base_dir: &Path,
        level: u32,
        sequential_index: usize,
        extension: &str,
    ) -> PathBuf {
        self.level_dir(base_dir, level)
            .join(format!("{}.{}", self.file_stem(level, sequential_index), extension))
    }
}

/// Drop the site-specific `/revision/...` suffix from an image URL
pub fn strip_revision_suffix(url: &str) -> &str {
    url.split(REVISION_MARKER).next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Cannon1.png", true)]
    #[case("Cannon12.png", true)]
    #[case("Cannon3-4.png", true)]
    #[case("Cannon3-9.png", false)]
    #[case("Cannon.png", false)]
    #[case("XCannon1.png", false)]
    #[case("cannon1.png", false)]
    #[case("Cannon1.png?cb=123", true)]
    fn gallery_pattern_matches_family(#[case] key: &str, #[case] expected: bool) {
        let naming = NamingConvention::new("Cannon", None);
        assert_eq!(naming.gallery_pattern().unwrap().is_match(key), expected);
    }

    #[rstest]
    #[case("Cannon1.png", 1, true)]
    #[case("Cannon1-2.png", 1, true)]
    #[case("Cannon10.png", 1, false)]
    #[case("Cannon2.png", 1, false)]
    #[case("Cannon10.png", 10, true)]
    fn level_pattern_is_level_exact(#[case] key: &str, #[case] level: u32, #[case] expected: bool) {
        let naming = NamingConvention::new("Cannon", None);
        assert_eq!(naming.level_pattern(level).unwrap().is_match(key), expected);
    }

    #[test]
    fn variant_is_optional_in_patterns() {
        let naming = NamingConvention::new("Wall", Some("-alt".to_string()));
        let pattern = naming.level_pattern(2).unwrap();

        assert!(pattern.is_match("Wall2-alt.png"));
        assert!(pattern.is_match("Wall2-3-alt.png"));
        assert!(pattern.is_match("Wall2.png"));
        assert!(!pattern.is_match("Wall2-other.png"));
    }

    #[test]
    fn identifier_key_is_matched_literally() {
        let naming = NamingConvention::new("X.Bow", None);
        let pattern = naming.gallery_pattern().unwrap();

        assert!(pattern.is_match("X.Bow1.png"));
        assert!(!pattern.is_match("XZBow1.png"));
    }

    #[test]
    fn empty_variant_is_treated_as_none() {
        let naming = NamingConvention::new("Mortar", Some(String::new()));
        assert_eq!(naming.naming_variant(), None);
        assert_eq!(naming.file_stem(1, 1), "Mortar_1_1");
    }

    #[test]
    fn destination_path_layout() {
        let naming = NamingConvention::new("Cannon", Some("-alt".to_string()));
        let path = naming.destination_path(Path::new("items"), 3, 2, "png");

        assert_eq!(
            path,
            Path::new("items/Cannon/Cannon_3-alt/Cannon_3_2-alt.png")
        );
    }

    #[rstest]
    #[case(
        "https://static.wiki.example/images/a/ab/Cannon1.png/revision/latest/scale-to-width-down/120?cb=1",
        "https://static.wiki.example/images/a/ab/Cannon1.png"
    )]
    #[case("https://cdn.example/Cannon1.png", "https://cdn.example/Cannon1.png")]
    fn revision_suffix_is_stripped(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_revision_suffix(input), expected);
    }
}
