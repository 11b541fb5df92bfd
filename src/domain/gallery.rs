//! Gallery image descriptors, level partitioning and deduplication

use std::collections::HashSet;

use regex::Regex;

/// One `<img>` element picked out of a gallery page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Raw `data-image-key` attribute value
    pub identifier_key: String,
    /// Absolute image URL, if the element carried one
    pub source_url: Option<String>,
}

impl ImageDescriptor {
    pub fn new(identifier_key: impl Into<String>, source_url: Option<String>) -> Self {
        Self {
            identifier_key: identifier_key.into(),
            source_url,
        }
    }

    /// Deduplication key: the identifier with surrounding whitespace removed
    pub fn dedupe_key(&self) -> &str {
        self.identifier_key.trim()
    }
}

/// Keep descriptors whose identifier matches a level pattern (prefix match)
pub fn filter_by_level(gallery: &[ImageDescriptor], level_pattern: &Regex) -> Vec<ImageDescriptor> {
    gallery
        .iter()
        .filter(|descriptor| level_pattern.is_match(&descriptor.identifier_key))
        .cloned()
        .collect()
}

/// Remove duplicate identifiers; the first occurrence wins and order is kept
pub fn dedupe(descriptors: Vec<ImageDescriptor>) -> Vec<ImageDescriptor> {
    let mut seen = HashSet::new();
    descriptors
        .into_iter()
        .filter(|descriptor| seen.insert(descriptor.dedupe_key().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::naming::NamingConvention;
    use proptest::prelude::*;

    fn descriptor(key: &str, url: &str) -> ImageDescriptor {
        ImageDescriptor::new(key, Some(url.to_string()))
    }

    #[test]
    fn dedupe_keeps_first_occurrence_in_order() {
        let input = vec![
            descriptor("Cannon1.png", "a"),
            descriptor("Cannon1-2.png", "b"),
            descriptor(" Cannon1.png ", "c"),
            descriptor("Cannon1-3.png", "d"),
            descriptor("Cannon1-2.png", "e"),
        ];

        let output = dedupe(input);
        let urls: Vec<_> = output.iter().filter_map(|d| d.source_url.as_deref()).collect();
        assert_eq!(urls, vec!["a", "b", "d"]);
    }

    #[test]
    fn filter_by_level_uses_pattern() {
        let naming = NamingConvention::new("Cannon", None);
        let gallery = vec![
            descriptor("Cannon1.png", "a"),
            descriptor("Cannon2.png", "b"),
            descriptor("Cannon11.png", "c"),
            descriptor("Cannon1-5.png", "d"),
        ];

        let level_one = filter_by_level(&gallery, &naming.level_pattern(1).unwrap());
        let keys: Vec<_> = level_one.iter().map(|d| d.identifier_key.as_str()).collect();
        assert_eq!(keys, vec!["Cannon1.png", "Cannon1-5.png"]);
    }

    proptest! {
        #[test]
        fn level_filter_rejects_other_levels(
            embedded in 1u32..500,
            requested in 1u32..500,
            suffix in proptest::option::of(1u8..=5),
        ) {
            prop_assume!(embedded != requested);
            let naming = NamingConvention::new("Tower", None);
            let key = match suffix {
                Some(s) => format!("Tower{embedded}-{s}.png"),
                None => format!("Tower{embedded}.png"),
            };
            let gallery = vec![ImageDescriptor::new(key, None)];

            let filtered = filter_by_level(&gallery, &naming.level_pattern(requested).unwrap());
            prop_assert!(filtered.is_empty());
        }

        #[test]
        fn dedupe_is_idempotent(keys in proptest::collection::vec("[ A-C]{0,3}", 0..20)) {
            let input: Vec<_> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| ImageDescriptor::new(k.clone(), Some(i.to_string())))
                .collect();

            let once = dedupe(input);
            let twice = dedupe(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
