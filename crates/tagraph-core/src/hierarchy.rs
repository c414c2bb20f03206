//! Tag hierarchy expansion and usage counting.
//!
//! A tag path such as `FINANCE/MARKETS/BETA` implies three tags:
//! `FINANCE`, `FINANCE/MARKETS` and `FINANCE/MARKETS/BETA`. [`expand`]
//! produces that chain; [`TagHierarchy`] replays entries through it and
//! keeps one usage count per distinct tag.
//!
//! The hierarchy is derived state. It is never persisted and is rebuilt from
//! a full store snapshot by [`TagHierarchy::from_entries`] whenever counts
//! are needed.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use serde::Serialize;

use crate::entry::Entry;

/// Separator between hierarchy levels.
pub const TAG_SEPARATOR: char = '/';

/// Expands a tag path into its cumulative-prefix chain.
///
/// `"A/B/C"` becomes `["A", "A/B", "A/B/C"]`. Empty input yields an empty
/// chain. Empty segments are kept verbatim, so `"A//B"` becomes
/// `["A", "A/", "A//B"]`.
pub fn expand(tag_path: &str) -> Vec<String> {
    if tag_path.is_empty() {
        return Vec::new();
    }
    let mut chain: Vec<String> = Vec::new();
    for segment in tag_path.split(TAG_SEPARATOR) {
        let next = match chain.last() {
            Some(prev) => format!("{}{}{}", prev, TAG_SEPARATOR, segment),
            None => segment.to_string(),
        };
        chain.push(next);
    }
    chain
}

/// The immediate parent of a tag, or `None` for a root tag.
pub fn parent_of(tag_path: &str) -> Option<&str> {
    tag_path.rfind(TAG_SEPARATOR).map(|idx| &tag_path[..idx])
}

/// Number of levels in a tag path. Zero for the empty string.
pub fn depth_of(tag_path: &str) -> usize {
    if tag_path.is_empty() {
        0
    } else {
        tag_path.split(TAG_SEPARATOR).count()
    }
}

/// Derived tag usage counts for a set of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagHierarchy {
    /// Expanded tag -> number of entries whose chain contains it.
    counts: BTreeMap<String, u64>,
    /// Leaf tag strings exactly as stored, first-seen order.
    leaves: IndexSet<String>,
}

impl TagHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the hierarchy by replaying every entry in order.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut hierarchy = TagHierarchy::new();
        for entry in entries {
            hierarchy.ingest(entry);
        }
        hierarchy
    }

    /// Counts one entry against every tag in its chain.
    pub fn ingest(&mut self, entry: &Entry) {
        self.leaves.insert(entry.tag_path.clone());
        for tag in expand(&entry.tag_path) {
            *self.counts.entry(tag).or_insert(0) += 1;
        }
    }

    /// Every expanded tag with its usage count, in ascending lexical order.
    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    /// Usage count of a single tag; zero if the tag is unknown.
    pub fn usage_count(&self, tag_path: &str) -> u64 {
        self.counts.get(tag_path).copied().unwrap_or(0)
    }

    /// Raw leaf tags as they were stored, not expanded.
    pub fn distinct_leaf_tags(&self) -> impl Iterator<Item = &str> {
        self.leaves.iter().map(String::as_str)
    }

    pub fn contains(&self, tag_path: &str) -> bool {
        self.counts.contains_key(tag_path)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn entry(title: &str, tag: &str) -> Entry {
        Entry::new(title, tag, "", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn expand_builds_prefix_chain() {
        assert_eq!(expand("A/B/C"), vec!["A", "A/B", "A/B/C"]);
        assert_eq!(expand("FIN/RISK"), vec!["FIN", "FIN/RISK"]);
        assert_eq!(expand("SOLO"), vec!["SOLO"]);
    }

    #[test]
    fn expand_empty_is_noop() {
        assert!(expand("").is_empty());
    }

    #[test]
    fn expand_keeps_empty_segments() {
        assert_eq!(expand("A//B"), vec!["A", "A/", "A//B"]);
        assert_eq!(expand("/A"), vec!["", "/A"]);
    }

    #[test]
    fn parent_and_depth() {
        assert_eq!(parent_of("A/B/C"), Some("A/B"));
        assert_eq!(parent_of("A"), None);
        assert_eq!(parent_of("A//B"), Some("A/"));
        assert_eq!(depth_of("A/B/C"), 3);
        assert_eq!(depth_of("A"), 1);
        assert_eq!(depth_of(""), 0);
    }

    #[test]
    fn ingest_counts_every_level_once() {
        let mut h = TagHierarchy::new();
        h.ingest(&entry("x", "A/B/C"));
        assert_eq!(h.usage_count("A"), 1);
        assert_eq!(h.usage_count("A/B"), 1);
        assert_eq!(h.usage_count("A/B/C"), 1);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn shared_tag_counts_accumulate() {
        let entries = vec![entry("x", "FIN/RISK"), entry("y", "FIN/RISK"), entry("z", "FIN/MACRO")];
        let h = TagHierarchy::from_entries(&entries);
        assert_eq!(h.usage_count("FIN/RISK"), 2);
        assert_eq!(h.usage_count("FIN/MACRO"), 1);
        assert_eq!(h.usage_count("FIN"), 3);
        assert_eq!(h.usage_count("NOPE"), 0);
    }

    #[test]
    fn counts_are_lexically_ordered() {
        let entries = vec![entry("x", "Z/Y"), entry("y", "A"), entry("z", "M/N")];
        let h = TagHierarchy::from_entries(&entries);
        let keys: Vec<&str> = h.counts().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "M", "M/N", "Z", "Z/Y"]);
    }

    #[test]
    fn leaf_tags_are_raw_and_first_seen() {
        let entries = vec![
            entry("x", "Z/Y"),
            entry("y", "A"),
            entry("z", "Z/Y"),
            entry("w", "Finance"),
            entry("v", "FINANCE"),
        ];
        let h = TagHierarchy::from_entries(&entries);
        let leaves: Vec<&str> = h.distinct_leaf_tags().collect();
        assert_eq!(leaves, vec!["Z/Y", "A", "Finance", "FINANCE"]);
        assert!(!h.contains("Z/Y/"));
        assert!(h.contains("Z"));
    }

    #[test]
    fn case_variants_are_distinct_tags() {
        let entries = vec![entry("x", "Finance"), entry("y", "FINANCE")];
        let h = TagHierarchy::from_entries(&entries);
        assert_eq!(h.usage_count("Finance"), 1);
        assert_eq!(h.usage_count("FINANCE"), 1);
    }

    proptest! {
        #[test]
        fn expand_matches_segment_prefixes(segments in prop::collection::vec("[A-Za-z0-9_ ]{0,6}", 1..6)) {
            let path = segments.join("/");
            prop_assume!(!path.is_empty());
            let chain = expand(&path);
            prop_assert_eq!(chain.len(), segments.len());
            for (i, tag) in chain.iter().enumerate() {
                prop_assert_eq!(tag, &segments[..=i].join("/"));
            }
            prop_assert_eq!(chain.last().unwrap(), &path);
        }

        #[test]
        fn leaf_count_is_exact(n in 1usize..20) {
            let entries: Vec<Entry> = (0..n).map(|i| entry(&format!("t{}", i), "A/B")).collect();
            let h = TagHierarchy::from_entries(&entries);
            prop_assert_eq!(h.usage_count("A/B"), n as u64);
            prop_assert!(h.usage_count("A") >= n as u64);
        }
    }
}
