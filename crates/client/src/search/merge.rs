//! Conjunctive/disjunctive merging of sub-search results.
//!
//! A multi-field search runs one vendor sub-search per populated form
//! field and combines them under the caller's chosen set algebra. Results
//! are keyed by their stable storage key, so the same underlying record
//! found by two sub-searches collapses to one entry.

use crate::records::Keyed;
use std::collections::BTreeMap;

/// How multiple sub-search result sets combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Every criterion must match: intersect the sub-search results.
    Conjunctive,
    /// Any criterion may match: union the sub-search results.
    Disjunctive,
}

/// Merge one sub-search's results into the running result set.
///
/// `prior` is `None` before the first sub-search has run, as distinct from
/// a sub-search that ran and found nothing, which under conjunctive mode
/// collapses the whole result to empty. Disjunctive merging is an
/// idempotent union where the newer sub-search wins on a shared key;
/// conjunctive merging keeps the prior entries whose keys the new
/// sub-search also found. Either way the surviving key set does not
/// depend on the order the sub-searches ran in.
pub fn merge_results<R: Keyed>(
    mode: MergeMode, prior: Option<BTreeMap<String, R>>, new: Vec<R>,
) -> BTreeMap<String, R> {
    let mut new_map: BTreeMap<String, R> = new.into_iter().map(|r| (r.key(), r)).collect();

    match mode {
        MergeMode::Disjunctive => {
            let mut merged = prior.unwrap_or_default();
            merged.append(&mut new_map);
            merged
        }
        MergeMode::Conjunctive => match prior {
            None => new_map,
            Some(prior) => prior.into_iter().filter(|(key, _)| new_map.contains_key(key)).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        key: String,
        label: &'static str,
    }

    impl Item {
        fn new(key: &str, label: &'static str) -> Self {
            Self { key: key.to_string(), label }
        }
    }

    impl Keyed for Item {
        fn key(&self) -> String {
            self.key.clone()
        }
    }

    fn keys(map: &BTreeMap<String, Item>) -> BTreeSet<String> {
        map.keys().cloned().collect()
    }

    #[test]
    fn test_disjunctive_is_a_union() {
        let first = merge_results(
            MergeMode::Disjunctive,
            None,
            vec![Item::new("a", "first"), Item::new("b", "first")],
        );
        let merged = merge_results(
            MergeMode::Disjunctive,
            Some(first),
            vec![Item::new("b", "second"), Item::new("c", "second")],
        );

        assert_eq!(keys(&merged), ["a", "b", "c"].iter().map(|s| s.to_string()).collect());
        // The more recent sub-search wins on a shared key.
        assert_eq!(merged["b"].label, "second");
    }

    #[test]
    fn test_conjunctive_is_an_intersection() {
        let first = merge_results(
            MergeMode::Conjunctive,
            None,
            vec![Item::new("a", "first"), Item::new("b", "first")],
        );
        let merged = merge_results(
            MergeMode::Conjunctive,
            Some(first),
            vec![Item::new("b", "second"), Item::new("c", "second")],
        );

        assert_eq!(keys(&merged), ["b"].iter().map(|s| s.to_string()).collect());
        assert_eq!(merged["b"].label, "first");
    }

    #[test]
    fn test_conjunctive_empty_prior_seeds() {
        let merged = merge_results(MergeMode::Conjunctive, None, vec![Item::new("a", "only")]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_conjunctive_empty_subsearch_collapses() {
        let first = merge_results(MergeMode::Conjunctive, None, vec![Item::new("a", "first")]);
        let merged = merge_results(MergeMode::Conjunctive, Some(first), Vec::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_order_does_not_change_the_key_set() {
        let by_name = vec![Item::new("a", "name"), Item::new("b", "name")];
        let by_vin = vec![Item::new("b", "vin"), Item::new("c", "vin")];

        for mode in [MergeMode::Conjunctive, MergeMode::Disjunctive] {
            let forward = merge_results(
                mode,
                Some(merge_results(mode, None, by_name.clone())),
                by_vin.clone(),
            );
            let backward = merge_results(
                mode,
                Some(merge_results(mode, None, by_vin.clone())),
                by_name.clone(),
            );
            assert_eq!(keys(&forward), keys(&backward), "key set must be order-independent in {mode:?}");
        }
    }
}
