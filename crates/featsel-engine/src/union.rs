//! Union of the feature lists selected under each framing.

use std::collections::HashSet;

use crate::sweep::SelectedFeatureSet;

/// Deduplicated union of several token lists.
///
/// Order is first appearance: all of the first list, then the tokens of the
/// second list not already seen, and so on.
pub fn union_tokens<I, L, S>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut union = Vec::new();
    for list in lists {
        for token in list {
            let token = token.as_ref();
            if seen.insert(token.to_string()) {
                union.push(token.to_string());
            }
        }
    }
    union
}

/// Union of the features of several selections, in the order given.
pub fn union_features(selections: &[SelectedFeatureSet]) -> Vec<String> {
    union_tokens(selections.iter().map(|s| s.tokens()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Distribution;
    use crate::sweep::{OperatingPoint, SelectedFeature};
    use featsel_core::{CorpusFingerprint, FramingKind};

    fn selection(framing: FramingKind, tokens: &[&str]) -> SelectedFeatureSet {
        SelectedFeatureSet {
            framing,
            fingerprint: CorpusFingerprint("f".to_string()),
            operating_point: OperatingPoint {
                k: 10,
                support_pct: 1.0,
            },
            labels: vec![],
            reference: Distribution {
                frequencies: vec![],
            },
            features: tokens
                .iter()
                .map(|t| SelectedFeature {
                    token: t.to_string(),
                    distance: 0.5,
                    document_frequency: 1,
                    distribution: Distribution {
                        frequencies: vec![],
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn overlapping_selections() {
        let union = union_features(&[
            selection(FramingKind::Categorical, &["a", "b", "c"]),
            selection(FramingKind::Continuous, &["b", "c", "d"]),
        ]);
        assert_eq!(union, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn union_covers_every_input_exactly_once() {
        let lists: Vec<Vec<&str>> = vec![vec!["x", "y"], vec!["y", "z", "x"], vec![], vec!["w"]];
        let union = union_tokens(lists.clone());

        let distinct: HashSet<&str> = lists.iter().flatten().copied().collect();
        assert_eq!(union.len(), distinct.len());
        for token in distinct {
            assert_eq!(union.iter().filter(|u| *u == token).count(), 1);
        }
    }

    #[test]
    fn order_follows_list_priority() {
        assert_eq!(union_tokens([["b", "a"], ["a", "c"]]), vec!["b", "a", "c"]);
        assert_eq!(union_tokens([["a", "c"], ["b", "a"]]), vec!["a", "c", "b"]);
    }

    #[test]
    fn empty_inputs() {
        assert!(union_features(&[]).is_empty());
        let empty: Vec<Vec<String>> = vec![vec![], vec![]];
        assert!(union_tokens(empty).is_empty());
    }
}
