//! Majority-vote fallback over every `channelId` in a parsed tree.
//!
//! The page graph repeats the owning channel's id far more often than ids of
//! channels it merely links to, so the most frequent valid id wins.

use std::collections::HashMap;

use serde_json::Value;
use ytextract_shared::ChannelId;

const CHANNEL_ID_KEY: &str = "channelId";

/// Collect every valid string found under a `channelId` key, depth-first in
/// document order.
///
/// A member is checked when it is popped, so an id nested under an earlier
/// sibling is collected before a `channelId` that follows it. Uses an explicit
/// stack so deeply nested documents cannot overflow the call stack.
pub(crate) fn collect_channel_ids(root: &Value) -> Vec<&str> {
    let mut found = Vec::new();
    let mut stack: Vec<(Option<&str>, &Value)> = vec![(None, root)];

    while let Some((key, node)) = stack.pop() {
        if key == Some(CHANNEL_ID_KEY) {
            if let Some(id) = node.as_str().filter(|id| ChannelId::is_valid(id)) {
                found.push(id);
            }
        }

        // Reverse so the first child is visited first.
        match node {
            Value::Object(map) => {
                stack.extend(map.iter().rev().map(|(k, v)| (Some(k.as_str()), v)));
            }
            Value::Array(items) => stack.extend(items.iter().rev().map(|v| (None, v))),
            _ => {}
        }
    }

    found
}

/// Most frequent id; ties go to the id seen first.
pub(crate) fn most_frequent<'a>(ids: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&'a str> = Vec::new();

    for &id in ids {
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            order.push(id);
        }
        *count += 1;
    }

    let mut best: Option<(&'a str, usize)> = None;
    for id in order {
        let count = counts[id];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((id, count));
        }
    }
    best.map(|(id, _)| id)
}

/// Run the full fallback: collect, then vote.
pub(crate) fn majority_channel_id(root: &Value) -> Option<ChannelId> {
    let ids = collect_channel_ids(root);
    let winner = most_frequent(&ids)?;
    ChannelId::parse(winner).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const X: &str = "UCXXXXXXXXXXXXXXXXXXXXXX";
    const Y: &str = "UCYYYYYYYYYYYYYYYYYYYYYY";
    const Z: &str = "UCZZZZZZZZZZZZZZZZZZZZZZ";

    #[test]
    fn collects_in_document_order() {
        let tree = json!({
            "channelId": X,
            "items": [
                { "channelId": Y, "nested": { "channelId": Z } },
                { "channelId": "not-valid" },
                { "other": { "channelId": 42 } }
            ],
            "tail": { "channelId": Y }
        });
        assert_eq!(collect_channel_ids(&tree), vec![X, Y, Z, Y]);
    }

    #[test]
    fn nested_id_under_earlier_sibling_comes_first() {
        let tree = json!({ "a": { "channelId": Y }, "channelId": X });
        assert_eq!(collect_channel_ids(&tree), vec![Y, X]);
        assert_eq!(majority_channel_id(&tree).unwrap().as_str(), Y);
    }

    #[test]
    fn ignores_non_channel_keys() {
        let tree = json!({ "externalId": X, "browseId": X, "list": [X] });
        assert!(collect_channel_ids(&tree).is_empty());
    }

    #[test]
    fn most_frequent_wins() {
        assert_eq!(most_frequent(&[X, Y, Y, Z, Y]), Some(Y));
    }

    #[test]
    fn ties_go_to_first_seen() {
        assert_eq!(most_frequent(&[Z, X, X, Z]), Some(Z));
        assert_eq!(most_frequent(&[X, Z, Z, X]), Some(X));
    }

    #[test]
    fn empty_has_no_winner() {
        assert_eq!(most_frequent(&[]), None);
        assert_eq!(majority_channel_id(&json!({ "a": [1, 2, 3] })), None);
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let mut tree = json!({ "channelId": X });
        for _ in 0..10_000 {
            tree = json!({ "child": [tree] });
        }
        assert_eq!(majority_channel_id(&tree).unwrap().as_str(), X);
        // Dropping a 10k-deep Value recurses; forget it instead.
        std::mem::forget(tree);
    }
}
