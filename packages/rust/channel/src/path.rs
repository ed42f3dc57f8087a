//! Safe navigation through a parsed JSON tree by a fixed key/index path.

use serde_json::Value;

/// One step of a [`Path`]: an object member or an array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

/// An ordered sequence of segments.
pub type Path<'a> = [PathSegment<'a>];

impl<'a> From<&'a str> for PathSegment<'a> {
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Return the node at `path`, or `None` if any step does not apply.
///
/// A missing key, an out-of-range index, a key applied to an array, an index
/// applied to an object, or any step past a scalar all yield `None`.
pub fn get_path<'v>(root: &'v Value, path: &Path<'_>) -> Option<&'v Value> {
    path.iter().try_fold(root, |node, segment| match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(*key),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        _ => None,
    })
}

/// Like [`get_path`], but only a final string node counts as present.
pub fn get_str_path<'v>(root: &'v Value, path: &Path<'_>) -> Option<&'v str> {
    get_path(root, path).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use super::PathSegment::{Index, Key};

    fn tree() -> Value {
        json!({
            "header": {
                "renderer": { "channelId": "UCuAXFkgsw1L7xaCfnd5JJOw", "count": 3 }
            },
            "rows": [ { "actions": [ { "id": "first" } ] }, null ],
            "flag": true
        })
    }

    #[test]
    fn resolves_object_and_array_steps() {
        let root = tree();
        assert_eq!(
            get_str_path(&root, &[Key("header"), Key("renderer"), Key("channelId")]),
            Some("UCuAXFkgsw1L7xaCfnd5JJOw")
        );
        assert_eq!(
            get_str_path(
                &root,
                &[Key("rows"), Index(0), Key("actions"), Index(0), Key("id")]
            ),
            Some("first")
        );
    }

    #[test]
    fn empty_path_is_root() {
        let root = tree();
        assert_eq!(get_path(&root, &[]), Some(&root));
    }

    #[test]
    fn inapplicable_steps_are_absent() {
        let root = tree();
        // missing key
        assert_eq!(get_path(&root, &[Key("metadata")]), None);
        // index out of range
        assert_eq!(get_path(&root, &[Key("rows"), Index(5)]), None);
        // key applied to an array
        assert_eq!(get_path(&root, &[Key("rows"), Key("0")]), None);
        // index applied to an object
        assert_eq!(get_path(&root, &[Key("header"), Index(0)]), None);
        // continuing past a scalar or null
        assert_eq!(get_path(&root, &[Key("flag"), Key("x")]), None);
        assert_eq!(get_path(&root, &[Key("rows"), Index(1), Key("x")]), None);
    }

    #[test]
    fn str_path_narrows_type() {
        let root = tree();
        let count = [Key("header"), Key("renderer"), Key("count")];
        assert!(get_path(&root, &count).is_some());
        assert_eq!(get_str_path(&root, &count), None);
    }

    #[test]
    fn segments_convert_from_literals() {
        let path: Vec<PathSegment> = vec!["a".into(), 2usize.into()];
        assert_eq!(path, vec![Key("a"), Index(2)]);
    }
}
