//! Dot-addressed field locations in the configuration tree.

use serde_json::{Map, Value};
use std::fmt;

/// Location of a field in the configuration tree, e.g. `pakager.mac.icon`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// The root of the tree (empty path).
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parses a dot-separated path.
    pub fn parse(path: &str) -> Self {
        Self(path.trim_matches('.').to_string())
    }

    /// Returns the path of a child field.
    pub fn join(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// Last segment, or `""` for the root.
    pub fn key(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Looks up the value at `path`, treating JSON `null` as absent.
pub(crate) fn lookup<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() { None } else { Some(current) }
}

/// Writes `value` at `path`, creating intermediate mappings.
pub(crate) fn insert(root: &mut Value, path: &FieldPath, value: Value) {
    if path.is_root() {
        *root = value;
        return;
    }
    let segments: Vec<&str> = path.segments().collect();
    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = root;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };
        current = map
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        map.insert((*last).to_string(), value);
    }
}

/// Removes the value at `path` if its parent mapping exists.
pub(crate) fn remove(root: &mut Value, path: &FieldPath) {
    let segments: Vec<&str> = path.segments().collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        match current.as_object_mut().and_then(|map| map.get_mut(*segment)) {
            Some(next) => current = next,
            None => return,
        }
    }
    if let Some(map) = current.as_object_mut() {
        map.remove(*last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_and_segments() {
        let path = FieldPath::root().join("pakager").join("mac").join("icon");
        assert_eq!(path.as_str(), "pakager.mac.icon");
        assert_eq!(path.key(), "icon");
        assert_eq!(path.segments().count(), 3);
        assert_eq!(FieldPath::root().to_string(), "<root>");
    }

    #[test]
    fn lookup_treats_null_as_absent() {
        let tree = json!({ "pakager": { "mac": { "icon": null, "binary": "bin" } } });
        assert!(lookup(&tree, &"pakager.mac.icon".into()).is_none());
        assert_eq!(
            lookup(&tree, &"pakager.mac.binary".into()),
            Some(&json!("bin"))
        );
        assert!(lookup(&tree, &"pakager.missing.deep".into()).is_none());
    }

    #[test]
    fn insert_creates_intermediate_maps() {
        let mut tree = json!({});
        insert(&mut tree, &"pakager.mac.formats".into(), json!(["app"]));
        assert_eq!(tree, json!({ "pakager": { "mac": { "formats": ["app"] } } }));

        remove(&mut tree, &"pakager.mac.formats".into());
        assert_eq!(tree, json!({ "pakager": { "mac": {} } }));
    }
}
