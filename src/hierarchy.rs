//! Object inheritance chains.
//!
//! The exporter gives every object its direct parent. Attribute lookups need
//! the full chain, nearest first:
//!
//! ```text
//! oWPLaserBurst -> oWPLaser -> oWeapon
//! ```
//!
//! The walk stops at the "no parent" marker and at the universal root object,
//! which carries nothing worth resolving.

use std::collections::{HashMap, HashSet};

use tracing::warn;

/// Parent marker used by the exporter for objects without a parent.
pub const NO_PARENT: &str = "__NONE__";
/// Root type every persistent object derives from.
pub const UNIVERSAL_ROOT: &str = "oSaveObject";

/// Object id -> parent object id, plus the ids that end a chain.
#[derive(Debug, Clone)]
pub struct ParentMap {
    parents: HashMap<String, String>,
    terminators: HashSet<String>,
}

impl Default for ParentMap {
    fn default() -> Self {
        Self::with_terminators([NO_PARENT, UNIVERSAL_ROOT])
    }
}

impl ParentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terminators<I, S>(terminators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parents: HashMap::new(),
            terminators: terminators.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, object_id: impl Into<String>, parent_id: impl Into<String>) {
        self.parents.insert(object_id.into(), parent_id.into());
    }

    /// Raw parent entry, sentinels included
    pub fn parent(&self, object_id: &str) -> Option<&str> {
        self.parents.get(object_id).map(String::as_str)
    }

    pub fn contains(&self, object_id: &str) -> bool {
        self.parents.contains_key(object_id)
    }

    pub fn object_ids(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }

    pub fn is_terminator(&self, object_id: &str) -> bool {
        object_id.is_empty() || self.terminators.contains(object_id)
    }

    /// Ordered ancestor chain of `object_id`, self first. Never empty.
    pub fn hierarchy(&self, object_id: &str) -> Vec<String> {
        let mut chain = vec![object_id.to_string()];
        let mut seen = HashSet::from([object_id]);
        let mut current = object_id;

        while let Some(parent) = self.parent(current) {
            if self.is_terminator(parent) {
                break;
            }
            // Parent maps are expected to be acyclic
            if !seen.insert(parent) {
                warn!(object = object_id, parent_id = parent, "inheritance cycle, truncating chain");
                break;
            }
            chain.push(parent.to_string());
            current = parent;
        }

        chain
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParentMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        for (object_id, parent_id) in iter {
            map.insert(object_id, parent_id);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapons() -> ParentMap {
        ParentMap::from_iter([
            ("oWPLaserBurst", "oWPLaser"),
            ("oWPLaser", "oWeapon"),
            ("oWeapon", "oSaveObject"),
            ("oSaveObject", NO_PARENT),
            ("oLoose", NO_PARENT),
        ])
    }

    #[test]
    fn test_hierarchy_stops_at_root_type() {
        assert_eq!(
            weapons().hierarchy("oWPLaserBurst"),
            vec!["oWPLaserBurst", "oWPLaser", "oWeapon"]
        );
    }

    #[test]
    fn test_hierarchy_without_parent() {
        assert_eq!(weapons().hierarchy("oLoose"), vec!["oLoose"]);
    }

    #[test]
    fn test_hierarchy_of_unknown_object_is_self() {
        assert_eq!(weapons().hierarchy("oUnknown"), vec!["oUnknown"]);
    }

    #[test]
    fn test_hierarchy_stops_at_empty_parent() {
        let map = ParentMap::from_iter([("oA", "")]);
        assert_eq!(map.hierarchy("oA"), vec!["oA"]);
    }

    #[test]
    fn test_custom_terminators() {
        let mut map = ParentMap::with_terminators(["oWeapon"]);
        map.insert("oWPLaser", "oWeapon");
        assert_eq!(map.hierarchy("oWPLaser"), vec!["oWPLaser"]);
    }

    #[test]
    fn test_cycle_is_truncated() {
        let map = ParentMap::from_iter([("oA", "oB"), ("oB", "oA")]);
        assert_eq!(map.hierarchy("oA"), vec!["oA", "oB"]);
    }
}
