//! Source records for mined object scripts.
//!
//! A script is reduced to two things: the root-scope assignments it performs
//! (`name = value`, `name[3] = value`) and the root-scope calls it makes.
//! Values are kept as raw text; coercion happens later in the resolver.
//!
//! # Keys
//!
//! - `baseMaxHP = 40` is stored under `baseMaxHP`
//! - `slotType[2] = 1` is stored under `slotType:2`

use std::collections::HashMap;
use std::fmt::Write as _;

/// One recorded call statement, e.g. `effect_add(oEFFire, 3)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInvocation {
    pub name: String,
    /// Trimmed raw argument text; nested calls are kept whole.
    pub args: Vec<String>,
}

impl CallInvocation {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Tokenizer output for one object's script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRecord {
    /// Attribute key -> raw value expression
    pub values: HashMap<String, String>,
    /// Calls in source order
    pub calls: Vec<CallInvocation>,
}

impl SourceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.calls.is_empty()
    }

    /// Re-serialize the assignments as `key = value;` lines, sorted by key.
    ///
    /// The terminator is always written so a value that itself ends in `;`
    /// keeps it when tokenized again.
    pub fn to_script(&self) -> String {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();

        let mut out = String::new();
        for key in keys {
            let _ = writeln!(out, "{} = {};", key, self.values[key]);
        }
        out
    }
}

/// All source records of a run, keyed by object id.
///
/// Built once before resolution starts. An id without an entry behaves like
/// an object with an empty script.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: HashMap<String, SourceRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object_id: impl Into<String>, record: SourceRecord) {
        self.records.insert(object_id.into(), record);
    }

    pub fn get(&self, object_id: &str) -> Option<&SourceRecord> {
        self.records.get(object_id)
    }

    /// Raw value of `key` on one object, no hierarchy walk
    pub fn value(&self, object_id: &str, key: &str) -> Option<&str> {
        self.records.get(object_id).and_then(|r| r.get(key))
    }

    /// Mutable access for the patch layer. Creates an empty record if needed.
    pub fn record_mut(&mut self, object_id: &str) -> &mut SourceRecord {
        self.records.entry(object_id.to_string()).or_default()
    }

    pub fn contains(&self, object_id: &str) -> bool {
        self.records.contains_key(object_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceRecord)> {
        self.records.iter().map(|(id, r)| (id.as_str(), r))
    }
}

impl FromIterator<(String, SourceRecord)> for RecordTable {
    fn from_iter<T: IntoIterator<Item = (String, SourceRecord)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_script_is_sorted() {
        let mut record = SourceRecord::new();
        record.values.insert("b".to_string(), "2".to_string());
        record.values.insert("a".to_string(), "\"x\"".to_string());

        assert_eq!(record.to_script(), "a = \"x\";\nb = 2;\n");
    }

    #[test]
    fn test_missing_object_has_no_values() {
        let table = RecordTable::new();
        assert_eq!(table.value("oNothing", "name"), None);
        assert!(table.get("oNothing").is_none());
    }

    #[test]
    fn test_record_mut_creates_record() {
        let mut table = RecordTable::new();
        table
            .record_mut("oCrew")
            .values
            .insert("name".to_string(), "\"Bob\"".to_string());

        assert!(table.contains("oCrew"));
        assert_eq!(table.value("oCrew", "name"), Some("\"Bob\""));
    }
}
