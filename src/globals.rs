//! Game-wide tables mined from well-known scripts.
//!
//! These are not part of attribute resolution. They feed the patch layer,
//! which rewrites record values that refer to globals before resolution runs.

use std::collections::HashMap;

use crate::helpers::{is_identifier, split_args, unquote};

/// Call registering a localised label: `localization_functionText_add("key", "text")`
pub const LABEL_FUNCTION: &str = "localization_functionText_add";
/// Prefix of global variable assignments: `global.defaultLifespan = 5;`
pub const GLOBAL_PREFIX: &str = "global.";
/// Variable holding the human-readable game version
pub const VERSION_VARIABLE: &str = "manualVersionNumber";

/// Global labels and constants, passed explicitly to whoever needs them.
#[derive(Debug, Clone, Default)]
pub struct GlobalTables {
    /// Label key -> display text
    pub labels: HashMap<String, String>,
    /// Global variable name -> raw value text
    pub constants: HashMap<String, String>,
}

impl GlobalTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn constant(&self, name: &str) -> Option<&str> {
        self.constants.get(name).map(String::as_str)
    }
}

/// Collect every `function("key", "label")` call in `text`, at any nesting.
pub fn extract_labels(text: &str, function: &str) -> HashMap<String, String> {
    let mut labels = HashMap::new();

    for line in text.lines() {
        for inner in call_arguments(line, function) {
            let args = split_args(inner);
            if let [key, label, ..] = args.as_slice()
                && let Some(key) = unquote(key)
                && let Some(label) = unquote(label)
            {
                labels.insert(key.to_string(), label.to_string());
            }
        }
    }

    labels
}

/// Collect `global.name = value;` assignments.
pub fn extract_constants(text: &str, prefix: &str) -> HashMap<String, String> {
    let mut constants = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(prefix) else {
            continue;
        };
        let Some((name, value)) = rest.split_once(" = ") else {
            continue;
        };
        let Some(value) = value.trim_end().strip_suffix(';') else {
            continue;
        };
        if is_identifier(name) && !value.trim().is_empty() {
            constants.insert(name.to_string(), value.trim().to_string());
        }
    }

    constants
}

/// Text of the first `name = "..."` assignment, `global.name` included.
pub fn find_string_assignment(text: &str, name: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let line = line.trim();
        let line = line.strip_prefix("var ").unwrap_or(line);
        let (target, value) = line.split_once(" = ")?;
        let target = target.trim();
        let named = target == name
            || target
                .strip_suffix(name)
                .is_some_and(|head| head.ends_with('.'));
        if !named {
            return None;
        }
        let value = value.trim_end();
        let value = value.strip_suffix(';').unwrap_or(value);
        unquote(value).map(str::to_string)
    })
}

pub fn game_version(text: &str) -> Option<String> {
    find_string_assignment(text, VERSION_VARIABLE)
}

/// Walk `function <name>` blocks and keep, per function, the first line
/// `matcher` accepts.
///
/// Many game scripts are a flat list of functions with one interesting line
/// each; this collects that line's payload keyed by function name. When
/// `fn_names` is given, other functions are skipped.
pub fn matches_in_functions<T, F>(
    text: &str,
    fn_names: Option<&[&str]>,
    mut matcher: F,
) -> HashMap<String, T>
where
    F: FnMut(&str) -> Option<T>,
{
    let mut found = HashMap::new();
    let mut current: Option<&str> = None;

    for line in text.lines() {
        match current {
            None => {
                current = function_header(line)
                    .filter(|name| fn_names.is_none_or(|names| names.contains(name)));
            },
            Some(name) => {
                if let Some(value) = matcher(line) {
                    found.insert(name.to_string(), value);
                    current = None;
                }
            },
        }
    }

    found
}

/// `function foo(...)` -> `foo`
fn function_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("function ")?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

/// Argument text of every `function(...)` call appearing in `line`.
fn call_arguments<'a>(line: &'a str, function: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut search_from = 0;

    while let Some(offset) = line[search_from..].find(function) {
        let start = search_from + offset;
        let open = start + function.len();
        search_from = open;

        let preceded_by_ident = line[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if preceded_by_ident || !line[open..].starts_with('(') {
            continue;
        }

        if let Some(close) = matching_paren(line, open) {
            found.push(&line[open + 1..close]);
            search_from = close + 1;
        }
    }

    found
}

/// Byte index of the `)` closing the `(` at `open`, skipping quoted text.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut i = open;

    while i < bytes.len() {
        match (in_string, bytes[i]) {
            (true, b'\\') => i += 1,
            (_, b'"') => in_string = !in_string,
            (false, b'(') => depth += 1,
            (false, b')') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            },
            _ => {},
        }
        i += 1;
    }

    None
}
