//! Line-based extraction of root-scope statements from one object script.
//!
//! Only two statement shapes are recognised, and only when they start in
//! column zero:
//!
//! - `name(args)`, recorded as a [`CallInvocation`]
//! - `name = value` or `name[3] = value`, recorded as an assignment
//!
//! Indented lines belong to nested scopes and are skipped. A bare `return`
//! at root scope ends the script. Everything else is dropped without error.

use tracing::trace;

use crate::helpers::{call_shape, is_identifier, is_key_path, split_args};
use crate::record::{CallInvocation, SourceRecord};

/// Build the source record for one script.
pub fn tokenize(text: &str) -> SourceRecord {
    let mut record = SourceRecord::new();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim_end();
        if line.is_empty() || line.starts_with(char::is_whitespace) {
            continue;
        }

        let line = line.strip_prefix("var ").unwrap_or(line);
        let line = line.strip_suffix(';').unwrap_or(line).trim_end();

        if line == "return" {
            trace!(line = line_no + 1, "root-scope return, ignoring rest of script");
            break;
        }

        if let Some(call) = parse_call(line) {
            record.calls.push(call);
        } else if let Some((key, value)) = parse_assignment(line) {
            record.values.insert(key, value.to_string());
        }
    }

    record
}

/// `name(args)` with nothing else on the line
fn parse_call(line: &str) -> Option<CallInvocation> {
    let (name, inner) = call_shape(line)?;
    Some(CallInvocation::new(name, split_args(inner)))
}

/// `name = value` or `name[index] = value`
fn parse_assignment(line: &str) -> Option<(String, &str)> {
    let (target, value) = line.split_once(" = ")?;
    let target = target.trim_end();
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some((name, index)) = parse_indexed_target(target) {
        return Some((format!("{name}:{index}"), value));
    }

    is_key_path(target).then(|| (target.to_string(), value))
}

/// `name[3]` -> `("name", 3)`
fn parse_indexed_target(target: &str) -> Option<(&str, usize)> {
    let (name, index) = target.strip_suffix(']')?.split_once('[')?;
    if !is_identifier(name) || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok().map(|index| (name, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_assignments() {
        let record = tokenize("name = \"Laser\"\nvar buyPrice = 40;\nchargeTime = 6 * room_speed;\n");

        assert_eq!(record.get("name"), Some("\"Laser\""));
        assert_eq!(record.get("buyPrice"), Some("40"));
        assert_eq!(record.get("chargeTime"), Some("6 * room_speed"));
        assert!(record.calls.is_empty());
    }

    #[test]
    fn test_indexed_assignment() {
        let record = tokenize("hp[2] = 5\nhp[02] = 7");
        assert_eq!(record.get("hp:2"), Some("7"));
        assert_eq!(record.values.len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let record = tokenize("a = 1\na = 2\n");
        assert_eq!(record.get("a"), Some("2"));
    }

    #[test]
    fn test_indented_lines_are_skipped() {
        let record = tokenize("    a = 1\n\tfoo(1)\n  b = 2;\n");
        assert!(record.values.is_empty());
        assert!(record.calls.is_empty());
    }

    #[test]
    fn test_return_stops_tokenizing() {
        let record = tokenize("a = 1\nreturn;\nb = 2\nfoo(3)\n");
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("b"), None);
        assert!(record.calls.is_empty());
    }

    #[test]
    fn test_indented_return_does_not_stop() {
        let record = tokenize("if (x)\n{\n    return;\n}\nb = 2\n");
        assert_eq!(record.get("b"), Some("2"));
    }

    #[test]
    fn test_call_with_nested_args() {
        let record = tokenize("x(1, foo(2, 3), \"a,b\")\n");
        assert_eq!(record.calls.len(), 1);
        assert_eq!(record.calls[0].name, "x");
        assert_eq!(record.calls[0].args, vec!["1", "foo(2, 3)", "\"a,b\""]);
    }

    #[test]
    fn test_call_without_args() {
        let record = tokenize("event_inherited();\n");
        assert_eq!(record.calls, vec![CallInvocation::new("event_inherited", vec![])]);
    }

    #[test]
    fn test_call_is_not_an_assignment() {
        let record = tokenize("ds_map_add(m, \"a = b\")\n");
        assert!(record.values.is_empty());
        assert_eq!(record.calls.len(), 1);
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let record = tokenize("if (a == 1) b = 2\n}\nfoo(1) + bar(2)\nx =\n= 3\n");
        assert!(record.values.is_empty());
        assert!(record.calls.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let record = tokenize("a = 1;\r\nb = \"x\";\r\n");
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("b"), Some("\"x\""));
    }
}
