//! Declarative edits applied to source records before resolution.
//!
//! Some scripts encode their values in ways the resolver cannot follow (a
//! label looked up at runtime, a helper call building half of a description).
//! Callers describe the fix as a list of [`Patch`]es; applying them rewrites
//! the raw value text, which then resolves like any tokenized value.

use tracing::{debug, warn};

use crate::globals::{GLOBAL_PREFIX, GlobalTables};
use crate::helpers::{call_shape, split_args, split_top_level};
use crate::record::{CallInvocation, RecordTable};
use crate::resolver::CONCAT_OPERATOR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// Overwrite or add one raw value
    Set {
        object: String,
        key: String,
        value: String,
    },
    /// Copy a raw value to another key of the same object
    CopyKey {
        object: String,
        from: String,
        to: String,
    },
    /// Plain text replacement inside one value
    ReplaceText {
        object: String,
        key: String,
        from: String,
        to: String,
    },
    /// Replace `global.<label>` references with the quoted label text
    InlineLabels { object: String, key: String },
    /// Drop every concatenated part that is a call to `function`
    RemoveCalls {
        object: String,
        key: String,
        function: String,
    },
    /// Replace every concatenated call to `function` with its `arg`-th argument
    UnwrapCalls {
        object: String,
        key: String,
        function: String,
        arg: usize,
    },
    /// Set a value to the raw text of a global constant
    SetConstant {
        object: String,
        key: String,
        constant: String,
    },
    /// Record an extra call on an object
    PushCall { object: String, call: CallInvocation },
}

impl Patch {
    pub fn object(&self) -> &str {
        match self {
            Self::Set { object, .. }
            | Self::CopyKey { object, .. }
            | Self::ReplaceText { object, .. }
            | Self::InlineLabels { object, .. }
            | Self::RemoveCalls { object, .. }
            | Self::UnwrapCalls { object, .. }
            | Self::SetConstant { object, .. }
            | Self::PushCall { object, .. } => object,
        }
    }

    /// Apply to `records`. Returns `false` when there was nothing to patch.
    pub fn apply(&self, records: &mut RecordTable, globals: &GlobalTables) -> bool {
        let record = records.record_mut(self.object());

        match self {
            Self::Set { key, value, .. } => {
                record.values.insert(key.clone(), value.clone());
                true
            },
            Self::CopyKey { from, to, .. } => match record.values.get(from).cloned() {
                Some(value) => {
                    record.values.insert(to.clone(), value);
                    true
                },
                None => false,
            },
            Self::ReplaceText { key, from, to, .. } => {
                edit_value(record.values.get_mut(key), |v| v.replace(from.as_str(), to))
            },
            Self::InlineLabels { key, .. } => {
                edit_value(record.values.get_mut(key), |v| inline_labels(v, globals))
            },
            Self::RemoveCalls { key, function, .. } => {
                edit_value(record.values.get_mut(key), |v| remove_calls(v, function))
            },
            Self::UnwrapCalls {
                key, function, arg, ..
            } => edit_value(record.values.get_mut(key), |v| unwrap_calls(v, function, *arg)),
            Self::SetConstant { key, constant, .. } => match globals.constant(constant) {
                Some(value) => {
                    record.values.insert(key.clone(), value.to_string());
                    true
                },
                None => {
                    warn!(constant = constant.as_str(), "unknown global constant, patch skipped");
                    false
                },
            },
            Self::PushCall { call, .. } => {
                record.calls.push(call.clone());
                true
            },
        }
    }
}

fn edit_value(value: Option<&mut String>, edit: impl FnOnce(&str) -> String) -> bool {
    match value {
        Some(value) => {
            *value = edit(value);
            true
        },
        None => false,
    }
}

/// Apply patches in order. Returns how many changed something.
pub fn apply_patches(records: &mut RecordTable, patches: &[Patch], globals: &GlobalTables) -> usize {
    let mut applied = 0;
    for patch in patches {
        if patch.apply(records, globals) {
            applied += 1;
        } else {
            debug!(object = patch.object(), ?patch, "patch had no target");
        }
    }
    applied
}

/// Replace `global.<key>` with `"<label>"` for every known label key.
pub fn inline_labels(text: &str, globals: &GlobalTables) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(GLOBAL_PREFIX) {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);

        let after = &tail[GLOBAL_PREFIX.len()..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let standalone = !head
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');

        match globals.label(&after[..name_len]) {
            Some(label) if standalone && name_len > 0 => {
                out.push('"');
                out.push_str(label);
                out.push('"');
            },
            _ => out.push_str(&tail[..GLOBAL_PREFIX.len() + name_len]),
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}

/// Drop concatenated parts that call `function`.
pub fn remove_calls(text: &str, function: &str) -> String {
    split_top_level(text, CONCAT_OPERATOR)
        .into_iter()
        .map(str::trim)
        .filter(|part| call_shape(part).is_none_or(|(name, _)| name != function))
        .collect::<Vec<_>>()
        .join(CONCAT_OPERATOR)
}

/// Replace concatenated calls to `function` with their `arg`-th argument.
pub fn unwrap_calls(text: &str, function: &str, arg: usize) -> String {
    split_top_level(text, CONCAT_OPERATOR)
        .into_iter()
        .map(|part| {
            let part = part.trim();
            match call_shape(part) {
                Some((name, inner)) if name == function => {
                    split_args(inner).into_iter().nth(arg).unwrap_or_default()
                },
                _ => part.to_string(),
            }
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(CONCAT_OPERATOR)
}
