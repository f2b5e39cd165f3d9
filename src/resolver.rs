//! Attribute resolution over an object's inheritance chain.
//!
//! # Resolution order
//!
//! For `resolve_*(records, "cost", &["oChild", "oParent", "oBase"], None)`:
//! 1. The first object in the chain that assigns `cost` wins
//! 2. A literal value is coerced and returned
//! 3. Anything else is an alias: the value names another attribute, which is
//!    resolved against the chain starting at the object that held the alias
//!
//! Nothing here fails. Unknown keys, unknown objects and alias cycles all end
//! in `None`; string composition falls back to the raw token of any part it
//! cannot resolve.

use std::borrow::Cow;

use tracing::debug;

use crate::helpers::{call_shape, is_identifier, split_top_level, unquote};
use crate::record::RecordTable;
use crate::value::{Expr, Number, Value, ValueKind, strip_numeric_noise};

/// Alias hops allowed before a lookup is given up.
pub const MAX_ALIAS_DEPTH: usize = 32;
/// Key lookups allowed in one top-level resolution.
pub const MAX_ALIAS_STEPS: usize = 4096;

/// String concatenation operator in the scripts
pub const CONCAT_OPERATOR: &str = " + ";
/// The one formatting primitive understood inside string values
pub const FORMAT_FUNCTION: &str = "string";
pub const FORMAT_PLACEHOLDER: &str = "{0}";
/// Escaped line break as it appears in raw string literals
pub const LINE_BREAK: &str = "\\n";
/// What line breaks are collapsed into
pub const LINE_BREAK_SEPARATOR: &str = "; ";

/// Lookup key for `name`, index-qualified when `index` is given.
///
/// An existing `:suffix` on `name` is replaced: `("hp:1", Some(2))` -> `hp:2`.
pub fn attribute_key(name: &str, index: Option<usize>) -> Cow<'_, str> {
    match index {
        Some(index) => {
            let base = name.split_once(':').map_or(name, |(base, _)| base);
            Cow::Owned(format!("{base}:{index}"))
        },
        None => Cow::Borrowed(name),
    }
}

/// First non-empty raw value for `key`, with the chain position it came from.
fn chain_search<'r, S: AsRef<str>>(
    records: &'r RecordTable,
    key: &str,
    chain: &[S],
) -> Option<(usize, &'r str)> {
    chain.iter().enumerate().find_map(|(pos, object_id)| {
        records
            .value(object_id.as_ref(), key)
            .filter(|raw| !raw.is_empty())
            .map(|raw| (pos, raw))
    })
}

/// State of one top-level resolution, shared by every alias hop it makes.
///
/// A key is "in progress" while its own value is being evaluated; meeting it
/// again in the same chain suffix is a cycle and reads as absent. The step
/// count bounds total work for values that fan out into many parts.
struct Lookup<'r> {
    records: &'r RecordTable,
    in_progress: Vec<(usize, String)>,
    steps: usize,
}

impl<'r> Lookup<'r> {
    fn new(records: &'r RecordTable) -> Self {
        Self {
            records,
            in_progress: Vec::new(),
            steps: 0,
        }
    }

    /// Run `eval` with `key` marked in progress for a chain of `chain_len`.
    fn guarded<T>(
        &mut self,
        key: &str,
        chain_len: usize,
        depth: usize,
        eval: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        if depth > MAX_ALIAS_DEPTH {
            debug!(key, depth, "alias depth limit reached, treating as absent");
            return None;
        }
        if self.steps >= MAX_ALIAS_STEPS {
            debug!(key, steps = self.steps, "alias step limit reached, treating as absent");
            return None;
        }
        if self
            .in_progress
            .iter()
            .any(|(len, active)| *len == chain_len && active == key)
        {
            debug!(key, "alias cycle, treating as absent");
            return None;
        }

        self.steps += 1;
        self.in_progress.push((chain_len, key.to_string()));
        let result = eval(self);
        self.in_progress.pop();
        result
    }

    fn number_at<S: AsRef<str>>(&mut self, key: &str, chain: &[S], depth: usize) -> Option<Number> {
        let records = self.records;
        self.guarded(key, chain.len(), depth, |this| {
            let (pos, raw) = chain_search(records, key, chain)?;
            this.number_from_expr(raw, &chain[pos..], depth)
        })
    }

    /// Evaluate a raw numeric expression: a literal, or an alias looked up in `scope`.
    fn number_from_expr<S: AsRef<str>>(
        &mut self,
        raw: &str,
        scope: &[S],
        depth: usize,
    ) -> Option<Number> {
        let stripped = strip_numeric_noise(raw);
        match Expr::number(&stripped) {
            Expr::Literal(n) => Some(n),
            Expr::Alias(name) => self.number_at(name, scope, depth + 1),
        }
    }

    fn bool_at<S: AsRef<str>>(&mut self, key: &str, chain: &[S], depth: usize) -> Option<bool> {
        let records = self.records;
        self.guarded(key, chain.len(), depth, |this| {
            let (pos, raw) = chain_search(records, key, chain)?;
            match Expr::boolean(raw) {
                Expr::Literal(b) => Some(b),
                Expr::Alias(name) => this.bool_at(name, &chain[pos..], depth + 1),
            }
        })
    }

    fn string_at<S: AsRef<str>>(&mut self, key: &str, chain: &[S], depth: usize) -> Option<String> {
        let records = self.records;
        self.guarded(key, chain.len(), depth, |this| {
            let (pos, raw) = chain_search(records, key, chain)?;
            let scope = &chain[pos..];

            let mut out = String::new();
            for part in split_top_level(raw, CONCAT_OPERATOR) {
                let part = part.trim();
                match this.string_part(part, scope, depth) {
                    Some(text) => out.push_str(&text),
                    None => out.push_str(part),
                }
            }

            Some(clean_line_breaks(&out))
        })
    }

    fn string_part<S: AsRef<str>>(&mut self, part: &str, scope: &[S], depth: usize) -> Option<String> {
        if let Some(text) = unquote(part) {
            return Some(text.to_string());
        }
        if Number::parse(part).is_some() {
            return Some(part.to_string());
        }
        if let Some((function, inner)) = call_shape(part) {
            if function == FORMAT_FUNCTION {
                return self.format_call(inner, scope, depth);
            }
            // Unknown call, keep as written
            return Some(part.to_string());
        }
        self.string_at(part, scope, depth + 1)
    }

    /// `string("<template>", arg)` or `string(<numeric expression>)`
    fn format_call<S: AsRef<str>>(&mut self, inner: &str, scope: &[S], depth: usize) -> Option<String> {
        if let [template, arg] = split_top_level(inner, ",").as_slice()
            && let Some(template) = unquote(template.trim())
            && is_identifier(arg.trim())
        {
            let arg = arg.trim();
            let value = self
                .number_at(arg, scope, depth + 1)
                .map(|n| n.to_string())
                .or_else(|| self.string_at(arg, scope, depth + 1))?;
            return Some(template.replace(FORMAT_PLACEHOLDER, &value));
        }

        self.number_from_expr(inner, scope, depth).map(|n| n.to_string())
    }
}

/// The raw value text, unprocessed.
pub fn resolve_raw<'r, S: AsRef<str>>(
    records: &'r RecordTable,
    name: &str,
    chain: &[S],
    index: Option<usize>,
) -> Option<&'r str> {
    chain_search(records, &attribute_key(name, index), chain).map(|(_, raw)| raw)
}

/// Resolve an attribute as an integer or float.
pub fn resolve_number<S: AsRef<str>>(
    records: &RecordTable,
    name: &str,
    chain: &[S],
    index: Option<usize>,
) -> Option<Number> {
    Lookup::new(records).number_at(&attribute_key(name, index), chain, 0)
}

/// Resolve an attribute as a boolean.
pub fn resolve_bool<S: AsRef<str>>(
    records: &RecordTable,
    name: &str,
    chain: &[S],
    index: Option<usize>,
) -> Option<bool> {
    Lookup::new(records).bool_at(&attribute_key(name, index), chain, 0)
}

/// Resolve an attribute as display text, composing ` + ` concatenations.
///
/// `None` only when no object in the chain assigns the attribute.
pub fn resolve_string<S: AsRef<str>>(
    records: &RecordTable,
    name: &str,
    chain: &[S],
    index: Option<usize>,
) -> Option<String> {
    Lookup::new(records).string_at(&attribute_key(name, index), chain, 0)
}

/// Collapse escaped line breaks and quotes in composed text.
fn clean_line_breaks(text: &str) -> String {
    let text = text.strip_suffix(LINE_BREAK).unwrap_or(text);
    let double_break = LINE_BREAK.repeat(2);
    text.replace("\\\"", "\"")
        .replace(&double_break, LINE_BREAK_SEPARATOR)
        .replace(LINE_BREAK, LINE_BREAK_SEPARATOR)
}

/// Resolve with the coercion named by `kind`.
pub fn resolve<S: AsRef<str>>(
    records: &RecordTable,
    kind: ValueKind,
    name: &str,
    chain: &[S],
    index: Option<usize>,
) -> Option<Value> {
    match kind {
        ValueKind::Raw => resolve_raw(records, name, chain, index).map(|raw| Value::Str(raw.to_string())),
        ValueKind::Number => resolve_number(records, name, chain, index).map(Value::from),
        ValueKind::Bool => resolve_bool(records, name, chain, index).map(Value::Bool),
        ValueKind::Str => resolve_string(records, name, chain, index).map(Value::Str),
    }
}
