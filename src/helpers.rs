//! Small lexical helpers shared by the tokenizer, resolver and globals scan.
//!
//! None of these understand the full script grammar. They only track double
//! quoted strings (with `\"` escapes) and parenthesis depth, which is enough to
//! keep nested calls and string literals in one piece.

/// Split `text` on every top-level occurrence of `delimiter`.
///
/// Occurrences inside a quoted string or inside parentheses do not split.
pub fn split_top_level<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    let bytes = text.as_bytes();
    let delim = delimiter.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {},
            }
            i += 1;
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if depth == 0 && !delim.is_empty() && bytes[i..].starts_with(delim) => {
                parts.push(&text[start..i]);
                i += delim.len();
                start = i;
                continue;
            },
            _ => {},
        }
        i += 1;
    }

    parts.push(&text[start..]);
    parts
}

/// Split a call's argument list on top-level commas and trim each argument.
pub fn split_args(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    split_top_level(inner, ",")
        .into_iter()
        .map(|arg| arg.trim().to_string())
        .collect()
}

/// Match `name(inner)` where the parenthesis opened after `name` is closed by
/// the last character of `text`. Returns `(name, inner)`.
pub fn call_shape(text: &str) -> Option<(&str, &str)> {
    let open = text.find('(')?;
    let name = &text[..open];
    if !is_identifier(name) || !text.ends_with(')') {
        return None;
    }

    let close = text.len() - 1;
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {},
            }
        } else {
            match b {
                b'"' => in_string = true,
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return (i == close).then_some((name, &text[open + 1..close]));
                    }
                },
                _ => {},
            }
        }
        i += 1;
    }

    None
}

/// `[A-Za-z0-9_]+`
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Identifier, possibly dotted or index-qualified (`global.foo`, `hp:2`).
pub fn is_key_path(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b':'))
}

/// Strip one pair of surrounding double quotes.
pub fn unquote(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// `-?\d+`
pub fn is_int_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `-?\d+\.\d+`
pub fn is_float_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.split_once('.').is_some_and(|(whole, frac)| {
        !whole.is_empty()
            && !frac.is_empty()
            && whole.bytes().all(|b| b.is_ascii_digit())
            && frac.bytes().all(|b| b.is_ascii_digit())
    })
}
