//! Typed results produced by the resolver.

use std::fmt;

use crate::helpers::{is_float_literal, is_int_literal};

/// Tokens that show up around numbers in the scripts but carry no value for
/// display purposes, e.g. `6 * room_speed` or `1 / room_speed`.
pub const NUMERIC_NOISE: &[&str] = &["room_speed", "*", "/"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parse an integer or decimal literal. No noise stripping.
    pub fn parse(text: &str) -> Option<Self> {
        if is_int_literal(text) {
            // Out of i64 range still reads as a number
            text.parse()
                .map(Self::Int)
                .or_else(|_| text.parse().map(Self::Float))
                .ok()
        } else if is_float_literal(text) {
            text.parse().map(Self::Float).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            // Keep one fractional digit so 2.0 does not read as an integer
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A raw value is either a literal or the name of another attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a, T> {
    Literal(T),
    Alias(&'a str),
}

impl<'a> Expr<'a, Number> {
    /// Classify a raw value for numeric coercion.
    ///
    /// Noise tokens are removed first, so the alias of `cooldown * room_speed`
    /// is `cooldown`. The returned alias borrows from `stripped`.
    pub fn number(stripped: &'a str) -> Self {
        let text = stripped.trim();
        match Number::parse(text) {
            Some(n) => Self::Literal(n),
            None => Self::Alias(text),
        }
    }
}

impl<'a> Expr<'a, bool> {
    /// `"1"` is treated as true only.
    pub fn boolean(raw: &'a str) -> Self {
        match raw {
            "true" | "1" => Self::Literal(true),
            "false" => Self::Literal(false),
            other => Self::Alias(other),
        }
    }
}

/// Remove every [`NUMERIC_NOISE`] token from a raw value.
pub fn strip_numeric_noise(raw: &str) -> String {
    NUMERIC_NOISE
        .iter()
        .fold(raw.to_string(), |acc, noise| acc.replace(noise, ""))
}

/// Which coercion to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Raw,
    Number,
    Bool,
    Str,
}

impl std::str::FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "num" | "number" => Ok(Self::Number),
            "bool" => Ok(Self::Bool),
            "str" | "string" => Ok(Self::Str),
            other => Err(format!("unknown value kind '{other}'")),
        }
    }
}

/// A resolved attribute. Absence is expressed as `Option<Value>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Self::Int(i),
            Number::Float(f) => Self::Float(f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{}", Number::Int(*i)),
            Self::Float(x) => write!(f, "{}", Number::Float(*x)),
            Self::Str(s) => f.write_str(s),
        }
    }
}
