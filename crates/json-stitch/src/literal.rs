//! Best-effort coercion of leaf payloads.
//!
//! None of these functions fail: malformed input degrades to a fallback value.
//! Numbers follow the textual rules of JavaScript's `Number()` for the inputs
//! producers actually emit. JSON has no representation for NaN or infinities,
//! so those surface as [`NumberOutcome::NonFinite`] for the caller to store.

use serde_json::{Number, Value};

/// Result of coercing a numeric payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberOutcome {
    Finite(Number),
    NonFinite,
}

impl NumberOutcome {
    /// The JSON value to store. Non-finite numbers serialize as `null`.
    pub fn into_value(self) -> Value {
        match self {
            NumberOutcome::Finite(n) => Value::Number(n),
            NumberOutcome::NonFinite => Value::Null,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, NumberOutcome::Finite(_))
    }
}

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Decode a quoted JSON string literal (`"\"He\\nllo\""` → `He\nllo`).
pub fn decode_string_literal(text: &str) -> Option<String> {
    serde_json::from_str(text).ok()
}

/// Coerce numeric text.
///
/// Integers keep full precision; integral floats that fit in the safe integer
/// range are stored as integers, matching how `25.0` serializes as `25`.
pub fn coerce_number_text(text: &str) -> NumberOutcome {
    let text = text.trim();
    if text.is_empty() {
        return NumberOutcome::Finite(Number::from(0));
    }
    if let Ok(n) = serde_json::from_str::<Number>(text) {
        return match n.as_f64() {
            Some(f) if n.is_f64() => number_from_f64(f),
            _ => NumberOutcome::Finite(n),
        };
    }
    if let Some(n) = parse_radix_integer(text) {
        return NumberOutcome::Finite(Number::from(n));
    }
    match text.parse::<f64>() {
        Ok(f) => number_from_f64(f),
        Err(_) => NumberOutcome::NonFinite,
    }
}

/// Coerce an already decoded payload.
///
/// Numbers pass through, booleans become `1`/`0`, `null` becomes `0` and
/// strings are parsed as text. Containers are not numbers.
pub fn coerce_number_value(value: &Value) -> NumberOutcome {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => number_from_f64(f),
            _ => NumberOutcome::Finite(n.clone()),
        },
        Value::Bool(b) => NumberOutcome::Finite(Number::from(u8::from(*b))),
        Value::Null => NumberOutcome::Finite(Number::from(0)),
        Value::String(s) => coerce_number_text(s),
        Value::Array(_) | Value::Object(_) => NumberOutcome::NonFinite,
    }
}

/// Coerce a boolean payload. An already boolean `value` wins; otherwise the
/// text (or a string `value`) is compared case-insensitively to `"true"`.
pub fn coerce_bool(text: Option<&str>, value: Option<&Value>) -> bool {
    if let Some(Value::Bool(b)) = value {
        return *b;
    }
    let text = text.or_else(|| value.and_then(Value::as_str));
    text.is_some_and(|t| t.trim().eq_ignore_ascii_case("true"))
}

fn number_from_f64(f: f64) -> NumberOutcome {
    if !f.is_finite() {
        return NumberOutcome::NonFinite;
    }
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        // Also folds -0 into 0.
        return NumberOutcome::Finite(Number::from(f as i64));
    }
    Number::from_f64(f).map_or(NumberOutcome::NonFinite, NumberOutcome::Finite)
}

/// `0x`, `0o` and `0b` prefixed integers (unsigned, as in JavaScript).
fn parse_radix_integer(text: &str) -> Option<u64> {
    let (radix, digits) = match text.get(..2)? {
        "0x" | "0X" => (16, &text[2..]),
        "0o" | "0O" => (8, &text[2..]),
        "0b" | "0B" => (2, &text[2..]),
        _ => return None,
    };
    u64::from_str_radix(digits, radix).ok()
}
