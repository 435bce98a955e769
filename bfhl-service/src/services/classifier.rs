use crate::utils::{is_numeric, is_prime, parse_int, MAX_SAFE_INTEGER};
use serde_json::Value;

/// How a single `data` item is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Number,
    Alphabet(char),
    Dropped,
}

impl ItemKind {
    pub fn of(item: &Value) -> Self {
        if is_numeric(item) {
            return ItemKind::Number;
        }

        match item {
            Value::String(s) => {
                single_code_unit(s).map_or(ItemKind::Dropped, ItemKind::Alphabet)
            }
            _ => ItemKind::Dropped,
        }
    }
}

/// Result of one pass over `data`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Numeric items as received. Integral floats are written as integers.
    pub numbers: Vec<Value>,
    pub alphabets: Vec<String>,
    pub highest_lowercase: Option<char>,
    pub is_prime_found: bool,
}

pub fn classify_items(items: &[Value]) -> Classification {
    let mut result = Classification::default();

    for item in items {
        match ItemKind::of(item) {
            ItemKind::Number => {
                if !result.is_prime_found && truncates_to_prime(item) {
                    result.is_prime_found = true;
                }
                result.numbers.push(echoed(item));
            }
            ItemKind::Alphabet(c) => {
                if is_lowercase(c) && result.highest_lowercase.map_or(true, |best| c > best) {
                    result.highest_lowercase = Some(c);
                }
                result.alphabets.push(c.to_string());
            }
            ItemKind::Dropped => {
                tracing::trace!(item = %item, "Dropping unclassifiable item");
            }
        }
    }

    result
}

/// `3.0` and `1e2` are echoed as `3` and `100`.
fn echoed(item: &Value) -> Value {
    match item.as_f64() {
        Some(f) if item.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Value::from(f as i64)
        }
        _ => item.clone(),
    }
}

/// Integers beyond 2^53 never count as prime.
fn truncates_to_prime(item: &Value) -> bool {
    parse_int(item).is_some_and(|n| n <= MAX_SAFE_INTEGER && is_prime(n))
}

/// A char counts as lowercase when lowercasing leaves it unchanged,
/// so symbols like `$` qualify too.
fn is_lowercase(c: char) -> bool {
    let mut lowered = c.to_lowercase();
    lowered.next() == Some(c) && lowered.next().is_none()
}

/// The sole char of `s` if it occupies exactly one UTF-16 code unit.
fn single_code_unit(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.len_utf16() == 1 => Some(c),
        _ => None,
    }
}
