use std::fmt;

use serde_json::{Number, Value};

/// What the screen shows for a price nobody has quoted yet.
pub const PLACEHOLDER: &str = "--";

// A single price field as received on the wire (string or number)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Quote {
    Number(Number),
    Text(String),
    #[default]
    Placeholder,
}

impl Quote {
    /// Missing and `null` both fall back to the placeholder; anything else is kept.
    pub fn from_field(field: Option<&Value>) -> Self {
        match field {
            None | Some(Value::Null) => Quote::Placeholder,
            Some(Value::Number(n)) => Quote::Number(n.clone()),
            Some(Value::String(s)) => Quote::Text(s.clone()),
            Some(other) => Quote::Text(other.to_string()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Quote::Placeholder)
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quote::Placeholder => f.write_str(PLACEHOLDER),
            Quote::Text(s) => f.write_str(s),
            Quote::Number(n) => f.write_str(&format_number(n)),
        }
    }
}

/// Whole floats lose their `.0` (2451.0 prints as 2451), like the feed's own
/// clients show them. Everything else keeps serde_json's formatting.
pub(crate) fn format_number(n: &Number) -> String {
    match whole_float(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

/// `n` as an integer if it is a float with no fractional part.
pub(crate) fn whole_float(n: &Number) -> Option<i64> {
    let x = n.as_f64()?;
    (n.is_f64() && x.fract() == 0.0 && x.abs() < 1e15).then_some(x as i64)
}

// Latest quotes; always replaced as a whole, never merged
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSnapshot {
    pub gram: Quote,
    pub ons: Quote,
    pub usd: Quote,
    pub gumus: Quote,
}
