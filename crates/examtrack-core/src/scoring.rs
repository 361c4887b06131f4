//! Net score formula and presentation rounding.
//!
//! Nets are kept as unrounded `f64` throughout the pipeline. Rounding only
//! happens in the `present_*` helpers used when building output structures.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Penalty applied per wrong answer.
pub const WRONG_PENALTY: f64 = 0.25;

/// Net score: `correct - 0.25 * wrong`, unrounded.
pub fn net(correct: u32, wrong: u32) -> f64 {
    correct as f64 - WRONG_PENALTY * wrong as f64
}

/// An answer count that tolerates garbage on the wire.
///
/// Deserializes from integers, floats (truncated), numeric strings, or
/// anything else. Negative, non-numeric, and missing values become 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnswerCount(pub u32);

impl AnswerCount {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for AnswerCount {
    fn from(v: u32) -> Self {
        AnswerCount(v)
    }
}

impl fmt::Display for AnswerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AnswerCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for AnswerCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(AnswerCount(parse_count(&value)))
    }
}

/// Parse a count from an arbitrary JSON value, clamping invalid input to 0.
pub fn parse_count(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u.min(u32::MAX as u64) as u32
            } else {
                n.as_f64().map(clamp_float).unwrap_or(0)
            }
        }
        Value::String(s) => parse_count_str(s),
        _ => 0,
    }
}

/// Parse a count from free text, clamping invalid input to 0.
pub fn parse_count_str(s: &str) -> u32 {
    let trimmed = s.trim();
    if let Ok(u) = trimmed.parse::<u32>() {
        return u;
    }
    trimmed.parse::<f64>().map(clamp_float).unwrap_or(0)
}

fn clamp_float(f: f64) -> u32 {
    if !f.is_finite() || f <= 0.0 {
        0
    } else if f >= u32::MAX as f64 {
        u32::MAX
    } else {
        f.trunc() as u32
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    // avoid "-0.00" in presentation
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format a value with a fixed number of decimals for presentation.
pub fn present(value: f64, places: u32) -> String {
    format!("{:.*}", places as usize, round_to(value, places))
}

/// Format an optional value, using `"0"` when absent.
pub fn present_or_zero(value: Option<f64>, places: u32) -> String {
    match value {
        Some(v) => present(v, places),
        None => "0".to_string(),
    }
}

/// Percentage of `correct` over `total`, or `"0"` when `total` is zero.
pub fn success_rate(correct: u32, total: u32, places: u32) -> String {
    if total == 0 {
        return "0".to_string();
    }
    present(correct as f64 / total as f64 * 100.0, places)
}
