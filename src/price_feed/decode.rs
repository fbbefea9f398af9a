// 7.3: value normalization for gateway entries. a value arrives in one of a few
// encodings; each maps to a canonical decimal. anything else is Unrecognized and
// the entry gets dropped rather than guessed at.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Largest scale a Decimal can carry.
const MAX_DECIMALS: u32 = 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Integer mantissa scaled by `10^decimals`.
    FixedPoint { mantissa: i128, decimals: u32 },
    /// A JSON number with no decimals field.
    Number(serde_json::Number),
    /// A decimal string with no decimals field.
    Text(String),
    /// Missing, empty, or of a type we do not decode.
    Unrecognized(&'static str),
}

impl RawValue {
    /// Classify a gateway `value` together with its optional `decimals` field.
    pub fn classify(value: Option<&Value>, decimals: Option<&Value>) -> Self {
        let Some(value) = value else {
            return RawValue::Unrecognized("missing value");
        };

        let decimals = match decimals {
            None | Some(Value::Null) => None,
            Some(d) => match d.as_u64().and_then(|d| u32::try_from(d).ok()) {
                Some(d) if d <= MAX_DECIMALS => Some(d),
                _ => return RawValue::Unrecognized("invalid decimals"),
            },
        };

        match (value, decimals) {
            (Value::Null, _) => RawValue::Unrecognized("missing value"),
            (Value::Array(bytes), Some(decimals)) => match mantissa_from_bytes(bytes) {
                Some(mantissa) => RawValue::FixedPoint { mantissa, decimals },
                None => RawValue::Unrecognized("invalid byte encoding"),
            },
            (Value::Number(n), Some(decimals)) => match n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from)) {
                Some(mantissa) => RawValue::FixedPoint { mantissa, decimals },
                // fractional numbers are already scaled
                None => RawValue::Number(n.clone()),
            },
            (Value::String(s), Some(decimals)) => match mantissa_from_str(s.trim()) {
                Some(mantissa) => RawValue::FixedPoint { mantissa, decimals },
                None => classify_text(s),
            },
            (Value::Number(n), None) => RawValue::Number(n.clone()),
            (Value::String(s), None) => classify_text(s),
            (Value::Bool(_), _) => RawValue::Unrecognized("boolean value"),
            (Value::Array(_), None) => RawValue::Unrecognized("byte array without decimals"),
            (Value::Object(_), _) => RawValue::Unrecognized("object value"),
        }
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawValue::FixedPoint { mantissa, decimals } => {
                Decimal::try_from_i128_with_scale(*mantissa, *decimals).ok().map(|d| d.normalize())
            }
            RawValue::Number(n) => parse_decimal(&n.to_string()),
            RawValue::Text(s) => parse_decimal(s),
            RawValue::Unrecognized(_) => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            RawValue::FixedPoint { .. } => "fixed-point",
            RawValue::Number(_) => "number",
            RawValue::Text(_) => "text",
            RawValue::Unrecognized(reason) => *reason,
        }
    }
}

/// Decode straight to a decimal. `Err` carries the reason the entry is dropped.
pub fn decode_value(value: Option<&Value>, decimals: Option<&Value>) -> Result<Decimal, &'static str> {
    let raw = RawValue::classify(value, decimals);
    match raw {
        RawValue::Unrecognized(reason) => Err(reason),
        ref known => known.to_decimal().ok_or("value out of range"),
    }
}

fn classify_text(s: &str) -> RawValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        RawValue::Unrecognized("empty value")
    } else if parse_decimal(trimmed).is_some() {
        RawValue::Text(trimmed.to_string())
    } else {
        RawValue::Unrecognized("non-numeric text")
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).ok()
}

// digit strings and 0x-prefixed hex
fn mantissa_from_str(s: &str) -> Option<i128> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex.is_empty() {
            return None;
        }
        return u128::from_str_radix(hex, 16).ok().and_then(|v| i128::try_from(v).ok());
    }
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i128>().ok();
    }
    None
}

// big-endian byte array, as the signed-package SDK serializes its value buffer
fn mantissa_from_bytes(bytes: &[Value]) -> Option<i128> {
    if bytes.is_empty() || bytes.len() > 16 {
        return None;
    }
    let mut acc: u128 = 0;
    for b in bytes {
        let byte = u8::try_from(b.as_u64()?).ok()?;
        acc = (acc << 8) | u128::from(byte);
    }
    i128::try_from(acc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn decode(value: Value, decimals: Option<Value>) -> Result<Decimal, &'static str> {
        decode_value(Some(&value), decimals.as_ref())
    }

    #[test]
    fn fixed_point_integer_is_scaled() {
        assert_eq!(decode(json!(373276000000u64), Some(json!(8))), Ok(dec!(3732.76)));
        assert_eq!(decode(json!("373276000000"), Some(json!(8))), Ok(dec!(3732.76)));
    }

    #[test]
    fn fixed_point_hex_and_bytes() {
        // 0x56e8fbbf00 = 373276000000
        assert_eq!(decode(json!("0x56e8fbbf00"), Some(json!(8))), Ok(dec!(3732.76)));
        assert_eq!(decode(json!([0x56, 0xe8, 0xfb, 0xbf, 0x00]), Some(json!(8))), Ok(dec!(3732.76)));
    }

    #[test]
    fn plain_numbers_and_text_pass_through() {
        assert_eq!(decode(json!(3732.76), None), Ok(dec!(3732.76)));
        assert_eq!(decode(json!(42), None), Ok(dec!(42)));
        assert_eq!(decode(json!(" 176.98 "), None), Ok(dec!(176.98)));
        assert_eq!(decode(json!("1.5e3"), None), Ok(dec!(1500)));
    }

    #[test]
    fn fractional_number_ignores_decimals() {
        assert_eq!(decode(json!(3732.76), Some(json!(8))), Ok(dec!(3732.76)));
    }

    #[test]
    fn unrecognized_values_are_rejected() {
        assert_eq!(decode_value(None, None), Err("missing value"));
        assert_eq!(decode(json!(null), None), Err("missing value"));
        assert_eq!(decode(json!(""), None), Err("empty value"));
        assert_eq!(decode(json!("abc"), None), Err("non-numeric text"));
        assert_eq!(decode(json!(true), None), Err("boolean value"));
        assert_eq!(decode(json!({"v": 1}), None), Err("object value"));
        assert_eq!(decode(json!([1, 2]), None), Err("byte array without decimals"));
        assert_eq!(decode(json!(1), Some(json!(99))), Err("invalid decimals"));
    }

    #[test]
    fn classification_names_the_variant() {
        let raw = RawValue::classify(Some(&json!("100")), Some(&json!(2)));
        assert_eq!(raw, RawValue::FixedPoint { mantissa: 100, decimals: 2 });
        assert_eq!(raw.describe(), "fixed-point");
        assert_eq!(raw.to_decimal(), Some(dec!(1)));
    }
}
