// ABOUTME: Casting between stored strings and typed setting values
// ABOUTME: Permissive numeric prefixes, truthy-word booleans, canonical string output

use setstore_storage::SettingType;

use crate::error::SettingsResult;
use crate::value::SettingValue;

const TRUTHY: [&str; 4] = ["yes", "true", "on", "1"];

/// Cast `value` to the type named by `type_tag`.
///
/// Unknown tags fail with `UnsupportedType`; every supported tag succeeds.
pub fn cast(value: impl Into<SettingValue>, type_tag: &str) -> SettingsResult<SettingValue> {
    let kind: SettingType = type_tag.parse()?;
    Ok(cast_to(&value.into(), kind))
}

/// Cast an already typed value to `kind`. Never fails.
pub fn cast_to(value: &SettingValue, kind: SettingType) -> SettingValue {
    match kind {
        SettingType::String => SettingValue::String(value.to_string()),
        SettingType::Integer => SettingValue::Integer(match value {
            SettingValue::Integer(i) => *i,
            // saturating, NaN becomes 0
            SettingValue::Double(d) => *d as i64,
            SettingValue::Boolean(b) => i64::from(*b),
            SettingValue::String(s) => parse_integer(s),
        }),
        SettingType::Double => SettingValue::Double(match value {
            SettingValue::Integer(i) => *i as f64,
            SettingValue::Double(d) => *d,
            SettingValue::Boolean(b) => f64::from(u8::from(*b)),
            SettingValue::String(s) => parse_double(s),
        }),
        SettingType::Boolean => SettingValue::Boolean(match value {
            SettingValue::Boolean(b) => *b,
            other => parse_bool(&other.to_string()),
        }),
    }
}

/// Interpret a stored string as `kind`
pub fn cast_str(raw: &str, kind: SettingType) -> SettingValue {
    match kind {
        SettingType::Integer => SettingValue::Integer(parse_integer(raw)),
        SettingType::Double => SettingValue::Double(parse_double(raw)),
        SettingType::Boolean => SettingValue::Boolean(parse_bool(raw)),
        SettingType::String => SettingValue::String(raw.to_string()),
    }
}

pub fn bool_to_string(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Case-insensitive match against yes/true/on/1. Anything else is false.
pub fn parse_bool(raw: &str) -> bool {
    let lowered = raw.to_ascii_lowercase();
    TRUTHY.contains(&lowered.as_str())
}

/// Longest leading base-10 integer, 0 when there is none.
///
/// Leading ASCII whitespace and one sign are accepted. Values outside the
/// `i64` range saturate.
pub fn parse_integer(raw: &str) -> i64 {
    let s = raw.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            let digit = i64::from(b - b'0');
            if negative {
                acc.saturating_mul(10).saturating_sub(digit)
            } else {
                acc.saturating_mul(10).saturating_add(digit)
            }
        })
}

/// Longest leading floating point number, 0.0 when there is none.
///
/// Accepts whitespace, a sign, digits with an optional fraction, and an
/// exponent only when at least one exponent digit follows.
pub fn parse_double(raw: &str) -> f64 {
    let s = raw.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        if frac_digits > 0 {
            mantissa_digits += frac_digits;
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(0.0)
}
