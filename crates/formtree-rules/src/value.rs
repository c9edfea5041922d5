//! Loose scalar coercions shared by the rules.
//!
//! Submitted form values arrive as JSON values. Rules compare them either as
//! text or as numbers, and both coercions are lenient: nothing here fails.

use std::borrow::Cow;

use serde_json::Value;

/// Text form of a value, as used by string comparison and length checks.
///
/// `null` and `false` are empty, `true` is `"1"`, whole floats drop their
/// fraction (`5.0` reads as `"5"`), composites use compact JSON.
#[must_use]
pub fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null | Value::Bool(false) => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("1"),
        Value::String(text) => Cow::Borrowed(text.as_str()),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Cow::Owned(int.to_string())
            } else if let Some(int) = number.as_u64() {
                Cow::Owned(int.to_string())
            } else {
                Cow::Owned(format_float(number.as_f64().unwrap_or_default()))
            }
        }
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// Numeric form of a value, as used by ordering comparisons.
///
/// Strings contribute their leading numeric prefix; anything unparsable is
/// zero.
#[must_use]
pub fn number_of(value: &Value) -> f64 {
    match value {
        Value::Null | Value::Bool(false) => 0.0,
        Value::Bool(true) => 1.0,
        Value::Number(number) => number.as_f64().unwrap_or_default(),
        Value::String(text) => leading_float(text),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(fields) => f64::from(u8::from(!fields.is_empty())),
    }
}

/// Parses the longest numeric prefix of `text`, skipping leading
/// whitespace. `"12abc"` is 12, `"abc"` is 0, `"1e3"` is 1000.
#[must_use]
pub fn leading_float(text: &str) -> f64 {
    let text = text.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[..end].parse::<f64>().unwrap_or_default()
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leading_float_reads_numeric_prefix() {
        assert_eq!(leading_float("12abc"), 12.0);
        assert_eq!(leading_float("  -3.5kg"), -3.5);
        assert_eq!(leading_float(".5"), 0.5);
        assert_eq!(leading_float("5."), 5.0);
        assert_eq!(leading_float("1e3"), 1000.0);
        assert_eq!(leading_float("2e"), 2.0);
    }

    #[test]
    fn leading_float_defaults_to_zero() {
        assert_eq!(leading_float(""), 0.0);
        assert_eq!(leading_float("abc"), 0.0);
        assert_eq!(leading_float("-"), 0.0);
        assert_eq!(leading_float("."), 0.0);
        assert_eq!(leading_float("0x1A"), 0.0);
    }

    #[test]
    fn text_of_matches_loose_string_conversion() {
        assert_eq!(text_of(&Value::Null), "");
        assert_eq!(text_of(&json!(true)), "1");
        assert_eq!(text_of(&json!(false)), "");
        assert_eq!(text_of(&json!(5.0)), "5");
        assert_eq!(text_of(&json!(2.5)), "2.5");
        assert_eq!(text_of(&json!(-7)), "-7");
        assert_eq!(text_of(&json!("5.0")), "5.0");
        assert_eq!(text_of(&json!(["a"])), "[\"a\"]");
    }

    #[test]
    fn number_of_coerces_every_shape() {
        assert_eq!(number_of(&json!("10")), 10.0);
        assert_eq!(number_of(&json!("ten")), 0.0);
        assert_eq!(number_of(&json!(true)), 1.0);
        assert_eq!(number_of(&json!(null)), 0.0);
        assert_eq!(number_of(&json!([])), 0.0);
        assert_eq!(number_of(&json!([1])), 1.0);
    }
}
