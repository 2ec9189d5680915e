//! Field deserializers for upstream payloads.
//!
//! A value of the wrong type reads as absent instead of failing the whole
//! response. Use with `#[serde(default, deserialize_with = "...")]`.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

fn number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

/// Integers, or floats with no fractional part (`3.0`).
fn integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
            .map(|n| n as i64)
    })
}

fn code(value: &Value) -> Option<i32> {
    integer(value).and_then(|n| i32::try_from(n).ok())
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn column<T>(value: Value, cell: fn(&Value) -> Option<T>) -> Option<Vec<Option<T>>> {
    match value {
        Value::Array(items) => Some(items.iter().map(cell).collect()),
        _ => None,
    }
}

pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(number(&Value::deserialize(d)?))
}

pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(integer(&Value::deserialize(d)?))
}

pub fn opt_code<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    Ok(code(&Value::deserialize(d)?))
}

pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(text(&Value::deserialize(d)?))
}

pub fn f64_column<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Option<f64>>>, D::Error> {
    Ok(column(Value::deserialize(d)?, number))
}

pub fn code_column<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Option<i32>>>, D::Error> {
    Ok(column(Value::deserialize(d)?, code))
}

pub fn string_column<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Vec<Option<String>>>, D::Error> {
    Ok(column(Value::deserialize(d)?, text))
}

/// A nested record; anything but an object reads as absent.
pub fn opt_record<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(T::deserialize(Value::deserialize(d)?).ok())
}

/// A list of records; entries that are not records are skipped.
pub fn records<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => {
            Some(items.into_iter().filter_map(|item| T::deserialize(item).ok()).collect())
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn codes_accept_integral_floats_only() {
        assert_eq!(code(&json!(3)), Some(3));
        assert_eq!(code(&json!(3.0)), Some(3));
        assert_eq!(code(&json!(3.5)), None);
        assert_eq!(code(&json!("3")), None);
        assert_eq!(code(&json!(1e12)), None);
    }

    #[test]
    fn numbers_reject_non_numeric_values() {
        assert_eq!(number(&json!(12)), Some(12.0));
        assert_eq!(number(&json!("n/a")), None);
        assert_eq!(number(&json!(true)), None);
        assert_eq!(number(&Value::Null), None);
    }

    #[test]
    fn columns_keep_positions_of_bad_cells() {
        let cells = column(json!([1.5, "x", null, 2]), number);
        assert_eq!(cells, Some(vec![Some(1.5), None, None, Some(2.0)]));
        assert_eq!(column(json!("not a list"), number), None);
    }
}
