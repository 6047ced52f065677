//! JSON input adapter: build a [`FieldMap`] from a `serde_json::Value`.
//!
//! Object key order is kept (serde_json is built with `preserve_order`).
//! Numbers that fit in `i64` become integers, larger integers keep their
//! digits as text, and every other number becomes a float. Amounts that need a fixed scale should be sent as JSON strings.

use serde_json::{Map, Value};

use super::error::FatturaError;
use super::value::{FieldMap, FieldValue, Scalar};

/// Convert a JSON object into a [`FieldMap`].
///
/// Fails with [`FatturaError::UnsupportedValueKind`] if the top level is not an
/// object or any value is a boolean.
pub fn field_map_from_json(value: Value) -> Result<FieldMap, FatturaError> {
    match value {
        Value::Object(object) => object_to_map(object, ""),
        other => Err(FatturaError::UnsupportedValueKind {
            path: String::new(),
            kind: format!("top-level JSON {}", json_kind(&other)),
        }),
    }
}

fn object_to_map(object: Map<String, Value>, path: &str) -> Result<FieldMap, FatturaError> {
    let mut map = FieldMap::with_capacity(object.len());
    for (key, value) in object {
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}/{key}")
        };
        let converted = value_to_field(value, &child_path)?;
        map.insert(key, converted);
    }
    Ok(map)
}

fn value_to_field(value: Value, path: &str) -> Result<FieldValue, FatturaError> {
    match value {
        Value::Null => Ok(FieldValue::Null),
        Value::String(s) => Ok(FieldValue::Scalar(Scalar::Text(s))),
        Value::Number(n) => {
            let scalar = match (n.as_i64(), n.is_f64(), n.as_f64()) {
                (Some(i), _, _) => Scalar::Integer(i),
                (None, true, Some(f)) => Scalar::Float(f),
                // Integers beyond i64 keep their exact digits
                _ => Scalar::Text(n.to_string()),
            };
            Ok(FieldValue::Scalar(scalar))
        }
        Value::Object(object) => Ok(FieldValue::Map(object_to_map(object, path)?)),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| value_to_field(item, &format!("{path}[{index}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        Value::Bool(_) => Err(FatturaError::UnsupportedValueKind {
            path: path.to_string(),
            kind: "boolean".into(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_key_order() {
        let map = field_map_from_json(json!({
            "Zeta": "1",
            "Alpha": "2",
            "Mid": "3"
        }))
        .unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn numbers_split_into_integer_and_float() {
        let map = field_map_from_json(json!({ "IdDocumento": 66685, "Peso": 1.5 })).unwrap();
        assert_eq!(map["IdDocumento"], FieldValue::Scalar(Scalar::Integer(66685)));
        assert_eq!(map["Peso"], FieldValue::Scalar(Scalar::Float(1.5)));
    }

    #[test]
    fn integer_beyond_i64_keeps_digits() {
        let map = field_map_from_json(json!({ "IdDocumento": 18446744073709551615u64 })).unwrap();
        assert_eq!(
            map["IdDocumento"],
            FieldValue::Scalar(Scalar::Text("18446744073709551615".into()))
        );
    }

    #[test]
    fn boolean_is_rejected_with_path() {
        let err = field_map_from_json(json!({ "Dati": { "Flag": true } })).unwrap_err();
        match err {
            FatturaError::UnsupportedValueKind { path, kind } => {
                assert_eq!(path, "Dati/Flag");
                assert_eq!(kind, "boolean");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn top_level_must_be_object() {
        assert!(field_map_from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn null_survives_until_conversion() {
        let map = field_map_from_json(json!({ "X": null })).unwrap();
        assert_eq!(map["X"], FieldValue::Null);
    }
}
