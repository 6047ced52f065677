//! Recursive conversion from [`FieldMap`] to [`ElementNode`] sequences.

use super::element::ElementNode;
use super::error::FatturaError;
use super::value::{FieldMap, FieldValue};

/// Convert an ordered mapping into a sequence of element nodes.
///
/// One node is produced per key, in key order. A scalar becomes a text leaf,
/// a nested mapping becomes a branch holding its own conversion, and a
/// sequence fans out into one sibling per item, all tagged with the key.
///
/// The call is all-or-nothing: the first offending key aborts the whole
/// conversion and nothing is returned.
///
/// ```
/// use fattura::{convert, field_map};
///
/// let nodes = convert(&field_map! {
///     "Sede" => field_map! { "CAP" => "00100", "Comune" => "Roma" },
/// })
/// .unwrap();
///
/// assert_eq!(nodes.len(), 1);
/// assert_eq!(nodes[0].tag, "Sede");
/// assert_eq!(nodes[0].children()[1].text(), Some("Roma"));
/// ```
pub fn convert(mapping: &FieldMap) -> Result<Vec<ElementNode>, FatturaError> {
    let mut path = Vec::new();
    convert_map(mapping, &mut path)
}

fn convert_map(mapping: &FieldMap, path: &mut Vec<String>) -> Result<Vec<ElementNode>, FatturaError> {
    let mut nodes = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        if !is_valid_key(key) {
            return Err(FatturaError::EmptyKeyName {
                path: join_path(path, key),
            });
        }

        match value {
            FieldValue::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    path.push(format!("{key}[{index}]"));
                    let node = convert_item(key, item, path)?;
                    path.pop();
                    nodes.push(node);
                }
            }
            other => {
                path.push(key.clone());
                let node = convert_item(key, other, path)?;
                path.pop();
                nodes.push(node);
            }
        }
    }
    Ok(nodes)
}

/// Build the single node for `value` under `key`. Sequences are unrolled by
/// the caller, so a sequence reaching this point was nested in another one.
fn convert_item(key: &str, value: &FieldValue, path: &mut Vec<String>) -> Result<ElementNode, FatturaError> {
    match value {
        FieldValue::Scalar(scalar) => match scalar.canonical_text() {
            Some(text) => Ok(ElementNode::leaf(key, text)),
            None => Err(unsupported(path, "non-finite float")),
        },
        FieldValue::Map(inner) => Ok(ElementNode::branch(key, convert_map(inner, path)?)),
        FieldValue::List(_) => Err(unsupported(path, "nested sequence")),
        FieldValue::Null => Err(unsupported(path, "null")),
    }
}

/// Keys must be non-empty and free of whitespace. Anything finer is left to
/// the XML layer.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(char::is_whitespace)
}

fn unsupported(path: &[String], kind: &str) -> FatturaError {
    FatturaError::UnsupportedValueKind {
        path: path.join("/"),
        kind: kind.to_string(),
    }
}

fn join_path(path: &[String], key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}/{key}", path.join("/"))
    }
}
