//! Property-based tests for the tree builder and the XML layer.
//!
//! Run with: `cargo test --features all --test proptest_tests`

use fattura::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Tag-like key: letter followed by letters/digits.
fn arb_key() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,11}"
}

fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        "[ -~]{0,20}".prop_map(Scalar::Text),
        any::<i64>().prop_map(Scalar::Integer),
        (any::<i64>(), 0u32..10).prop_map(|(n, scale)| Scalar::Decimal(Decimal::new(n, scale))),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Scalar::Float),
    ]
}

/// Nested mapping with unique keys; values are scalars, maps or sequences.
fn arb_map() -> impl Strategy<Value = FieldMap> {
    let leaf = arb_scalar().prop_map(FieldValue::Scalar);
    let value = leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec((arb_key(), inner.clone()), 0..5)
                .prop_map(|pairs| FieldValue::Map(pairs.into_iter().collect())),
            prop::collection::vec(
                prop_oneof![
                    arb_scalar().prop_map(FieldValue::Scalar),
                    prop::collection::vec((arb_key(), inner), 0..4)
                        .prop_map(|pairs| FieldValue::Map(pairs.into_iter().collect())),
                ],
                0..4
            )
            .prop_map(FieldValue::List),
        ]
    });
    prop::collection::vec((arb_key(), value), 0..8).prop_map(|pairs| pairs.into_iter().collect())
}

/// Number of top-level nodes a mapping must produce.
fn expected_len(map: &FieldMap) -> usize {
    map.values()
        .map(|v| match v {
            FieldValue::List(items) => items.len(),
            _ => 1,
        })
        .sum()
}

/// Expected tag sequence: each key once, or once per item for sequences.
fn expected_tags(map: &FieldMap) -> Vec<&str> {
    map.iter()
        .flat_map(|(k, v)| {
            let n = match v {
                FieldValue::List(items) => items.len(),
                _ => 1,
            };
            std::iter::repeat_n(k.as_str(), n)
        })
        .collect()
}

proptest! {
    #[test]
    fn tag_order_follows_key_order(map in arb_map()) {
        let nodes = convert(&map).unwrap();
        prop_assert_eq!(nodes.len(), expected_len(&map));
        let tags: Vec<_> = nodes.iter().map(|n| n.tag.as_str()).collect();
        prop_assert_eq!(tags, expected_tags(&map));
    }

    #[test]
    fn conversion_is_deterministic(map in arb_map()) {
        prop_assert_eq!(convert(&map).unwrap(), convert(&map).unwrap());
    }

    #[test]
    fn fan_out_matches_item_count(items in prop::collection::vec(arb_key(), 0..20)) {
        let lines: Vec<FieldMap> = items
            .iter()
            .map(|d| field_map! { "Descrizione" => d.as_str() })
            .collect();
        let nodes = convert(&field_map! { "Line" => lines }).unwrap();
        prop_assert_eq!(nodes.len(), items.len());
        for (node, item) in nodes.iter().zip(&items) {
            prop_assert_eq!(node.tag.as_str(), "Line");
            prop_assert_eq!(node.children()[0].text(), Some(item.as_str()));
        }
    }

    #[test]
    fn null_anywhere_fails_the_whole_call(map in arb_map(), key in arb_key()) {
        let mut poisoned = map.clone();
        poisoned.insert(key, FieldValue::Null);
        let is_unsupported = matches!(
            convert(&poisoned),
            Err(FatturaError::UnsupportedValueKind { .. })
        );
        prop_assert!(is_unsupported);
    }

    #[test]
    fn canonical_float_text_reads_back(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let text = Scalar::Float(f).canonical_text().unwrap();
        prop_assert_eq!(text.parse::<f64>().unwrap(), f);
    }
}

#[cfg(feature = "xml")]
mod xml_props {
    use super::*;
    use fattura::xml::{RootElement, WriteOptions, parse_document, to_xml_string};

    /// Text without surrounding whitespace: the reader trims text content.
    fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9&<>'\"]([ -~]{0,18}[A-Za-z0-9&<>'\"])?"
    }

    fn arb_text_map() -> impl Strategy<Value = FieldMap> {
        let leaf = arb_text().prop_map(FieldValue::from);
        let value = leaf.prop_recursive(3, 32, 5, |inner| {
            prop::collection::vec((arb_key(), inner), 0..5)
                .prop_map(|pairs| FieldValue::Map(pairs.into_iter().collect()))
        });
        prop::collection::vec((arb_key(), value), 0..6).prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn written_tree_parses_back(map in arb_text_map()) {
            let root = RootElement::new("Doc").append(convert(&map).unwrap());
            let xml = to_xml_string(&root, &WriteOptions::default()).unwrap();
            prop_assert_eq!(parse_document(&xml).unwrap(), root);
        }
    }
}
