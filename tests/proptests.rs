// Property-based round-trip and navigation tests.
//
// These are intentionally conservative in size/depth to keep CI fast.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use bindoc::{
    decode_with, encode_value, view, DecodeLimits, KeyOrder, Kind, Object, Value, View,
};

fn arb_key() -> impl Strategy<Value = String> {
    // ASCII keys keep size predictable while still exercising key ordering.
    proptest::collection::vec(proptest::char::range('a', 'z'), 0..12)
        .prop_map(|chars| chars.into_iter().collect())
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::UInt),
        any::<f64>()
            .prop_filter("NaN is not reflexively equal", |f| !f.is_nan())
            .prop_map(Value::Float),
        arb_key().prop_map(Value::Text),
        proptest::collection::vec(any::<u8>(), 0..24).prop_map(Value::Bytes),
    ]
}

fn arb_value(order: KeyOrder) -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 64, 8, move |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            proptest::collection::vec((arb_key(), inner), 0..8)
                .prop_map(move |pairs| Value::Object(Object::from_entries(order, pairs))),
        ]
    })
}

/// Rebuilds a value purely through view navigation, never through the eager
/// decoder, so equivalence with `decode` exercises both paths.
fn materialize_via_views(v: View<'_>) -> Value {
    match v.kind().unwrap() {
        Kind::Null => Value::Null,
        Kind::Bool => Value::Bool(v.bool().unwrap()),
        Kind::Int => v
            .uint()
            .map(Value::UInt)
            .unwrap_or_else(|_| Value::Int(v.int().unwrap())),
        Kind::Float => Value::Float(v.float().unwrap()),
        Kind::Text => Value::Text(v.text().unwrap().into_owned()),
        Kind::Bytes => Value::Bytes(v.binary().unwrap().into_owned()),
        Kind::Array => Value::Array(
            v.array()
                .unwrap()
                .iter()
                .map(|item| materialize_via_views(item.unwrap()))
                .collect(),
        ),
        Kind::Object => {
            let mut obj = Object::sorted();
            for entry in v.object().unwrap().iter() {
                let (k, val) = entry.unwrap();
                obj.insert(k.into_owned(), materialize_via_views(val));
            }
            Value::Object(obj)
        }
    }
}

proptest! {
    #[test]
    fn sorted_round_trip(v in arb_value(KeyOrder::Sorted)) {
        let bytes = encode_value(&v);
        let decoded = decode_with(&bytes, KeyOrder::Sorted, DecodeLimits::default()).unwrap();
        prop_assert_eq!(&decoded, &v);

        // Re-encoding a sorted tree is byte-stable.
        prop_assert_eq!(encode_value(&decoded), bytes);
    }

    #[test]
    fn insertion_round_trip(v in arb_value(KeyOrder::Insertion)) {
        let bytes = encode_value(&v);
        let decoded = decode_with(&bytes, KeyOrder::Insertion, DecodeLimits::default()).unwrap();
        prop_assert_eq!(&decoded, &v);
        prop_assert_eq!(encode_value(&decoded), bytes);
    }

    #[test]
    fn view_and_eager_decoding_agree(v in arb_value(KeyOrder::Sorted)) {
        let bytes = encode_value(&v);
        let eager = decode_with(&bytes, KeyOrder::Sorted, DecodeLimits::default()).unwrap();
        let lazy = materialize_via_views(view(&bytes));
        prop_assert_eq!(lazy, eager);

        // The root skip span covers exactly the whole item.
        prop_assert_eq!(view(&bytes).as_bytes().unwrap(), &bytes[..]);
    }

    #[test]
    fn object_lookup_finds_every_entry(pairs in proptest::collection::vec((arb_key(), arb_leaf()), 0..8)) {
        let obj = Object::from_entries(KeyOrder::Sorted, pairs);
        let value = Value::Object(obj);
        let bytes = encode_value(&value);
        let root = view(&bytes);

        for (key, expected) in value.as_object().unwrap().iter() {
            let hit = root.at_key(key).unwrap().expect("present key must be found");
            prop_assert_eq!(&hit.materialize().unwrap(), expected);
        }
        prop_assert!(root.at_key("0-never-a-generated-key").unwrap().is_none());
    }
}
