//! Round-trip properties of the built-in codec.

use proptest::prelude::*;
use serde_json::{Map, Number, Value};
use settings_proxy::codec::{default_decode, default_encode};

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter_map("finite", Number::from_f64)
            .prop_map(Value::Number),
        ".*".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((".*", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_decode_after_encode_is_identity(value in json_value()) {
        let encoded = default_encode(&value).unwrap();
        prop_assert_eq!(default_decode::<Value>(Some(encoded.as_str())), Some(value));
    }

    #[test]
    fn prop_encode_after_decode_is_stable(value in json_value()) {
        let text = value.to_string();
        let decoded = default_decode::<Value>(Some(text.as_str())).unwrap();
        let reencoded = default_encode(&decoded).unwrap();
        prop_assert_eq!(default_decode::<Value>(Some(reencoded.as_str())), Some(decoded));
    }

    #[test]
    fn prop_invalid_json_is_kept_verbatim(raw in ".*") {
        prop_assume!(serde_json::from_str::<Value>(&raw).is_err());
        prop_assert_eq!(default_decode::<Value>(Some(raw.as_str())), Some(Value::String(raw.clone())));

        let encoded = default_encode(&Value::String(raw.clone())).unwrap();
        prop_assert_eq!(encoded, serde_json::to_string(&raw).unwrap());
    }
}
