use bindoc::{
    decode, decode_prefix, decode_with, encode, encode_value, value, DecodeLimits, Encoder,
    ErrorCode, ErrorKind, KeyOrder, Object, Value,
};

#[test]
fn integer_headers_use_smallest_width() {
    assert_eq!(encode_value(&Value::UInt(0)), [0x00]);
    assert_eq!(encode_value(&Value::UInt(23)), [0x17]);
    assert_eq!(encode_value(&Value::UInt(24)), [0x18, 0x18]);
    assert_eq!(encode_value(&Value::UInt(1000)), [0x19, 0x03, 0xe8]);
    assert_eq!(
        encode_value(&Value::UInt(1_000_000)),
        [0x1a, 0x00, 0x0f, 0x42, 0x40]
    );
    assert_eq!(
        encode_value(&Value::UInt(1_000_000_000_000)),
        [0x1b, 0x00, 0x00, 0x00, 0xe8, 0xd4, 0xa5, 0x10, 0x00]
    );
    assert_eq!(
        encode_value(&Value::UInt(u64::MAX)),
        [0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn negative_integers_use_major_one() {
    assert_eq!(encode_value(&Value::Int(-1)), [0x20]);
    assert_eq!(encode_value(&Value::Int(-10)), [0x29]);
    assert_eq!(encode_value(&Value::Int(-100)), [0x38, 0x63]);
    assert_eq!(encode_value(&Value::Int(-1000)), [0x39, 0x03, 0xe7]);
    // Non-negative signed integers share major 0 with unsigned.
    assert_eq!(encode_value(&Value::Int(10)), [0x0a]);
}

#[test]
fn simple_values_and_floats() {
    assert_eq!(encode_value(&Value::Bool(false)), [0xf4]);
    assert_eq!(encode_value(&Value::Bool(true)), [0xf5]);
    assert_eq!(encode_value(&Value::Null), [0xf6]);
    assert_eq!(
        encode_value(&Value::Float(1.1)),
        [0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]
    );
}

#[test]
fn strings_arrays_objects_vectors() {
    assert_eq!(encode_value(&value!("")), [0x60]);
    assert_eq!(encode_value(&value!("IETF")), [0x64, 0x49, 0x45, 0x54, 0x46]);
    assert_eq!(
        encode_value(&Value::Bytes(vec![1, 2, 3, 4])),
        [0x44, 0x01, 0x02, 0x03, 0x04]
    );
    assert_eq!(encode_value(&value!([])), [0x80]);
    assert_eq!(encode_value(&value!([1, 2, 3])), [0x83, 0x01, 0x02, 0x03]);
    assert_eq!(
        encode_value(&value!({a: 1, b: [2, 3]})),
        [0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x82, 0x02, 0x03]
    );
}

#[test]
fn decode_widens_small_floats() {
    // Half-precision 1.5 and subnormal 5.960464477539063e-8.
    assert_eq!(decode(&[0xf9, 0x3e, 0x00]).unwrap(), Value::Float(1.5));
    assert_eq!(
        decode(&[0xf9, 0x00, 0x01]).unwrap(),
        Value::Float(2f64.powi(-24))
    );
    assert_eq!(decode(&[0xf9, 0x7b, 0xff]).unwrap(), Value::Float(65504.0));
    assert_eq!(
        decode(&[0xf9, 0x7c, 0x00]).unwrap(),
        Value::Float(f64::INFINITY)
    );
    // Single-precision 100000.0.
    assert_eq!(
        decode(&[0xfa, 0x47, 0xc3, 0x50, 0x00]).unwrap(),
        Value::Float(100_000.0)
    );
}

#[test]
fn decode_maps_undefined_to_null() {
    assert_eq!(decode(&[0xf7]).unwrap(), Value::Null);
}

#[test]
fn round_trip_preserves_structure() {
    let v = value!({
        name: "doc",
        tags: [1, 2, 3],
        nested: {flag: true, score: 0.5},
        blob: (Value::Bytes(vec![0xde, 0xad])),
        missing: null,
    });
    assert_eq!(decode(&encode_value(&v)).unwrap(), v);
}

#[test]
fn round_trip_negative_extremes() {
    for v in [i64::MIN, i64::MIN + 1, -1, 0, i64::MAX] {
        assert_eq!(decode(&encode_value(&Value::Int(v))).unwrap(), Value::Int(v));
    }
}

#[test]
fn sorted_decode_orders_keys_regardless_of_construction() {
    let mut obj = Object::insertion();
    obj.insert("price", 1i64);
    obj.insert("author", "Kafka");
    let bytes = encode_value(&Value::Object(obj));

    let decoded = decode(&bytes).unwrap();
    let keys: Vec<String> = decoded
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, _)| k.to_string())
        .collect();
    assert_eq!(keys, ["author", "price"]);
}

#[test]
fn insertion_decode_preserves_wire_order() {
    let mut obj = Object::insertion();
    obj.insert("price", 1i64);
    obj.insert("author", "Kafka");
    let bytes = encode_value(&Value::Object(obj.clone()));

    let decoded = decode_with(&bytes, KeyOrder::Insertion, DecodeLimits::default()).unwrap();
    let keys: Vec<String> = decoded
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, _)| k.to_string())
        .collect();
    assert_eq!(keys, ["price", "author"]);
    assert_eq!(decoded, Value::Object(obj));
}

#[test]
fn insertion_encode_emits_duplicates_verbatim() {
    let mut obj = Object::insertion();
    obj.insert("k", 1i64);
    obj.insert("k", 2i64);
    let bytes = encode_value(&Value::Object(obj));
    assert_eq!(
        bytes,
        [0xa2, 0x61, 0x6b, 0x01, 0x61, 0x6b, 0x02]
    );

    // Sorted materialization deduplicates with last-wins...
    let sorted = decode(&bytes).unwrap();
    assert_eq!(sorted.len(), Some(1));
    assert_eq!(sorted.get("k"), Some(&Value::Int(2)));

    // ...while insertion-ordered materialization retains both.
    let kept = decode_with(&bytes, KeyOrder::Insertion, DecodeLimits::default()).unwrap();
    assert_eq!(kept.len(), Some(2));
}

#[test]
fn indefinite_strings_concatenate_chunks() {
    // (_ "strea", "ming")
    let bytes = [
        0x7f, 0x65, 0x73, 0x74, 0x72, 0x65, 0x61, 0x64, 0x6d, 0x69, 0x6e, 0x67, 0xff,
    ];
    assert_eq!(decode(&bytes).unwrap(), value!("streaming"));

    // (_ h'0102', h'030405')
    let bytes = [0x5f, 0x42, 0x01, 0x02, 0x43, 0x03, 0x04, 0x05, 0xff];
    assert_eq!(
        decode(&bytes).unwrap(),
        Value::Bytes(vec![1, 2, 3, 4, 5])
    );
}

#[test]
fn indefinite_containers_accumulate_until_break() {
    // [_ 1, [2, 3], [_ 4, 5]]
    let bytes = [
        0x9f, 0x01, 0x82, 0x02, 0x03, 0x9f, 0x04, 0x05, 0xff, 0xff,
    ];
    assert_eq!(decode(&bytes).unwrap(), value!([1, [2, 3], [4, 5]]));

    // {_ "a": 1, "b": [_ 2, 3]}
    let bytes = [
        0xbf, 0x61, 0x61, 0x01, 0x61, 0x62, 0x9f, 0x02, 0x03, 0xff, 0xff,
    ];
    assert_eq!(decode(&bytes).unwrap(), value!({a: 1, b: [2, 3]}));
}

#[test]
fn decode_prefix_reports_consumed_bytes() {
    let mut bytes = encode_value(&value!([1, 2]));
    let item_len = bytes.len();
    bytes.extend_from_slice(&[0xf5, 0xf6]);

    let (v, consumed) =
        decode_prefix(&bytes, 0, KeyOrder::Sorted, DecodeLimits::default()).unwrap();
    assert_eq!(v, value!([1, 2]));
    assert_eq!(consumed, item_len);

    let (v, consumed) =
        decode_prefix(&bytes, item_len, KeyOrder::Sorted, DecodeLimits::default()).unwrap();
    assert_eq!(v, Value::Bool(true));
    assert_eq!(consumed, 1);
}

#[test]
fn eof_mid_item_fails() {
    let err = decode(&[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedEof);
    assert_eq!(err.kind(), ErrorKind::EndOfInput);

    // Length argument promises more bytes than available.
    assert_eq!(
        decode(&[0x62, 0x61]).unwrap_err().code,
        ErrorCode::UnexpectedEof
    );
    // Unterminated indefinite array.
    assert_eq!(
        decode(&[0x9f, 0x01]).unwrap_err().code,
        ErrorCode::UnexpectedEof
    );
}

#[test]
fn malformed_headers_fail() {
    let err = decode(&[0x1c]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservedAdditionalInfo);
    assert_eq!(err.kind(), ErrorKind::InvalidEncoding);

    assert_eq!(decode(&[0xff]).unwrap_err().code, ErrorCode::UnexpectedBreak);
    assert_eq!(
        decode(&[0xc2, 0x41, 0x01]).unwrap_err().code,
        ErrorCode::UnsupportedTag
    );
    assert_eq!(
        decode(&[0xf8, 0x20]).unwrap_err().code,
        ErrorCode::UnsupportedSimpleValue
    );
}

#[test]
fn invalid_utf8_fails() {
    let err = decode(&[0x62, 0xff, 0xfe]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidUtf8);
    assert_eq!(err.offset, 0);
}

#[test]
fn non_text_map_key_fails() {
    let err = decode(&[0xa1, 0x01, 0x02]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidMapKey);
    assert_eq!(err.offset, 1);
}

#[test]
fn mixed_major_chunk_fails() {
    // Indefinite byte string with a text chunk.
    let err = decode(&[0x5f, 0x61, 0x61, 0xff]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidChunk);
    // Nested indefinite chunk is equally malformed.
    let err = decode(&[0x7f, 0x7f, 0x61, 0x61, 0xff, 0xff]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidChunk);
}

#[test]
fn trailing_bytes_fail() {
    let err = decode(&[0x01, 0x02]).unwrap_err();
    assert_eq!(err.code, ErrorCode::TrailingBytes);
    assert_eq!(err.offset, 1);
}

#[test]
fn negative_beyond_model_range_fails() {
    // -18446744073709551616 fits the wire but not a 64-bit signed model.
    let err = decode(&[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap_err();
    assert_eq!(err.code, ErrorCode::IntegerOutOfRange);
}

#[test]
fn depth_limit_is_enforced() {
    let mut limits = DecodeLimits::default();
    limits.max_depth = 1;
    let err = decode_with(&[0x81, 0x81, 0x01], KeyOrder::Sorted, limits).unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);

    limits.max_depth = 2;
    assert!(decode_with(&[0x81, 0x81, 0x01], KeyOrder::Sorted, limits).is_ok());
}

#[test]
fn container_len_limits_are_enforced() {
    let mut limits = DecodeLimits::default();
    limits.max_array_len = 2;
    let err = decode_with(&[0x83, 0x01, 0x02, 0x03], KeyOrder::Sorted, limits).unwrap_err();
    assert_eq!(err.code, ErrorCode::ArrayLenLimitExceeded);

    let mut limits = DecodeLimits::default();
    limits.max_text_len = 3;
    let err = decode_with(&[0x64, 0x49, 0x45, 0x54, 0x46], KeyOrder::Sorted, limits).unwrap_err();
    assert_eq!(err.code, ErrorCode::TextLenLimitExceeded);
}

#[test]
fn contract_level_encode_converts_first() {
    assert_eq!(encode(&7i64), [0x07]);
    assert_eq!(encode(&vec![1i64, 2]), [0x82, 0x01, 0x02]);
    let decoded: Vec<i64> = decode(&encode(&vec![1i64, 2])).unwrap().to().unwrap();
    assert_eq!(decoded, vec![1, 2]);
}

#[test]
fn streaming_encoder_matches_tree_encoding() {
    let mut enc = Encoder::new();
    enc.map(2, |m| {
        m.entry("a", |e| {
            e.int(1);
            Ok(())
        })?;
        m.entry("b", |e| {
            e.array(2, |a| {
                a.int(2)?;
                a.int(3)
            })
        })
    })
    .unwrap();

    assert_eq!(enc.into_vec(), encode_value(&value!({a: 1, b: [2, 3]})));
}

#[test]
fn streaming_encoder_rejects_arity_mismatch() {
    let mut enc = Encoder::new();
    let err = enc
        .array(2, |a| {
            a.int(1)?;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::LengthMismatch);
    // The failed container leaves no partial bytes behind.
    assert!(enc.is_empty());

    let err = enc
        .array(1, |a| {
            a.int(1)?;
            a.int(2)
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::LengthMismatch);
    assert!(enc.is_empty());
}
