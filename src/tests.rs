use std::collections::BTreeMap;
use std::str::FromStr;

use bytes::Bytes;
use num_bigint::BigInt;

use super::*;

fn dict(entries: Vec<(Key, Value)>) -> Value {
    Value::from(BencodexDictionary::from_entries(entries))
}

/// A dictionary backing that yields its pairs verbatim, duplicates
/// included. Used to exercise the encoder's duplicate-key policies,
/// which the deduplicating built-in backings can never trigger.
#[derive(Debug, Clone)]
struct PairList(Vec<(Key, Value)>);

impl Dictionary for PairList {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Key, &Value)> + '_> {
        Box::new(self.0.iter().map(|(k, v)| (k.clone(), v)))
    }

    fn clone_dictionary(&self) -> Box<dyn Dictionary> {
        Box::new(self.clone())
    }
}

const MIXED_DICT: &[u8] = b"d4:spamt4:spannu6:\xeb\x8b\xa8\xed\x8c\xa5i123ee";

fn mixed_dict_value() -> Value {
    dict(vec![
        (Key::from("단팥"), Value::from(123i64)),
        (Key::from(Bytes::from_static(b"span")), Value::Null),
        (Key::from(Bytes::from_static(b"spam")), Value::from(true)),
    ])
}

#[test]
fn test_encode_single_text_key_dictionary() {
    let value = dict(vec![(Key::from("foo"), Value::from(true))]);
    assert_eq!(
        encode(&value).unwrap(),
        [0x64, 0x75, 0x33, 0x3a, 0x66, 0x6f, 0x6f, 0x74, 0x65]
    );
}

#[test]
fn test_encode_integers() {
    assert_eq!(encode(&Value::from(123i64)).unwrap(), b"i123e");
    assert_eq!(encode(&Value::from(-456i64)).unwrap(), b"i-456e");
    assert_eq!(encode(&Value::from(0i64)).unwrap(), b"i0e");
    assert_eq!(
        encode(&Value::from(u64::MAX)).unwrap(),
        b"i18446744073709551615e"
    );

    let beyond = BigInt::from_str("18446744073709551616").unwrap();
    assert_eq!(
        encode(&Value::from(beyond)).unwrap(),
        b"i18446744073709551616e"
    );
    let negative_beyond = BigInt::from_str("-18446744073709551616").unwrap();
    assert_eq!(
        encode(&Value::from(negative_beyond)).unwrap(),
        b"i-18446744073709551616e"
    );
}

#[test]
fn test_encode_atoms() {
    assert_eq!(encode(&Value::Null).unwrap(), b"n");
    assert_eq!(encode(&Value::from(true)).unwrap(), b"t");
    assert_eq!(encode(&Value::from(false)).unwrap(), b"f");
}

#[test]
fn test_encode_mixed_key_dictionary() {
    // Binary keys precede text keys; binary keys sort byte-wise, so
    // spam precedes span.
    let encoded = encode(&mixed_dict_value()).unwrap();
    assert_eq!(encoded.len(), 30);
    assert_eq!(encoded, MIXED_DICT);
}

#[test]
fn test_encode_sorts_binary_before_text_with_shared_bytes() {
    let value = dict(vec![
        (Key::from("foo"), Value::from(true)),
        (Key::from(Bytes::from_static(b"foo")), Value::Null),
    ]);
    assert_eq!(encode(&value).unwrap(), b"d3:foonu3:foote");
}

#[test]
fn test_encode_empty_containers() {
    assert_eq!(encode(&Value::List(vec![])).unwrap(), b"le");
    assert_eq!(encode(&dict(vec![])).unwrap(), b"de");
}

#[test]
fn test_decode_mixed_key_dictionary() {
    let value = decode(MIXED_DICT).unwrap();
    let decoded = value.as_dictionary().unwrap();

    assert_eq!(decoded.len(), 3);
    assert_eq!(
        decoded.get(&Key::from(Bytes::from_static(b"spam"))),
        Some(&Value::from(true))
    );
    assert_eq!(
        decoded.get(&Key::from(Bytes::from_static(b"span"))),
        Some(&Value::Null)
    );
    assert_eq!(decoded.get(&Key::from("단팥")), Some(&Value::from(123i64)));
}

#[test]
fn test_decode_unordered_keys() {
    let input = b"d4:spann4:spamte";

    let err = decode(input).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::UnorderedDictionaryKeys);
    assert_eq!(err.position, 14);

    let options = DecodeOptions {
        on_invalid_key_order: KeyOrderPolicy::Ignore,
        ..DecodeOptions::default()
    };
    let value = decode_with(input, &options).unwrap();
    let decoded = value.as_dictionary().unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(
        decoded.get(&Key::from(Bytes::from_static(b"span"))),
        Some(&Value::Null)
    );
    assert_eq!(
        decoded.get(&Key::from(Bytes::from_static(b"spam"))),
        Some(&Value::from(true))
    );
}

#[test]
fn test_decode_duplicate_keys() {
    let input = b"du1:ai1eu1:ai2ee";

    let err = decode(input).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::DuplicateDictionaryKeys);
    assert_eq!(err.position, 12);

    // With enforcement off, the default backing keeps the last value.
    let options = DecodeOptions {
        on_invalid_key_order: KeyOrderPolicy::Ignore,
        ..DecodeOptions::default()
    };
    let value = decode_with(input, &options).unwrap();
    assert_eq!(value.get(&Key::from("a")), Some(&Value::from(2i64)));
    assert_eq!(value.as_dictionary().unwrap().len(), 1);
}

#[test]
fn test_encode_into_short_buffer() {
    let mut buf = [0u8; 2];
    let result = encode_into(&Value::from(1i64), &mut buf, &EncodeOptions::default()).unwrap();
    assert_eq!(result, Encoded { written: 2, complete: false });
    assert_eq!(&buf, b"i1");
}

#[test]
fn test_encode_into_zero_length_buffer() {
    let result = encode_into(&Value::Null, &mut [], &EncodeOptions::default()).unwrap();
    assert_eq!(result, Encoded { written: 0, complete: false });

    let mut buf = [0u8; 1];
    let result = encode_into(&Value::Null, &mut buf, &EncodeOptions::default()).unwrap();
    assert_eq!(result, Encoded { written: 1, complete: true });
    assert_eq!(&buf, b"n");
}

#[test]
fn test_encode_into_is_resumable() {
    let value = mixed_dict_value();
    let full = encode(&value).unwrap();

    for n in 0..full.len() {
        let mut buf = vec![0u8; n];
        let result = encode_into(&value, &mut buf, &EncodeOptions::default()).unwrap();
        assert!(!result.complete);
        assert_eq!(result.written, n);
        assert_eq!(buf, full[..n]);
    }

    let mut buf = vec![0u8; estimate_size(&value)];
    let result = encode_into(&value, &mut buf, &EncodeOptions::default()).unwrap();
    assert!(result.complete);
    assert_eq!(&buf[..result.written], full.as_slice());
}

#[test]
fn test_encode_key_into() {
    let mut buf = [0u8; 16];

    let result = encode_key_into(&Key::from("foo"), &mut buf);
    assert_eq!(result, Encoded { written: 6, complete: true });
    assert_eq!(&buf[..6], b"u3:foo");

    let result = encode_key_into(&Key::from(Bytes::from_static(b"spam")), &mut buf);
    assert_eq!(result, Encoded { written: 6, complete: true });
    assert_eq!(&buf[..6], b"4:spam");

    let mut short = [0u8; 3];
    let result = encode_key_into(&Key::from("foo"), &mut short);
    assert_eq!(result, Encoded { written: 3, complete: false });
    assert_eq!(&short, b"u3:");
}

#[test]
fn test_decode_key() {
    let (read, key) = decode_key(b"4:spam").unwrap();
    assert_eq!(read, 6);
    assert_eq!(key, Key::from(Bytes::from_static(b"spam")));

    let (read, key) = decode_key(b"u3:foo").unwrap();
    assert_eq!(read, 6);
    assert_eq!(key, Key::from("foo"));

    let err = decode_key(b"x").unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::NoBinaryLength);
    assert_eq!(err.position, 0);

    let err = decode_key(b"").unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::UnexpectedEndOfInput);
}

#[test]
fn test_roundtrip() {
    let values = vec![
        Value::Null,
        Value::from(true),
        Value::from(false),
        Value::from(0i64),
        Value::from(-456i64),
        Value::from(u64::MAX),
        Value::from(BigInt::from_str("-123456789012345678901234567890").unwrap()),
        Value::from(""),
        Value::from("hello"),
        Value::from("단팥"),
        Value::from("e\u{301}"),
        Value::from(Vec::<u8>::new()),
        Value::from(b"spam".as_slice()),
        Value::from(vec![0u8; 1024]),
        Value::List(vec![]),
        Value::List(vec![Value::Null, Value::from(1i64), Value::from("x")]),
        dict(vec![]),
        mixed_dict_value(),
        dict(vec![
            (Key::from(Bytes::new()), Value::Null),
            (Key::from(vec![0u8; 1024]), Value::from(7i64)),
            (
                Key::from("nested"),
                dict(vec![(Key::from("inner"), Value::List(vec![Value::Null]))]),
            ),
        ]),
    ];

    for value in values {
        let encoded = encode(&value).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, value, "round-trip failed for {value:?}");
    }
}

#[test]
fn test_canonical_bytes_reencode_identically() {
    let canonical: [&[u8]; 11] = [
        b"n",
        b"t",
        b"f",
        b"i0e",
        b"i-456e",
        b"0:",
        b"u0:",
        b"le",
        b"de",
        b"l4:spamu4:spame",
        MIXED_DICT,
    ];
    for bytes in canonical {
        let decoded = decode(bytes).unwrap();
        assert_eq!(encode(&decoded).unwrap(), bytes);
    }
}

#[test]
fn test_encode_is_deterministic() {
    let value = mixed_dict_value();
    assert_eq!(encode(&value).unwrap(), encode(&value).unwrap());

    // The same mapping behind a different backing encodes to the same
    // canonical bytes.
    let tree: BTreeMap<Key, Value> = [
        (Key::from("단팥"), Value::from(123i64)),
        (Key::from(Bytes::from_static(b"span")), Value::Null),
        (Key::from(Bytes::from_static(b"spam")), Value::from(true)),
    ]
    .into_iter()
    .collect();
    assert_eq!(encode(&Value::from(tree)).unwrap(), MIXED_DICT);
}

#[test]
fn test_estimate_matches_encoded_length() {
    let values = vec![
        Value::Null,
        Value::from(-456i64),
        Value::from("단팥"),
        Value::from(vec![1u8; 100]),
        mixed_dict_value(),
        Value::List(vec![mixed_dict_value(), Value::from(0i64)]),
    ];
    for value in values {
        let encoded = encode(&value).unwrap();
        assert_eq!(estimate_size(&value), encoded.len());
        assert!(estimate_size_with(&value, EstimateAccuracy::FastGuess) >= encoded.len());
    }
}

#[test]
fn test_estimate_bounds_duplicate_heavy_backings() {
    // Skipped duplicates are still counted, so the estimate may
    // overshoot but never undershoots.
    let value = Value::Dictionary(Box::new(PairList(vec![
        (Key::from("a"), Value::from(1i64)),
        (Key::from("a"), Value::from(2i64)),
    ])));
    let options = EncodeOptions {
        on_duplicate_keys: DuplicateKeyPolicy::UseFirst,
        ..EncodeOptions::default()
    };
    let encoded = encode_with(&value, &options).unwrap();
    assert!(estimate_size(&value) > encoded.len());
}

#[test]
fn test_duplicate_key_policies() {
    let value = Value::Dictionary(Box::new(PairList(vec![
        (Key::from("a"), Value::from(1i64)),
        (Key::from("a"), Value::from(2i64)),
    ])));

    let err = encode(&value).unwrap_err();
    assert_eq!(err, EncodeError::DuplicateKey(Key::from("a")));

    let first = EncodeOptions {
        on_duplicate_keys: DuplicateKeyPolicy::UseFirst,
        ..EncodeOptions::default()
    };
    assert_eq!(encode_with(&value, &first).unwrap(), b"du1:ai1ee");

    let last = EncodeOptions {
        on_duplicate_keys: DuplicateKeyPolicy::UseLast,
        ..EncodeOptions::default()
    };
    assert_eq!(encode_with(&value, &last).unwrap(), b"du1:ai2ee");
}

#[test]
fn test_speculative_option_is_byte_exact() {
    let speculative = EncodeOptions {
        speculative: true,
        ..EncodeOptions::default()
    };
    let values = [
        Value::from("단팥"),
        mixed_dict_value(),
        Value::List(vec![Value::from("a"), Value::from("\u{10000}")]),
    ];
    for value in values {
        assert_eq!(
            encode_with(&value, &speculative).unwrap(),
            encode(&value).unwrap()
        );
    }
}

#[test]
fn test_decode_value_leaves_trailing_input() {
    let (read, value) = decode_value(b"i42etrailing", &DecodeOptions::default()).unwrap();
    assert_eq!(read, 4);
    assert_eq!(value, Value::from(42i64));

    let err = decode(b"i42etrailing").unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::UnexpectedByte(b't'));
    assert_eq!(err.position, 4);
}

#[test]
fn test_decode_error_positions() {
    let cases: [(&[u8], DecodeErrorKind, usize); 14] = [
        (b"", DecodeErrorKind::UnexpectedEndOfInput, 0),
        (b"x", DecodeErrorKind::UnexpectedByte(b'x'), 0),
        (b"ie", DecodeErrorKind::InvalidInteger, 1),
        (b"i-e", DecodeErrorKind::InvalidInteger, 2),
        (b"i42", DecodeErrorKind::NoIntegerSuffix, 3),
        (b"i42x", DecodeErrorKind::NoIntegerSuffix, 3),
        (b"3ab", DecodeErrorKind::NoBinaryDelimiter, 1),
        (b"3:ab", DecodeErrorKind::OverRunBinaryLength, 2),
        (b"uab", DecodeErrorKind::NoTextLength, 1),
        (b"u3ab", DecodeErrorKind::NoTextDelimiter, 2),
        (b"u3:ab", DecodeErrorKind::OverRunTextLength, 3),
        (b"li1e", DecodeErrorKind::NoListSuffix, 4),
        (b"d", DecodeErrorKind::NoDictionarySuffix, 1),
        (b"du1:a", DecodeErrorKind::UnexpectedEndOfInput, 5),
    ];

    for (input, kind, position) in cases {
        let err = decode(input).unwrap_err();
        assert_eq!(err.kind, kind, "kind mismatch for {input:?}");
        assert_eq!(err.position, position, "position mismatch for {input:?}");
        assert!(err.position <= input.len());
    }
}

#[test]
fn test_decode_rejects_invalid_utf8_text() {
    let err = decode(b"u1:\xff").unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::InvalidUtf8);
    assert_eq!(err.position, 3);
}

#[test]
fn test_decode_accepts_noncanonical_numbers() {
    // Emission is canonical, but the parser is permissive about
    // leading zeros and a signed zero.
    assert_eq!(decode(b"i007e").unwrap(), Value::from(7i64));
    assert_eq!(decode(b"i-0e").unwrap(), Value::from(0i64));
    assert_eq!(
        decode(b"03:abc").unwrap(),
        Value::from(b"abc".as_slice())
    );
    assert_eq!(decode(b"u03:abc").unwrap(), Value::from("abc"));
}

#[test]
fn test_decode_nesting_limits() {
    let mut deep_ok = Vec::new();
    deep_ok.extend(std::iter::repeat(b'l').take(64));
    deep_ok.extend(std::iter::repeat(b'e').take(64));
    assert!(decode(&deep_ok).is_ok());

    let mut too_deep = Vec::new();
    too_deep.extend(std::iter::repeat(b'l').take(100));
    too_deep.extend(std::iter::repeat(b'e').take(100));
    let err = decode(&too_deep).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::NestingTooDeep);
}

#[test]
fn test_custom_dictionary_constructor() {
    fn tree_backed(pairs: Vec<(Key, Value)>) -> Box<dyn Dictionary> {
        Box::new(pairs.into_iter().collect::<BTreeMap<Key, Value>>())
    }

    let options = DecodeOptions {
        on_invalid_key_order: KeyOrderPolicy::Error,
        dictionary_constructor: tree_backed,
    };
    let via_tree = decode_with(MIXED_DICT, &options).unwrap();
    let via_default = decode(MIXED_DICT).unwrap();

    // Equal as values despite the differing backings, and canonical
    // on re-encode.
    assert_eq!(via_tree, via_default);
    assert_eq!(encode(&via_tree).unwrap(), MIXED_DICT);
}

#[test]
fn test_decoded_tree_owns_its_bytes() {
    let mut input = b"l4:spamu3:fooe".to_vec();
    let value = decode(&input).unwrap();
    input.fill(0);

    let items = value.as_list().unwrap();
    assert_eq!(items[0], Value::from(b"spam".as_slice()));
    assert_eq!(items[1], Value::from("foo"));
}
