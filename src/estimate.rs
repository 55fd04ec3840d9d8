use num_bigint::Sign;

use crate::ascii::{bigint_decimal_len, decimal_len};
use crate::key::Key;
use crate::value::Value;

/// How tight the size estimate should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EstimateAccuracy {
    /// Exact byte counts, equal to the encoded length whenever the
    /// value tree has no duplicate dictionary keys.
    #[default]
    BestEffort,
    /// Text sizes are bounded by three bytes per UTF-16 code unit
    /// instead of measured, trading tightness for throughput.
    FastGuess,
}

/// Upper-bounds the encoded size of a value in bytes.
///
/// With [`EstimateAccuracy::BestEffort`] (the default used here) the
/// result equals `encode(value).len()` exactly, unless a dictionary
/// backing yields duplicate keys — skipped duplicates are still
/// counted, so the estimate never undershoots.
///
/// # Examples
///
/// ```
/// use bencodex::{encode, estimate_size, Value};
///
/// let value = Value::List(vec![Value::from(-456i64), Value::from("단팥")]);
/// let encoded = encode(&value).unwrap();
/// assert_eq!(estimate_size(&value), encoded.len());
/// ```
pub fn estimate_size(value: &Value) -> usize {
    estimate_size_with(value, EstimateAccuracy::BestEffort)
}

/// [`estimate_size`] with an explicit accuracy mode.
pub fn estimate_size_with(value: &Value, accuracy: EstimateAccuracy) -> usize {
    match value {
        Value::Null | Value::Boolean(_) => 1,
        Value::Integer(i) => {
            let sign = usize::from(i.sign() == Sign::Minus);
            1 + sign + bigint_decimal_len(i.magnitude()) + 1
        }
        Value::Binary(b) => decimal_len(b.len() as u64) + 1 + b.len(),
        Value::Text(s) => text_size(s, accuracy),
        Value::List(items) => {
            2 + items
                .iter()
                .map(|item| estimate_size_with(item, accuracy))
                .sum::<usize>()
        }
        Value::Dictionary(d) => {
            2 + d
                .entries()
                .map(|(key, value)| {
                    estimate_key_size(&key, accuracy) + estimate_size_with(value, accuracy)
                })
                .sum::<usize>()
        }
    }
}

/// Upper-bounds the encoded size of a bare key.
pub fn estimate_key_size(key: &Key, accuracy: EstimateAccuracy) -> usize {
    match key {
        Key::Binary(b) => decimal_len(b.len() as u64) + 1 + b.len(),
        Key::Text(s) => text_size(s, accuracy),
    }
}

fn text_size(s: &str, accuracy: EstimateAccuracy) -> usize {
    let payload = match accuracy {
        EstimateAccuracy::BestEffort => s.len(),
        // Sound bound: a UTF-16 code unit expands to at most three
        // UTF-8 bytes (a surrogate pair to four, against six counted).
        EstimateAccuracy::FastGuess => 3 * s.encode_utf16().count(),
    };
    1 + decimal_len(payload as u64) + 1 + payload
}
