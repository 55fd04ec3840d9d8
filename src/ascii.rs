//! ASCII decimal helpers shared by the encoder, decoder, and size
//! estimator.

use num_bigint::BigUint;

/// Reads the longest prefix of ASCII digits as a `u64`.
///
/// Returns the number of bytes consumed and the parsed value, or `None`
/// when the input does not start with a digit. Accumulation saturates;
/// a saturated length prefix always fails the caller's bounds check
/// against the remaining input. The terminating delimiter is left
/// unconsumed.
pub(crate) fn parse_natural_u64(data: &[u8]) -> Option<(usize, u64)> {
    let mut read = 0;
    let mut value: u64 = 0;
    while read < data.len() && data[read].is_ascii_digit() {
        let digit = u64::from(data[read] - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
        read += 1;
    }
    if read == 0 {
        None
    } else {
        Some((read, value))
    }
}

/// Reads the longest prefix of ASCII digits as an arbitrary-precision
/// natural number.
pub(crate) fn parse_natural_bigint(data: &[u8]) -> Option<(usize, BigUint)> {
    let read = data.iter().take_while(|b| b.is_ascii_digit()).count();
    if read == 0 {
        return None;
    }
    let value = BigUint::parse_bytes(&data[..read], 10)?;
    Some((read, value))
}

/// Number of ASCII digits in the decimal rendering of `n`.
pub(crate) fn decimal_len(mut n: u64) -> usize {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}

/// Decimal digit count of an arbitrary-precision natural number.
pub(crate) fn bigint_decimal_len(n: &BigUint) -> usize {
    n.to_str_radix(10).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_natural_u64() {
        assert_eq!(parse_natural_u64(b"0"), Some((1, 0)));
        assert_eq!(parse_natural_u64(b"123:"), Some((3, 123)));
        assert_eq!(parse_natural_u64(b"007e"), Some((3, 7)));
        assert_eq!(parse_natural_u64(b""), None);
        assert_eq!(parse_natural_u64(b":123"), None);
    }

    #[test]
    fn test_parse_natural_u64_saturates() {
        let (read, value) = parse_natural_u64(b"99999999999999999999999999").unwrap();
        assert_eq!(read, 26);
        assert_eq!(value, u64::MAX);
    }

    #[test]
    fn test_parse_natural_bigint() {
        let (read, value) = parse_natural_bigint(b"18446744073709551616e").unwrap();
        assert_eq!(read, 20);
        assert_eq!(value.to_string(), "18446744073709551616");
        assert_eq!(parse_natural_bigint(b"-1"), None);
    }

    #[test]
    fn test_decimal_len() {
        assert_eq!(decimal_len(0), 1);
        assert_eq!(decimal_len(9), 1);
        assert_eq!(decimal_len(10), 2);
        assert_eq!(decimal_len(999), 3);
        assert_eq!(decimal_len(u64::MAX), 20);
    }

    #[test]
    fn test_bigint_decimal_len() {
        use std::str::FromStr;

        assert_eq!(bigint_decimal_len(&BigUint::from(0u8)), 1);
        let big = BigUint::from_str("18446744073709551616").unwrap();
        assert_eq!(bigint_decimal_len(&big), 20);
    }
}
