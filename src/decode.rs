use bytes::Bytes;
use num_bigint::{BigInt, Sign};

use crate::ascii::{parse_natural_bigint, parse_natural_u64};
use crate::dict::{BencodexDictionary, Dictionary};
use crate::error::{DecodeError, DecodeErrorKind};
use crate::key::Key;
use crate::value::Value;

const MAX_DEPTH: usize = 64;

/// What to do when dictionary keys arrive out of canonical order or
/// duplicated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyOrderPolicy {
    /// Reject with [`DecodeErrorKind::UnorderedDictionaryKeys`] or
    /// [`DecodeErrorKind::DuplicateDictionaryKeys`].
    #[default]
    Error,
    /// Accept the input; with the default dictionary backing,
    /// duplicate keys resolve to the last value seen.
    Ignore,
}

/// Builds the dictionary backing for each decoded dictionary.
pub type DictionaryConstructor = fn(Vec<(Key, Value)>) -> Box<dyn Dictionary>;

/// Per-call decoder configuration.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Key ordering enforcement; defaults to [`KeyOrderPolicy::Error`].
    pub on_invalid_key_order: KeyOrderPolicy,
    /// Backing container for decoded dictionaries; defaults to
    /// [`BencodexDictionary`].
    pub dictionary_constructor: DictionaryConstructor,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            on_invalid_key_order: KeyOrderPolicy::Error,
            dictionary_constructor: content_addressed,
        }
    }
}

fn content_addressed(entries: Vec<(Key, Value)>) -> Box<dyn Dictionary> {
    Box::new(BencodexDictionary::from_entries(entries))
}

/// Decodes a byte slice holding exactly one Bencodex value.
///
/// Trailing bytes are rejected with
/// [`DecodeErrorKind::UnexpectedByte`] at the first trailing offset.
///
/// # Errors
///
/// Returns a [`DecodeError`] carrying the byte offset at which
/// parsing stopped.
///
/// # Examples
///
/// ```
/// use bencodex::{decode, Value};
///
/// assert_eq!(decode(b"n").unwrap(), Value::Null);
/// assert_eq!(decode(b"i-456e").unwrap(), Value::from(-456i64));
/// assert_eq!(decode(b"u3:foo").unwrap(), Value::from("foo"));
///
/// let list = decode(b"li1ei2ee").unwrap();
/// assert_eq!(list.as_list().unwrap().len(), 2);
/// ```
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    decode_with(data, &DecodeOptions::default())
}

/// [`decode`] with explicit options.
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let (read, value) = decode_value(data, options)?;
    if read != data.len() {
        return Err(DecodeError::new(
            DecodeErrorKind::UnexpectedByte(data[read]),
            read,
        ));
    }
    Ok(value)
}

/// Decodes one value from the front of `data` without requiring the
/// input to end there.
///
/// Returns the number of bytes consumed alongside the value.
///
/// # Examples
///
/// ```
/// use bencodex::{decode_value, DecodeOptions, Value};
///
/// let (read, value) = decode_value(b"i42etrailing", &DecodeOptions::default()).unwrap();
/// assert_eq!(read, 4);
/// assert_eq!(value, Value::from(42i64));
/// ```
pub fn decode_value(
    data: &[u8],
    options: &DecodeOptions,
) -> Result<(usize, Value), DecodeError> {
    let mut pos = 0;
    let value = parse_value(data, &mut pos, options, 0)?;
    Ok((pos, value))
}

/// Decodes one dictionary key from the front of `data`.
pub fn decode_key(data: &[u8]) -> Result<(usize, Key), DecodeError> {
    let mut pos = 0;
    let key = parse_key(data, &mut pos)?;
    Ok((pos, key))
}

fn parse_value(
    data: &[u8],
    pos: &mut usize,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::new(DecodeErrorKind::NestingTooDeep, *pos));
    }

    match data.get(*pos).copied() {
        None => Err(DecodeError::new(
            DecodeErrorKind::UnexpectedEndOfInput,
            *pos,
        )),
        Some(b'n') => {
            *pos += 1;
            Ok(Value::Null)
        }
        Some(b't') => {
            *pos += 1;
            Ok(Value::Boolean(true))
        }
        Some(b'f') => {
            *pos += 1;
            Ok(Value::Boolean(false))
        }
        Some(b'i') => parse_integer(data, pos),
        Some(b'u') => Ok(Value::Text(parse_text_payload(data, pos)?)),
        Some(b'0'..=b'9') => Ok(Value::Binary(parse_binary_payload(data, pos)?)),
        Some(b'l') => parse_list(data, pos, options, depth),
        Some(b'd') => parse_dictionary(data, pos, options, depth),
        Some(byte) => Err(DecodeError::new(DecodeErrorKind::UnexpectedByte(byte), *pos)),
    }
}

fn parse_key(data: &[u8], pos: &mut usize) -> Result<Key, DecodeError> {
    match data.get(*pos).copied() {
        None => Err(DecodeError::new(
            DecodeErrorKind::UnexpectedEndOfInput,
            *pos,
        )),
        Some(b'u') => Ok(Key::Text(parse_text_payload(data, pos)?)),
        Some(_) => Ok(Key::Binary(parse_binary_payload(data, pos)?)),
    }
}

fn parse_integer(data: &[u8], pos: &mut usize) -> Result<Value, DecodeError> {
    *pos += 1;

    let negative = data.get(*pos) == Some(&b'-');
    if negative {
        *pos += 1;
    }

    let Some((read, magnitude)) = parse_natural_bigint(&data[*pos..]) else {
        return Err(DecodeError::new(DecodeErrorKind::InvalidInteger, *pos));
    };
    *pos += read;

    if data.get(*pos) != Some(&b'e') {
        return Err(DecodeError::new(DecodeErrorKind::NoIntegerSuffix, *pos));
    }
    *pos += 1;

    // `from_biguint` drops the sign of a zero magnitude, so `i-0e`
    // normalizes to zero.
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    Ok(Value::Integer(BigInt::from_biguint(sign, magnitude)))
}

fn parse_binary_payload(data: &[u8], pos: &mut usize) -> Result<Bytes, DecodeError> {
    let Some((read, length)) = parse_natural_u64(&data[*pos..]) else {
        return Err(DecodeError::new(DecodeErrorKind::NoBinaryLength, *pos));
    };
    *pos += read;

    if data.get(*pos) != Some(&b':') {
        return Err(DecodeError::new(DecodeErrorKind::NoBinaryDelimiter, *pos));
    }
    *pos += 1;

    if length > (data.len() - *pos) as u64 {
        return Err(DecodeError::new(DecodeErrorKind::OverRunBinaryLength, *pos));
    }
    let length = length as usize;

    // Copy the payload out so the decoded tree owns its bytes and the
    // caller's input buffer can be dropped freely.
    let bytes = Bytes::copy_from_slice(&data[*pos..*pos + length]);
    *pos += length;
    Ok(bytes)
}

fn parse_text_payload(data: &[u8], pos: &mut usize) -> Result<String, DecodeError> {
    *pos += 1;

    let Some((read, length)) = parse_natural_u64(&data[*pos..]) else {
        return Err(DecodeError::new(DecodeErrorKind::NoTextLength, *pos));
    };
    *pos += read;

    if data.get(*pos) != Some(&b':') {
        return Err(DecodeError::new(DecodeErrorKind::NoTextDelimiter, *pos));
    }
    *pos += 1;

    if length > (data.len() - *pos) as u64 {
        return Err(DecodeError::new(DecodeErrorKind::OverRunTextLength, *pos));
    }
    let length = length as usize;

    let text = std::str::from_utf8(&data[*pos..*pos + length])
        .map_err(|_| DecodeError::new(DecodeErrorKind::InvalidUtf8, *pos))?;
    *pos += length;
    Ok(text.to_owned())
}

fn parse_list(
    data: &[u8],
    pos: &mut usize,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    *pos += 1;
    let mut items = Vec::new();

    loop {
        match data.get(*pos).copied() {
            None => return Err(DecodeError::new(DecodeErrorKind::NoListSuffix, *pos)),
            Some(b'e') => {
                *pos += 1;
                return Ok(Value::List(items));
            }
            Some(_) => items.push(parse_value(data, pos, options, depth + 1)?),
        }
    }
}

fn parse_dictionary(
    data: &[u8],
    pos: &mut usize,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    *pos += 1;
    let mut pairs: Vec<(Key, Value)> = Vec::new();

    loop {
        match data.get(*pos).copied() {
            None => return Err(DecodeError::new(DecodeErrorKind::NoDictionarySuffix, *pos)),
            Some(b'e') => {
                *pos += 1;
                let dict = (options.dictionary_constructor)(pairs);
                return Ok(Value::Dictionary(dict));
            }
            Some(_) => {
                let key = parse_key(data, pos)?;

                if options.on_invalid_key_order == KeyOrderPolicy::Error {
                    if let Some((previous, _)) = pairs.last() {
                        match previous.cmp(&key) {
                            std::cmp::Ordering::Greater => {
                                return Err(DecodeError::new(
                                    DecodeErrorKind::UnorderedDictionaryKeys,
                                    *pos,
                                ));
                            }
                            std::cmp::Ordering::Equal => {
                                return Err(DecodeError::new(
                                    DecodeErrorKind::DuplicateDictionaryKeys,
                                    *pos,
                                ));
                            }
                            std::cmp::Ordering::Less => {}
                        }
                    }
                }

                let value = parse_value(data, pos, options, depth + 1)?;
                pairs.push((key, value));
            }
        }
    }
}
