use crate::dict::Dictionary;
use crate::error::EncodeError;
use crate::estimate::estimate_size;
use crate::key::Key;
use crate::value::Value;

/// What to do when a dictionary backing yields two entries with equal
/// keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    /// Fail with [`EncodeError::DuplicateKey`].
    #[default]
    Error,
    /// Keep the entry that was yielded first.
    UseFirst,
    /// Keep the entry that was yielded last.
    UseLast,
}

/// Per-call encoder configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Duplicate-key handling; defaults to [`DuplicateKeyPolicy::Error`].
    pub on_duplicate_keys: DuplicateKeyPolicy,
    /// Permits the encoder to emit tentative text length prefixes and
    /// patch them once the precise byte length is known. Accepted for
    /// callers porting from environments where text length is only
    /// discovered during transcoding; here the UTF-8 length is known
    /// up front, so the tentative prefix is already exact and the
    /// emitted bytes are identical either way.
    pub speculative: bool,
}

/// Outcome of writing into a caller-supplied buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    /// Bytes written, starting at offset 0.
    pub written: usize,
    /// False when the buffer was too small; `written` then counts the
    /// prefix that fit.
    pub complete: bool,
}

/// A bounded writer over a caller-supplied buffer.
///
/// Writes never pass the end of the buffer; a chunk that does not fit
/// is written partially and flips `complete` off.
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
    complete: bool,
}

impl<'a> SliceWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            written: 0,
            complete: true,
        }
    }

    fn push(&mut self, byte: u8) {
        if self.written < self.buf.len() {
            self.buf[self.written] = byte;
            self.written += 1;
        } else {
            self.complete = false;
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        let space = self.buf.len() - self.written;
        let n = bytes.len().min(space);
        self.buf[self.written..self.written + n].copy_from_slice(&bytes[..n]);
        self.written += n;
        if n < bytes.len() {
            self.complete = false;
        }
    }

    fn finish(&self) -> Encoded {
        Encoded {
            written: self.written,
            complete: self.complete,
        }
    }
}

/// Encodes a value into its canonical byte string.
///
/// The output buffer is sized once from [`estimate_size`] and trimmed
/// to the bytes written.
///
/// # Errors
///
/// Returns [`EncodeError::DuplicateKey`] if a dictionary backing
/// yields equal keys (only possible with a custom [`Dictionary`]
/// implementation; the built-in backings deduplicate at
/// construction).
///
/// # Examples
///
/// ```
/// use bencodex::{encode, BencodexDictionary, Key, Value};
///
/// let dict = BencodexDictionary::from_entries([
///     (Key::from("foo"), Value::from(true)),
/// ]);
/// assert_eq!(encode(&Value::from(dict)).unwrap(), b"du3:foote");
///
/// assert_eq!(encode(&Value::from(123i64)).unwrap(), b"i123e");
/// assert_eq!(encode(&Value::from(-456i64)).unwrap(), b"i-456e");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    encode_with(value, &EncodeOptions::default())
}

/// [`encode`] with explicit options.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let mut buf = vec![0u8; estimate_size(value)];
    let result = encode_into(value, &mut buf, options)?;
    debug_assert!(result.complete);
    buf.truncate(result.written);
    Ok(buf)
}

/// Encodes a value into a caller-supplied buffer, starting at offset 0.
///
/// Writes as much of the canonical encoding as fits and never past
/// `buf.len()`. On `complete = false` the caller may retry from
/// scratch with a buffer of at least [`estimate_size`] bytes; the
/// bytes already written are a prefix of the full encoding.
/// Duplicate-key detection runs even past the truncation point, so a
/// given (value, options) pair deterministically either errors or
/// encodes, independent of buffer size.
///
/// # Examples
///
/// ```
/// use bencodex::{encode_into, EncodeOptions, Value};
///
/// let mut small = [0u8; 2];
/// let result = encode_into(&Value::from(1i64), &mut small, &EncodeOptions::default()).unwrap();
/// assert_eq!(result.written, 2);
/// assert!(!result.complete);
/// assert_eq!(&small, b"i1");
/// ```
pub fn encode_into(
    value: &Value,
    buf: &mut [u8],
    options: &EncodeOptions,
) -> Result<Encoded, EncodeError> {
    let mut writer = SliceWriter::new(buf);
    write_value(value, &mut writer, options)?;
    Ok(writer.finish())
}

/// Encodes a bare key into a caller-supplied buffer, with the same
/// truncation contract as [`encode_into`]. Key emission cannot fail.
pub fn encode_key_into(key: &Key, buf: &mut [u8]) -> Encoded {
    let mut writer = SliceWriter::new(buf);
    write_key(key, &mut writer);
    writer.finish()
}

fn write_value(
    value: &Value,
    writer: &mut SliceWriter<'_>,
    options: &EncodeOptions,
) -> Result<(), EncodeError> {
    match value {
        Value::Null => writer.push(b'n'),
        Value::Boolean(true) => writer.push(b't'),
        Value::Boolean(false) => writer.push(b'f'),
        Value::Integer(i) => {
            writer.push(b'i');
            // BigInt renders the minimal decimal form: no leading
            // zeros, no `+`, and zero without a sign.
            writer.write(i.to_string().as_bytes());
            writer.push(b'e');
        }
        Value::Binary(b) => {
            writer.write(b.len().to_string().as_bytes());
            writer.push(b':');
            writer.write(b);
        }
        Value::Text(s) => write_text(s, writer),
        Value::List(items) => {
            writer.push(b'l');
            for item in items {
                write_value(item, writer, options)?;
            }
            writer.push(b'e');
        }
        Value::Dictionary(d) => write_dictionary(d.as_ref(), writer, options)?,
    }
    Ok(())
}

fn write_key(key: &Key, writer: &mut SliceWriter<'_>) {
    match key {
        Key::Binary(b) => {
            writer.write(b.len().to_string().as_bytes());
            writer.push(b':');
            writer.write(b);
        }
        Key::Text(s) => write_text(s, writer),
    }
}

fn write_text(s: &str, writer: &mut SliceWriter<'_>) {
    // The length prefix is the UTF-8 byte length, not the character
    // or code unit count.
    writer.push(b'u');
    writer.write(s.len().to_string().as_bytes());
    writer.push(b':');
    writer.write(s.as_bytes());
}

fn write_dictionary(
    dict: &dyn Dictionary,
    writer: &mut SliceWriter<'_>,
    options: &EncodeOptions,
) -> Result<(), EncodeError> {
    let mut triples: Vec<(Key, &Value, usize)> = dict
        .entries()
        .enumerate()
        .map(|(index, (key, value))| (key, value, index))
        .collect();

    // Canonical key order, with the insertion index breaking ties so
    // that the first surviving copy of a duplicate is the one the
    // policy keeps.
    triples.sort_by(|a, b| {
        a.0.cmp(&b.0).then_with(|| match options.on_duplicate_keys {
            DuplicateKeyPolicy::UseLast => b.2.cmp(&a.2),
            DuplicateKeyPolicy::Error | DuplicateKeyPolicy::UseFirst => a.2.cmp(&b.2),
        })
    });

    writer.push(b'd');
    let mut previous: Option<&Key> = None;
    for (key, value, _) in &triples {
        if previous == Some(key) {
            match options.on_duplicate_keys {
                DuplicateKeyPolicy::Error => {
                    return Err(EncodeError::DuplicateKey(key.clone()));
                }
                DuplicateKeyPolicy::UseFirst | DuplicateKeyPolicy::UseLast => continue,
            }
        }
        write_key(key, writer);
        write_value(value, writer, options)?;
        previous = Some(key);
    }
    writer.push(b'e');
    Ok(())
}
