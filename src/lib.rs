//! bencodex - a Bencodex serialization library
//!
//! Bencodex is an ordered, canonical variant of Bencode with explicit
//! text/binary discrimination, booleans, null, arbitrary-precision
//! integers, and canonically ordered dictionaries. Every value has
//! exactly one encoding, and the decoder rejects non-canonical key
//! order by default.
//!
//! # Overview
//!
//! - [`Value`] / [`Key`] - the value model and the canonical key order
//! - [`Dictionary`] / [`BencodexDictionary`] - content-addressed
//!   dictionaries with pluggable backings
//! - [`encode`] / [`encode_into`] - canonical one-shot and resumable
//!   buffer encoding
//! - [`decode`] / [`decode_value`] / [`decode_key`] - strict decoding
//!   with positioned errors
//! - [`estimate_size`] - exact or upper-bound output sizing
//!
//! # Examples
//!
//! ```
//! use bencodex::{decode, encode, BencodexDictionary, Key, Value};
//!
//! let dict = BencodexDictionary::from_entries([
//!     (Key::from("foo"), Value::from(true)),
//! ]);
//! let value = Value::from(dict);
//!
//! let bytes = encode(&value).unwrap();
//! assert_eq!(bytes, b"du3:foote");
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

mod ascii;
mod decode;
mod dict;
mod encode;
mod error;
mod estimate;
mod key;
mod value;

pub use decode::{
    decode, decode_key, decode_value, decode_with, DecodeOptions, DictionaryConstructor,
    KeyOrderPolicy,
};
pub use dict::{dictionaries_equal, BencodexDictionary, Dictionary};
pub use encode::{
    encode, encode_into, encode_key_into, encode_with, DuplicateKeyPolicy, EncodeOptions, Encoded,
};
pub use error::{DecodeError, DecodeErrorKind, EncodeError};
pub use estimate::{estimate_key_size, estimate_size, estimate_size_with, EstimateAccuracy};
pub use key::Key;
pub use value::Value;

#[cfg(test)]
mod tests;
