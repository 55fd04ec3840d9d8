use std::collections::BTreeMap;

use bytes::Bytes;
use num_bigint::BigInt;

use crate::dict::{dictionaries_equal, BencodexDictionary, Dictionary};
use crate::key::Key;

/// A Bencodex value.
///
/// Bencodex has seven data types: null, booleans, arbitrary-precision
/// integers, binary blobs, Unicode text, lists, and dictionaries. The
/// grammar is closed; in particular there is no floating-point case.
///
/// # Examples
///
/// ```
/// use bencodex::Value;
///
/// // Creating values directly
/// let int = Value::from(42i64);
/// let text = Value::from("hello");
/// let list = Value::List(vec![Value::Null, Value::from(true)]);
///
/// // Accessing values
/// assert_eq!(int.as_integer().map(|i| i.to_string()), Some("42".into()));
/// assert_eq!(text.as_text(), Some("hello"));
/// assert_eq!(list.as_list().map(|l| l.len()), Some(2));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// The null atom.
    Null,
    /// A boolean atom.
    Boolean(bool),
    /// A signed integer of arbitrary magnitude.
    Integer(BigInt),
    /// A byte string (may or may not be valid UTF-8).
    Binary(Bytes),
    /// A Unicode string.
    Text(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A mapping from keys to values, unique under key equality.
    Dictionary(Box<dyn Dictionary>),
}

impl Value {
    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the value as a boolean, if it is one.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer, if it is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodex::Value;
    /// use num_bigint::BigInt;
    ///
    /// let int = Value::from(-7i64);
    /// assert_eq!(int.as_integer(), Some(&BigInt::from(-7)));
    /// assert_eq!(Value::Null.as_integer(), None);
    /// ```
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the value as a binary blob, if it is one.
    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as text, if it is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodex::Value;
    ///
    /// assert_eq!(Value::from("hello").as_text(), Some("hello"));
    /// assert_eq!(Value::from(42i64).as_text(), None);
    /// ```
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a list, if it is one.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value as a dictionary reference, if it is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodex::{decode, Dictionary, Key};
    ///
    /// let value = decode(b"du3:foote").unwrap();
    /// let dict = value.as_dictionary().unwrap();
    /// assert!(dict.contains_key(&Key::from("foo")));
    /// ```
    pub fn as_dictionary(&self) -> Option<&dyn Dictionary> {
        match self {
            Value::Dictionary(d) => Some(d.as_ref()),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    pub fn into_dictionary(self) -> Option<Box<dyn Dictionary>> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// Returns `None` if the value is not a dictionary or if the key
    /// is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodex::{decode, Key};
    ///
    /// let value = decode(b"du3:foou3:bare").unwrap();
    /// let bar = value.get(&Key::from("foo"));
    /// assert_eq!(bar.and_then(|v| v.as_text()), Some("bar"));
    /// assert_eq!(value.get(&Key::from("missing")), None);
    /// ```
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.as_dictionary()?.get(key)
    }
}

impl PartialEq for Value {
    /// Deep structural equality.
    ///
    /// Dictionaries compare by content across backings, so a decoded
    /// [`BencodexDictionary`] equals a hand-built `BTreeMap` holding
    /// the same entries.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => {
                dictionaries_equal(a.as_ref(), b.as_ref())
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(BigInt::from(i))
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Value::Integer(BigInt::from(i))
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Binary(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Binary(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Binary(Bytes::from(b))
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Text(s) => Value::Text(s),
            Key::Binary(b) => Value::Binary(b),
        }
    }
}

impl From<BencodexDictionary> for Value {
    fn from(d: BencodexDictionary) -> Self {
        Value::Dictionary(Box::new(d))
    }
}

impl From<BTreeMap<Key, Value>> for Value {
    fn from(d: BTreeMap<Key, Value>) -> Self {
        Value::Dictionary(Box::new(d))
    }
}
