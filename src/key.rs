use std::cmp::Ordering;

use bytes::Bytes;

/// A dictionary key: Unicode text or a binary blob.
///
/// The two cases never compare equal, even when their byte
/// representations coincide: `Key::Text("spam")` and
/// `Key::Binary(b"spam")` are distinct keys and may coexist in one
/// dictionary.
///
/// # Examples
///
/// ```
/// use bencodex::Key;
/// use bytes::Bytes;
///
/// let text = Key::from("spam");
/// let binary = Key::from(Bytes::from_static(b"spam"));
/// assert_ne!(text, binary);
///
/// // Binary keys sort before text keys.
/// assert!(binary < text);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A Unicode string key.
    Text(String),
    /// A raw byte string key, compared by content.
    Binary(Bytes),
}

impl Key {
    /// Returns the text contents, if this is a text key.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Text(s) => Some(s),
            Key::Binary(_) => None,
        }
    }

    /// Returns the binary contents, if this is a binary key.
    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Key::Text(_) => None,
            Key::Binary(b) => Some(b),
        }
    }

    /// True for [`Key::Text`].
    pub fn is_text(&self) -> bool {
        matches!(self, Key::Text(_))
    }

    /// True for [`Key::Binary`].
    pub fn is_binary(&self) -> bool {
        matches!(self, Key::Binary(_))
    }
}

impl Ord for Key {
    /// The canonical Bencodex key order.
    ///
    /// All binary keys precede all text keys. Binary keys compare by
    /// byte-wise lexicographic order, a shorter prefix preceding its
    /// extensions. Text keys compare by their UTF-16 code unit
    /// sequences; for supplementary-plane text this differs from
    /// comparing the UTF-8 bytes, so the code units are compared
    /// directly.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Binary(a), Key::Binary(b)) => a.cmp(b),
            (Key::Binary(_), Key::Text(_)) => Ordering::Less,
            (Key::Text(_), Key::Binary(_)) => Ordering::Greater,
            (Key::Text(a), Key::Text(b)) => a.encode_utf16().cmp(b.encode_utf16()),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(s)
    }
}

impl From<Bytes> for Key {
    fn from(b: Bytes) -> Self {
        Key::Binary(b)
    }
}

impl From<&[u8]> for Key {
    fn from(b: &[u8]) -> Self {
        Key::Binary(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Key {
    fn from(b: Vec<u8>) -> Self {
        Key::Binary(Bytes::from(b))
    }
}
