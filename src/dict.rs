use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;

use crate::key::Key;
use crate::value::Value;

/// Binary keys shorter than this live in the tree-backed fast bucket;
/// longer keys fall back to a linear scan.
pub(crate) const SHORT_KEY_THRESHOLD: usize = 32;

/// Read-only dictionary capabilities consumed by the encoder and
/// produced by the decoder.
///
/// A dictionary is a finite mapping from [`Key`] to [`Value`], unique
/// under key equality. Implementations are free to iterate in any
/// order; the encoder re-sorts entries into canonical key order before
/// emission, so iteration order is never observable on the wire.
///
/// Two implementations ship with the crate: [`BencodexDictionary`]
/// (the default, content-addressed) and `BTreeMap<Key, Value>`.
pub trait Dictionary: fmt::Debug + Send + Sync {
    /// Number of entries.
    fn len(&self) -> usize;

    /// True when the dictionary has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a value by key content.
    fn get(&self, key: &Key) -> Option<&Value>;

    /// True when a key with equal content is present.
    fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over all entries.
    fn entries(&self) -> Box<dyn Iterator<Item = (Key, &Value)> + '_>;

    /// Iterates over all keys.
    fn keys(&self) -> Box<dyn Iterator<Item = Key> + '_> {
        Box::new(self.entries().map(|(k, _)| k))
    }

    /// Iterates over all values.
    fn values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        Box::new(self.entries().map(|(_, v)| v))
    }

    /// Calls `f` with every (value, key) pair.
    fn for_each(&self, f: &mut dyn FnMut(&Value, &Key)) {
        for (key, value) in self.entries() {
            f(value, &key);
        }
    }

    /// Clones the dictionary behind a fresh box.
    fn clone_dictionary(&self) -> Box<dyn Dictionary>;
}

impl Clone for Box<dyn Dictionary> {
    fn clone(&self) -> Self {
        self.clone_dictionary()
    }
}

/// Deep equality over any two dictionary backings.
///
/// Equal sizes, and every entry of `a` has a content-equal key in `b`
/// mapped to an equal value. When `b.get` misses — a backing whose
/// lookup does not honor content equality for binary keys — the entry
/// is re-checked by a linear scan over `b`'s entries.
pub fn dictionaries_equal(a: &dyn Dictionary, b: &dyn Dictionary) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.entries().all(|(key, value)| match b.get(&key) {
        Some(found) => found == value,
        None => b.entries().any(|(bk, bv)| bk == key && bv == value),
    })
}

/// The default content-addressed dictionary.
///
/// Binary keys compare by content, never by reference or allocation
/// identity. Entries are held in three buckets: text keys, short
/// binary keys (under 32 bytes, in a tree keyed directly by the
/// bytes), and long binary keys (a vector scanned linearly on
/// lookup). Construction is the only mutation: duplicate keys resolve
/// last-write-wins and do not grow the size.
///
/// # Examples
///
/// ```
/// use bencodex::{BencodexDictionary, Dictionary, Key, Value};
/// use bytes::Bytes;
///
/// let dict = BencodexDictionary::from_entries([
///     (Key::from("count"), Value::from(2i64)),
///     (Key::from(Bytes::from_static(b"\x00\x01")), Value::Null),
/// ]);
///
/// assert_eq!(dict.len(), 2);
/// // Lookup is by content: a separately built key matches.
/// let probe = Key::from(vec![0u8, 1]);
/// assert_eq!(dict.get(&probe), Some(&Value::Null));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BencodexDictionary {
    text: BTreeMap<String, Value>,
    short_binary: BTreeMap<Bytes, Value>,
    long_binary: Vec<(Bytes, Value)>,
}

impl BencodexDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from (key, value) pairs.
    ///
    /// Pairs with equal keys collapse deterministically to the last
    /// one supplied.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Key, Value)>,
    {
        let mut dict = Self::new();
        for (key, value) in entries {
            dict.insert(key, value);
        }
        dict
    }

    fn insert(&mut self, key: Key, value: Value) {
        match key {
            Key::Text(s) => {
                self.text.insert(s, value);
            }
            Key::Binary(b) if b.len() < SHORT_KEY_THRESHOLD => {
                self.short_binary.insert(b, value);
            }
            Key::Binary(b) => {
                match self.long_binary.iter().position(|(k, _)| *k == b) {
                    Some(i) => self.long_binary[i].1 = value,
                    None => self.long_binary.push((b, value)),
                }
            }
        }
    }
}

impl FromIterator<(Key, Value)> for BencodexDictionary {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl Dictionary for BencodexDictionary {
    fn len(&self) -> usize {
        self.text.len() + self.short_binary.len() + self.long_binary.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        match key {
            Key::Text(s) => self.text.get(s),
            Key::Binary(b) if b.len() < SHORT_KEY_THRESHOLD => self.short_binary.get(b),
            Key::Binary(b) => self
                .long_binary
                .iter()
                .find(|(k, _)| k == b)
                .map(|(_, v)| v),
        }
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Key, &Value)> + '_> {
        let text = self.text.iter().map(|(k, v)| (Key::Text(k.clone()), v));
        let short = self
            .short_binary
            .iter()
            .map(|(k, v)| (Key::Binary(k.clone()), v));
        let long = self
            .long_binary
            .iter()
            .map(|(k, v)| (Key::Binary(k.clone()), v));
        Box::new(text.chain(short).chain(long))
    }

    fn clone_dictionary(&self) -> Box<dyn Dictionary> {
        Box::new(self.clone())
    }
}

impl PartialEq for BencodexDictionary {
    fn eq(&self, other: &Self) -> bool {
        dictionaries_equal(self, other)
    }
}

impl Eq for BencodexDictionary {}

/// The plain-map backing: canonical iteration order, content equality
/// via `Key`'s `Ord`.
impl Dictionary for BTreeMap<Key, Value> {
    fn len(&self) -> usize {
        self.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.get(key)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Key, &Value)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.clone(), v)))
    }

    fn clone_dictionary(&self) -> Box<dyn Dictionary> {
        Box::new(self.clone())
    }
}
