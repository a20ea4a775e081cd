use crate::Value;

/// The key-ordering policy of an [`Object`], fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Keys are unique and iterated in key order. Inserting a duplicate key
    /// overwrites the prior value.
    #[default]
    Sorted,
    /// Entries keep their insertion order. Duplicate keys are permitted and
    /// all occurrences are retained.
    Insertion,
}

/// The mapping variant of [`Value`]: a sequence of `(key, value)` entries
/// governed by a [`KeyOrder`] policy.
///
/// Equality compares the entry sequences in their active iteration order; the
/// policy tag itself does not participate, so a sorted object equals an
/// insertion-ordered one holding the same entries in the same order.
#[derive(Debug, Clone, Default)]
pub struct Object {
    order: KeyOrder,
    entries: Vec<(String, Value)>,
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        // Entry sequences only; the policy tag does not participate.
        self.entries == other.entries
    }
}

impl Object {
    /// Creates an empty object with the given key-ordering policy.
    #[must_use]
    pub const fn new(order: KeyOrder) -> Self {
        Self {
            order,
            entries: Vec::new(),
        }
    }

    /// Creates an empty sorted/unique object.
    #[must_use]
    pub const fn sorted() -> Self {
        Self::new(KeyOrder::Sorted)
    }

    /// Creates an empty insertion-ordered object.
    #[must_use]
    pub const fn insertion() -> Self {
        Self::new(KeyOrder::Insertion)
    }

    /// Creates an empty object with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(order: KeyOrder, capacity: usize) -> Self {
        Self {
            order,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Builds an object by inserting `entries` one by one under `order`.
    ///
    /// For [`KeyOrder::Sorted`] a later duplicate overwrites the earlier
    /// entry; for [`KeyOrder::Insertion`] every entry is retained.
    #[must_use]
    pub fn from_entries<I, K>(order: KeyOrder, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let iter = entries.into_iter();
        let mut obj = Self::with_capacity(order, iter.size_hint().0);
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }

    /// The key-ordering policy this object was constructed with.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> KeyOrder {
        self.order
    }

    /// The number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the object has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry under this object's policy.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.order {
            KeyOrder::Sorted => {
                match self
                    .entries
                    .binary_search_by(|(k, _)| k.as_str().cmp(&key))
                {
                    Ok(i) => self.entries[i].1 = value,
                    Err(i) => self.entries.insert(i, (key, value)),
                }
            }
            KeyOrder::Insertion => self.entries.push((key, value)),
        }
    }

    /// Looks up a key.
    ///
    /// Under [`KeyOrder::Insertion`], duplicate keys resolve to the first
    /// occurrence in insertion order — the same policy the view navigator
    /// applies to encoded duplicates.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.order {
            KeyOrder::Sorted => self
                .entries
                .binary_search_by(|(k, _)| k.as_str().cmp(key))
                .ok()
                .map(|i| &self.entries[i].1),
            KeyOrder::Insertion => self
                .entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
        }
    }

    /// Mutable lookup; first occurrence under duplicate keys.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self.order {
            KeyOrder::Sorted => self
                .entries
                .binary_search_by(|(k, _)| k.as_str().cmp(key))
                .ok()
                .map(|i| &mut self.entries[i].1),
            KeyOrder::Insertion => self
                .entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
        }
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry for `key` and returns its value.
    ///
    /// Under [`KeyOrder::Insertion`] only the first occurrence is removed.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = match self.order {
            KeyOrder::Sorted => self
                .entries
                .binary_search_by(|(k, _)| k.as_str().cmp(key))
                .ok()?,
            KeyOrder::Insertion => self.entries.iter().position(|(k, _)| k == key)?,
        };
        Some(self.entries.remove(idx).1)
    }

    /// Iterates entries in the active iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Borrows the raw entry sequence.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Consumes the object and returns its entries.
    #[inline]
    #[must_use]
    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }
}

impl<K: Into<String>> Extend<(K, Value)> for Object {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
