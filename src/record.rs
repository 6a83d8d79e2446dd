//! Listing records produced by the extractor
//!
//! A record is a small ordered map from field name to text. Field order is the
//! order keys were first inserted, which is also the column order they take in
//! the exported table.

use indexmap::IndexMap;

/// Field holding the listing title
pub const NAME_FIELD: &str = "name";

/// Field holding the listing price
pub const PRICE_FIELD: &str = "price";

/// One marketplace listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    fields: IndexMap<String, String>,
}

impl ListingRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a record from its parts
    ///
    /// Parts are merged in the order name, info, price. A later key replaces
    /// the value of an earlier one, so an info cell labelled `name` replaces
    /// the extracted name, while the extracted price always wins.
    pub fn assemble<I>(name: String, info: I, price: String) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut record = Self::new();
        record.insert(NAME_FIELD, name);
        record.extend(info);
        record.insert(PRICE_FIELD, price);
        record
    }

    /// Inserts a field, overwriting the value of an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the value for a field, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Listing title
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_FIELD)
    }

    /// Listing price
    pub fn price(&self) -> Option<&str> {
        self.get(PRICE_FIELD)
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Extend<(String, String)> for ListingRecord {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.fields.extend(iter);
    }
}

impl FromIterator<(String, String)> for ListingRecord {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
