use std::collections::hash_map;
use std::collections::HashMap;

use crate::document::RawProperty;

/// A single custom property: its textual value and the declared Tiled type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Property {
    /// Value exactly as written in the file.
    pub value: String,
    /// Declared type ("string", "int", "bool", ...). Not checked against `value`.
    pub kind: String,
}

/// Custom properties keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Properties {
    entries: HashMap<String, Property>,
}

impl Properties {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from a raw property list. Later duplicates win.
    pub fn parse(raw: &[RawProperty]) -> Self {
        let mut out = Self::new();
        for prop in raw {
            out.insert(
                prop.name.clone(),
                Property {
                    value: prop.value.clone(),
                    kind: prop.kind.clone(),
                },
            );
        }
        out
    }

    /// Sets `name`, returning the previous entry.
    pub fn insert(&mut self, name: impl Into<String>, property: Property) -> Option<Property> {
        self.entries.insert(name.into(), property)
    }

    /// Looks up a property by name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries.get(name)
    }

    /// Mutable lookup, for editing a value in place.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.entries.get_mut(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, Property> {
        self.entries.iter()
    }

    /// Raw text of `name`.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.value.as_str())
    }

    /// `name` parsed as a bool; `None` if missing or unparsable.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.value.parse().ok()
    }

    /// Same as [`get_bool`](Self::get_bool), for integers.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.value.parse().ok()
    }

    /// Same as [`get_bool`](Self::get_bool), for floats.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name)?.value.parse().ok()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a Property);
    type IntoIter = hash_map::Iter<'a, String, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
