use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::qname::QName;

/// Extension attributes carried by every addressing type.
///
/// Insertion order is preserved so a decoded document re-encodes with its
/// attributes in the original order. Writes are last-write-wins; no history
/// is retained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionAttributes {
    entries: IndexMap<QName, String>,
}

impl ExtensionAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, returning the previous value if the name was
    /// already present. Re-setting keeps the attribute's original position.
    pub fn set(&mut self, name: QName, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name, value.into())
    }

    pub fn get(&self, name: &QName) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Removes an attribute, preserving the order of the remaining entries.
    pub fn remove(&mut self, name: &QName) -> Option<String> {
        self.entries.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QName, &str)> {
        self.entries.iter().map(|(name, value)| (name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Serialized as a plain map keyed by the lexical name, so reports and
// fixtures stay readable. The struct form of QName only appears where a
// name is a value, not a key.
impl Serialize for ExtensionAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(&name.lexical(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExtensionAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = ExtensionAttributes;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of lexical attribute names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut attributes = ExtensionAttributes::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    let name = QName::parse_lexical(&key).map_err(serde::de::Error::custom)?;
                    attributes.set(name, value);
                }
                Ok(attributes)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}
