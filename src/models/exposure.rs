//! UV and pollen exposure readings

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// UV record from the exposure provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UvReading {
    /// UV index, typically 0-11+
    pub index: Option<f64>,
    /// Upstream label; kept apart from the band derived from `index`
    pub level: Option<String>,
}

/// Pollen concentrations keyed by pollen type, in arrival order.
///
/// The key set is open. Null and non-numeric values are dropped while decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollenReading {
    entries: Vec<(String, f64)>,
}

impl PollenReading {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, replacing an existing entry with the same key in place
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.iter().find(|(key, _)| *key == name).map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest finite concentration across all keys
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.iter()
            .map(|(_, value)| value)
            .filter(|value| value.is_finite())
            .fold(None, |max, value| match max {
                Some(current) if current >= value => Some(current),
                _ => Some(value),
            })
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for PollenReading {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut reading = PollenReading::new();
        for (name, value) in iter {
            reading.insert(name, value);
        }
        reading
    }
}

impl Serialize for PollenReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PollenReading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PollenVisitor;

        impl<'de> Visitor<'de> for PollenVisitor {
            type Value = PollenReading;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of pollen type to concentration")
            }

            fn visit_map<A>(self, mut access: A) -> Result<PollenReading, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut reading = PollenReading::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    match value.as_f64() {
                        Some(number) => reading.insert(name, number),
                        None if value.is_null() => {}
                        None => warn!("Ignoring non-numeric {} pollen value: {}", name, value),
                    }
                }
                Ok(reading)
            }
        }

        deserializer.deserialize_map(PollenVisitor)
    }
}
