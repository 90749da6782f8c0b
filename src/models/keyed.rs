use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

/// A closed set of map keys with stable wire names.
pub trait UrlKey: Copy + Ord {
    fn as_key(&self) -> &'static str;

    fn from_key(key: &str) -> Option<Self>
    where
        Self: Sized;
}

/// URLs keyed by a fixed enumerated key set.
///
/// Decoding skips JSON keys outside the key set and tolerates absent keys;
/// encoding emits only the keys that are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMap<K: UrlKey> {
    entries: BTreeMap<K, Url>,
}

impl<K: UrlKey> UrlMap<K> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: K) -> Option<&Url> {
        self.entries.get(&key)
    }

    pub fn insert(&mut self, key: K, url: Url) -> Option<Url> {
        self.entries.insert(key, url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Url)> {
        self.entries.iter()
    }
}

impl<K: UrlKey> Default for UrlMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: UrlKey> FromIterator<(K, Url)> for UrlMap<K> {
    fn from_iter<I: IntoIterator<Item = (K, Url)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K: UrlKey> Serialize for UrlMap<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, url) in &self.entries {
            map.serialize_entry(key.as_key(), url)?;
        }
        map.end()
    }
}

impl<'de, K: UrlKey> Deserialize<'de> for UrlMap<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UrlMapVisitor<K>(PhantomData<K>);

        impl<'de, K: UrlKey> Visitor<'de> for UrlMapVisitor<K> {
            type Value = UrlMap<K>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of URLs keyed by known names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = BTreeMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    match K::from_key(&key) {
                        Some(known) => {
                            entries.insert(known, access.next_value()?);
                        }
                        None => {
                            access.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(UrlMap { entries })
            }
        }

        deserializer.deserialize_map(UrlMapVisitor(PhantomData))
    }
}

/// Decodes a keyed-URL map, degrading to an empty map when the whole value
/// fails to decode.
pub(crate) fn lenient_url_map<'de, D, K>(deserializer: D) -> Result<UrlMap<K>, D::Error>
where
    D: Deserializer<'de>,
    K: UrlKey,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
