use std::collections::BTreeMap;
use std::collections::btree_map;

/// The string-keyed argument bag a [`Compiler`](crate::Compiler) hands to
/// every node it emits.
///
/// The engine never interprets it. Setting merges, removing deletes by key.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    values: BTreeMap<String, String>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `values` in, overwriting existing keys.
    pub fn set<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values
            .extend(values.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    pub fn remove<S: AsRef<str>>(&mut self, keys: impl IntoIterator<Item = S>) -> &mut Self {
        for key in keys {
            self.values.remove(key.as_ref());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The listed keys that are present; missing keys are skipped.
    pub fn select<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> Arguments {
        keys.into_iter()
            .filter_map(|key| {
                self.values
                    .get_key_value(key.as_ref())
                    .map(|(key, value)| (key.clone(), value.clone()))
            })
            .collect()
    }

    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = Self::new();
        arguments.set(iter);
        arguments
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Arguments {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.set(iter);
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
