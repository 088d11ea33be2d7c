use crate::constants::header;
use indexmap::IndexMap;

/// Ordered header map with case-insensitive names.
///
/// Names are stored in ASCII lowercase, the way HTTP/2 and most server
/// interfaces carry them. A name may hold several values; insertion order of
/// first appearance is preserved so two maps built from the same inputs
/// iterate identically.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Headers {
    entries: IndexMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::with_capacity(8)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Returns the first value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&normalize_name(name))
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(&normalize_name(name))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_name(name))
    }

    /// Replaces every value of `name` with `value`.
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: AsRef<str>,
        V: Into<String>,
    {
        self.entries
            .insert(normalize_name(name.as_ref()), vec![value.into()]);
    }

    /// Adds `value` next to any existing values of `name`.
    pub fn append<N, V>(&mut self, name: N, value: V)
    where
        N: AsRef<str>,
        V: Into<String>,
    {
        self.entries
            .entry(normalize_name(name.as_ref()))
            .or_default()
            .push(value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.shift_remove(&normalize_name(name))
    }

    /// Merges `value` into the single `Vary` header, dropping duplicate
    /// tokens regardless of case.
    pub fn add_vary<S: Into<String>>(&mut self, value: S) {
        let mut entries: Vec<String> = self
            .get_all(header::VARY)
            .flat_map(|existing| existing.split(','))
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();

        let incoming = value.into();
        entries.extend(
            incoming
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty()),
        );

        if entries.is_empty() {
            self.remove(header::VARY);
            return;
        }

        let mut deduped: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            if deduped
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&entry))
            {
                continue;
            }
            deduped.push(entry);
        }

        self.insert(header::VARY, deduped.join(", "));
    }

    /// Overlays `other` onto `self`: names present in `other` replace the
    /// existing values, except `Vary` whose tokens are merged.
    pub fn merge(&mut self, other: &Headers) {
        for (name, values) in &other.entries {
            if name.eq_ignore_ascii_case(header::VARY) {
                for value in values {
                    self.add_vary(value.as_str());
                }
            } else {
                self.entries.insert(name.clone(), values.clone());
            }
        }
    }

    /// Iterates `(name, value)` pairs, one per value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for Headers
where
    N: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
#[path = "headers_test.rs"]
mod headers_test;
