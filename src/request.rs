//! Request-scoped form state handed to widgets and the refresh endpoint.

use serde::Deserialize;

/// Posted form fields in submission order.
///
/// Keys may repeat; `get` returns the last value, the way a field that
/// holds a single value reads a repeated key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Vec<(String, String)>> for FormData {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// The parts of an HTTP request a widget needs: the path and any posted form.
#[derive(Debug, Clone, Default)]
pub struct FormRequest {
    pub path: String,
    pub post: FormData,
}

impl FormRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            post: FormData::new(),
        }
    }

    pub fn post(path: impl Into<String>, post: FormData) -> Self {
        Self {
            path: path.into(),
            post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_value_wins() {
        let data: FormData = [("city", "1"), ("city", "2"), ("country", "FR")]
            .into_iter()
            .collect();
        assert_eq!(data.get("city"), Some("2"));
        assert_eq!(data.get("country"), Some("FR"));
        assert_eq!(data.get("missing"), None);
    }
}
