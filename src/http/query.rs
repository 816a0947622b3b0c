//! Query data and query-string composition.
//!
//! Values are encoded as `application/x-www-form-urlencoded`, so a space
//! becomes `+`. The same encoding is used for form bodies.

use url::form_urlencoded;

/// A single query value: one string, or a list encoded as a repeated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multiple(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered mapping of parameter names to values.
///
/// Keys are unique: inserting an existing key replaces its value in place,
/// keeping the original position. Encoding follows insertion order.
///
/// # Example
///
/// ```rust
/// use http_service::http::QueryData;
///
/// let data = QueryData::from([("q", "a b"), ("page", "2")]);
/// assert_eq!(data.encode(), "q=a+b&page=2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryData {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.pairs.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Form-urlencodes every pair and joins them with `&`.
    ///
    /// List values repeat their key; an empty list contributes nothing.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            match value {
                QueryValue::Single(value) => {
                    serializer.append_pair(key, value);
                },
                QueryValue::Multiple(values) => {
                    for value in values {
                        serializer.append_pair(key, value);
                    }
                },
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryData
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = QueryData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryData
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Appends `query_data` to `path` as a query string.
///
/// The join character is `&` whenever `path` contains a `?` anywhere
/// (a trailing bare `?` included), otherwise `?`. When the data encodes to
/// an empty string the path is returned unchanged.
pub fn attach_query_data(path: &str, query_data: &QueryData) -> String {
    let query_string = query_data.encode();

    if query_string.is_empty() {
        return path.to_string();
    }

    let join_char = if path.contains('?') { '&' } else { '?' };

    format!("{path}{join_char}{query_string}")
}
