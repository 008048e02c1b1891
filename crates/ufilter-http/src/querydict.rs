//! Query string dictionary for request parameters.
//!
//! [`QueryDict`] wraps [`MultiValueDict`](ufilter_core::utils::MultiValueDict)
//! and is immutable by default. It is the "data" a filter set is bound to.

use ufilter_core::utils::MultiValueDict;
use ufilter_core::{UfilterError, UfilterResult};

/// An immutable-by-default dictionary for query string data.
///
/// The [`copy`](QueryDict::copy) method returns a mutable clone.
///
/// # Examples
///
/// ```
/// use ufilter_http::QueryDict;
///
/// let qd = QueryDict::parse("name=Demon&name=Dogs&address__icontains=street");
/// assert_eq!(qd.get("name"), Some("Dogs"));
/// assert_eq!(qd.get_list("name").map(Vec::len), Some(2));
///
/// let mut mutable = qd.copy();
/// mutable.set("name", "Pizza").unwrap();
/// assert_eq!(mutable.get("name"), Some("Pizza"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    data: MultiValueDict<String, String>,
    mutable: bool,
}

impl QueryDict {
    /// Creates a new, empty, immutable `QueryDict`.
    pub const fn new() -> Self {
        Self {
            data: MultiValueDict::new(),
            mutable: false,
        }
    }

    /// Creates a new, empty, mutable `QueryDict`.
    pub const fn new_mutable() -> Self {
        Self {
            data: MultiValueDict::new(),
            mutable: true,
        }
    }

    /// Parses a URL query string (e.g. `"key1=val1&key2=val2"`).
    ///
    /// Handles percent-encoding and `+` as space, and keeps every value of a
    /// repeated key in order.
    pub fn parse(query_string: &str) -> Self {
        let data = query_string
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (percent_decode(key), percent_decode(value))
            })
            .collect();

        Self {
            data,
            mutable: false,
        }
    }

    /// Builds an immutable `QueryDict` from already-decoded pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            mutable: false,
        }
    }

    /// Returns the last value for the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Returns all values for the given key.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.data.get_list(key)
    }

    /// Sets a single value for the given key, replacing any existing values.
    ///
    /// # Errors
    ///
    /// Returns [`UfilterError::SuspiciousOperation`] if this `QueryDict` is immutable.
    pub fn set(&mut self, key: &str, value: &str) -> UfilterResult<()> {
        self.check_mutable()?;
        self.data.set(key.to_string(), value.to_string());
        Ok(())
    }

    /// Appends a value to the list for the given key.
    ///
    /// # Errors
    ///
    /// Returns [`UfilterError::SuspiciousOperation`] if this `QueryDict` is immutable.
    pub fn append(&mut self, key: &str, value: &str) -> UfilterResult<()> {
        self.check_mutable()?;
        self.data.append(key.to_string(), value.to_string());
        Ok(())
    }

    /// Removes a key and returns its values.
    ///
    /// # Errors
    ///
    /// Returns [`UfilterError::SuspiciousOperation`] if this `QueryDict` is immutable.
    pub fn remove(&mut self, key: &str) -> UfilterResult<Option<Vec<String>>> {
        self.check_mutable()?;
        Ok(self.data.remove(key))
    }

    /// Returns a mutable copy of this `QueryDict`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            data: self.data.clone(),
            mutable: true,
        }
    }

    /// Encodes this `QueryDict` as a URL query string, keys in sorted order.
    pub fn urlencode(&self) -> String {
        self.items()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| format!("{}={}", percent_encode(key), percent_encode(value)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Returns `true` if this `QueryDict` is mutable.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the `QueryDict` contains no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns an iterator over the keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Returns an iterator over `(key, values)` pairs, in sorted key order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn check_mutable(&self) -> UfilterResult<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(UfilterError::SuspiciousOperation(
                "This QueryDict instance is immutable".to_string(),
            ))
        }
    }
}

fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
