//! Header sources and their merge rules.
//!
//! A [`HeaderPatch`] is an ordered list of per-key instructions. Patches are
//! folded left to right by [`merge_headers`] into an [`http::HeaderMap`], so
//! key comparison is case-insensitive and later sources win.

use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, Result};

/// What a header source does to one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderEntry {
    /// Overwrite the key with a single value.
    Set(String),
    /// Append each value to the key, keeping earlier values.
    Append(Vec<String>),
    /// Delete the key, even if an earlier source set it.
    Remove,
    /// Leave the key as it is.
    Unset,
}

impl From<&str> for HeaderEntry {
    fn from(value: &str) -> Self {
        Self::Set(value.to_string())
    }
}

impl From<String> for HeaderEntry {
    fn from(value: String) -> Self {
        Self::Set(value)
    }
}

impl From<Vec<String>> for HeaderEntry {
    fn from(values: Vec<String>) -> Self {
        Self::Append(values)
    }
}

/// An ordered set of header instructions.
///
/// # Example
///
/// ```
/// use openfetch_core::{HeaderPatch, merge_headers};
///
/// let defaults = HeaderPatch::new().set("Accept", "application/json");
/// let call = HeaderPatch::new().remove("accept").set("X-Trace", "1");
///
/// let headers = merge_headers([Some(&defaults), None, Some(&call)]).expect("valid headers");
/// assert!(headers.get("accept").is_none());
/// assert_eq!(headers.get("x-trace").map(|v| v.as_bytes()), Some(&b"1"[..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPatch {
    entries: Vec<(String, HeaderEntry)>,
}

impl HeaderPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instruction for `name`.
    #[must_use]
    pub fn entry(mut self, name: impl Into<String>, entry: impl Into<HeaderEntry>) -> Self {
        self.entries.push((name.into(), entry.into()));
        self
    }

    /// Overwrites `name` with `value`.
    #[must_use]
    pub fn set(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entry(name, HeaderEntry::Set(value.into()))
    }

    /// Appends `values` to `name`.
    #[must_use]
    pub fn append<I, V>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.entry(name, HeaderEntry::Append(values))
    }

    /// Deletes `name` from the merged result.
    #[must_use]
    pub fn remove(self, name: impl Into<String>) -> Self {
        self.entry(name, HeaderEntry::Remove)
    }

    /// Extends this patch with the entries of `other`, which apply after ours.
    #[must_use]
    pub fn extend(mut self, other: Self) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Returns `true` if the patch has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates instructions in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Applies this patch on top of `headers`.
    ///
    /// # Errors
    ///
    /// Returns an error if a header name or value is not valid HTTP.
    pub fn apply_to(&self, headers: &mut HeaderMap) -> Result<()> {
        for (name, entry) in &self.entries {
            match entry {
                HeaderEntry::Unset => {}
                HeaderEntry::Remove => {
                    let name = header_name(name)?;
                    headers.remove(name);
                }
                HeaderEntry::Set(value) => {
                    headers.insert(header_name(name)?, header_value(name, value)?);
                }
                HeaderEntry::Append(values) => {
                    let header = header_name(name)?;
                    for value in values {
                        headers.append(header.clone(), header_value(name, value)?);
                    }
                }
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderPatch
where
    K: Into<String>,
    V: Into<HeaderEntry>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, entry)| (name.into(), entry.into()))
                .collect(),
        }
    }
}

/// An existing header collection replaces each of its keys: the first value
/// of a key is set, the following ones are appended.
impl From<&HeaderMap> for HeaderPatch {
    fn from(headers: &HeaderMap) -> Self {
        let mut entries = Vec::with_capacity(headers.len());
        for name in headers.keys() {
            let mut values = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
            if let Some(first) = values.next() {
                entries.push((name.to_string(), HeaderEntry::Set(first)));
            }
            let rest: Vec<_> = values.collect();
            if !rest.is_empty() {
                entries.push((name.to_string(), HeaderEntry::Append(rest)));
            }
        }
        Self { entries }
    }
}

impl From<HeaderMap> for HeaderPatch {
    fn from(headers: HeaderMap) -> Self {
        Self::from(&headers)
    }
}

/// Merges header sources left to right into a single collection.
///
/// `None` sources are skipped. Within a source, [`HeaderEntry::Remove`]
/// deletes the key, [`HeaderEntry::Unset`] leaves it alone and any value
/// overwrites (or appends to) it.
///
/// # Errors
///
/// Returns an error if a header name or value is not valid HTTP.
pub fn merge_headers<'a, I>(sources: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = Option<&'a HeaderPatch>>,
{
    let mut headers = HeaderMap::new();
    for source in sources.into_iter().flatten() {
        source.apply_to(&mut headers)?;
    }
    Ok(headers)
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|err| Error::invalid_header(name, err))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|err| Error::invalid_header(name, err))
}
