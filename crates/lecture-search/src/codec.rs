//! URL query codec for committed search criteria.
//!
//! The canonical form emits only fields that differ from their default, in
//! a fixed key order, so encoding is minimal and idempotent. On read an
//! empty value and an absent key mean the same thing.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::criteria::{Field, FilterCriteria};

/// Query key for the page number.
pub const PAGE_KEY: &str = "page";

/// Query key flagging that detailed filters are in use.
pub const DETAILED_KEY: &str = "detailed";

/// A URL query string as ordered key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PersistedQuery {
    pairs: Vec<(String, String)>,
}

impl PersistedQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical encoding of `criteria`.
    pub fn encode(criteria: &FilterCriteria) -> Self {
        let mut pairs = Vec::new();

        for field in [Field::Keyword, Field::Faculty, Field::Sort] {
            if criteria.is_active(field) {
                pairs.push((field.query_key().to_string(), criteria.value(field).to_string()));
            }
        }

        if criteria.page > 1 {
            pairs.push((PAGE_KEY.to_string(), criteria.page.to_string()));
        }

        for field in Field::DETAILED {
            if criteria.is_active(field) {
                pairs.push((field.query_key().to_string(), criteria.value(field).to_string()));
            }
        }

        if criteria.has_detailed_filters() {
            pairs.push((DETAILED_KEY.to_string(), "true".to_string()));
        }

        Self { pairs }
    }

    /// Parse a raw query string, with or without the leading `?`.
    ///
    /// Pairs with an empty value are dropped. Order and unknown keys are
    /// preserved.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let mut parts = pair.splitn(2, '=');
                let key = decode_component(parts.next().unwrap_or(""));
                let value = decode_component(parts.next().unwrap_or(""));
                if key.is_empty() || value.is_empty() {
                    None
                } else {
                    Some((key, value))
                }
            })
            .collect();

        Self { pairs }
    }

    /// Rebuild criteria from this query.
    ///
    /// Unknown keys are ignored. Invalid values fall back to the field
    /// default. When a key repeats, the first occurrence wins.
    pub fn decode(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();

        for field in Field::ALL {
            if let Some(value) = self.get(field.query_key()) {
                if let Err(e) = criteria.set(field, value) {
                    tracing::warn!(error = %e, "ignoring invalid query parameter");
                }
            }
        }

        if let Some(raw) = self.get(PAGE_KEY) {
            match raw.parse::<u32>() {
                Ok(page) if page >= 1 => criteria.page = page,
                _ => tracing::warn!(value = raw, "ignoring invalid page parameter"),
            }
        }

        criteria
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl fmt::Display for PersistedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", encode_component(key), encode_component(value))?;
        }
        Ok(())
    }
}

impl FromStr for PersistedQuery {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&FilterCriteria> for PersistedQuery {
    fn from(criteria: &FilterCriteria) -> Self {
        Self::encode(criteria)
    }
}

/// Percent-encode a query component (`application/x-www-form-urlencoded`).
pub fn encode_component(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char)
            }
            b' ' => result.push('+'),
            _ => result.push_str(&format!("%{:02X}", byte)),
        }
    }
    result
}

/// Decode a query component. Malformed escapes are kept verbatim.
pub fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match escaped {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
