//! Flat key/multi-value mapping and its `application/x-www-form-urlencoded` wire form.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::codec::CodecError;

/// Form field name to one or more values.
///
/// Keys are kept ordered so encoding is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    inner: BTreeMap<String, Vec<String>>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a urlencoded body.
    ///
    /// Pairs are separated by `&` or `;`. A `%` not followed by two hex digits
    /// is rejected.
    pub fn parse(src: &[u8]) -> Result<Self, CodecError> {
        let mut values = Self::new();
        for segment in src.split(|b| *b == b'&' || *b == b';') {
            if segment.is_empty() {
                continue;
            }
            check_escapes(segment)?;
            // A segment holds no separator, so it decodes to exactly one pair.
            if let Some((key, value)) = form_urlencoded::parse(segment).next() {
                values.append(key.into_owned(), value.into_owned());
            }
        }
        Ok(values)
    }

    /// Replace all values of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// First value for `key`; later duplicates are ignored.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Encode as `key=value&...` sorted by key.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.inner {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

fn check_escapes(segment: &[u8]) -> Result<(), CodecError> {
    let mut i = 0;
    while i < segment.len() {
        if segment[i] == b'%' {
            let escape = segment.get(i..i + 3);
            match escape {
                Some([_, hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    i += 3;
                    continue;
                }
                _ => {
                    let end = (i + 3).min(segment.len());
                    return Err(CodecError::MalformedForm {
                        escape: String::from_utf8_lossy(&segment[i..end]).into_owned(),
                    });
                }
            }
        }
        i += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let values = FormValues::parse(b"Name=Ada+Lovelace&Age=36;City=London").unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values.first("Name"), Some("Ada Lovelace"));
        assert_eq!(values.first("Age"), Some("36"));
        assert_eq!(values.first("City"), Some("London"));
    }

    #[test]
    fn test_first_value_wins() {
        let values = FormValues::parse(b"Age=3&Age=7").unwrap();
        assert_eq!(values.first("Age"), Some("3"));
        assert_eq!(values.get("Age").unwrap(), ["3", "7"]);
    }

    #[test]
    fn test_percent_decoding_and_bare_keys() {
        let values = FormValues::parse(b"q=a%26b%3Dc&flag&&=empty").unwrap();
        assert_eq!(values.first("q"), Some("a&b=c"));
        assert_eq!(values.first("flag"), Some(""));
        assert_eq!(values.first(""), Some("empty"));
    }

    #[test]
    fn test_malformed_escape() {
        let err = FormValues::parse(b"Name=%zz").unwrap_err();
        assert_eq!(err.to_string(), r#"invalid URL escape "%zz""#);

        let err = FormValues::parse(b"Name=abc%4").unwrap_err();
        assert!(matches!(err, CodecError::MalformedForm { ref escape } if escape == "%4"));
    }

    #[test]
    fn test_encode_sorted_and_escaped() {
        let mut values = FormValues::new();
        values.set("Name", "a b");
        values.set("Age", "3");
        values.append("Tags", "x&y");
        values.append("Tags", "z");
        assert_eq!(values.encode(), "Age=3&Name=a+b&Tags=x%26y&Tags=z");
    }

    #[test]
    fn test_set_replaces() {
        let mut values = FormValues::new();
        values.append("k", "1");
        values.append("k", "2");
        values.set("k", "3");
        assert_eq!(values.get("k").unwrap(), ["3"]);
    }
}
