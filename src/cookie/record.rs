//! Cookie record and the default `name=value` parsers.

/// A single cookie as seen in a `Cookie` or `Set-Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    /// Raw attribute segment of a `Set-Cookie` value (`Path=/; HttpOnly`), passed through untouched
    pub attributes: Option<String>,
}

impl CookieRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attributes: None,
        }
    }

    /// Copy of this record carrying a different value
    #[must_use]
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            value: value.into(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Parse one `name=value` token from a `Cookie` header
///
/// Returns `None` for tokens without `=` or with an empty name.
/// Surrounding whitespace and a single pair of double quotes around the value are stripped.
pub fn parse_cookie_pair(token: &str) -> Option<CookieRecord> {
    let (name, value) = token.trim().split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    Some(CookieRecord::new(name, value))
}

/// Parse a full `Set-Cookie` header value
///
/// The first segment is the cookie pair; everything after the first `;` is kept as opaque attributes.
pub fn parse_set_cookie(header: &str) -> Option<CookieRecord> {
    let (pair, attributes) = match header.split_once(';') {
        Some((pair, rest)) => (pair, Some(rest.trim())),
        None => (header, None),
    };

    let mut record = parse_cookie_pair(pair)?;
    record.attributes = attributes
        .filter(|a| !a.is_empty())
        .map(ToString::to_string);
    Some(record)
}
