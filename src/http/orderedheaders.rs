//! Header ordering for browser fingerprinting.
//!
//! Servers hash the order in which header fields arrive. This module holds
//! the insertion-ordered request header container and the ordering policy
//! applied when a request's header block is serialized.

use crate::base::profileerror::ProfileError;
use crate::http::h2fingerprint::{PseudoId, PseudoOrder};
use http::header::{HeaderName, HeaderValue, HOST};
use http::{HeaderMap, Method, Uri};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// A header map that strictly preserves insertion order.
/// Used to construct requests with specific fingerprinting characteristics.
#[derive(Debug, Clone, Default)]
pub struct OrderedHeaderMap {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl OrderedHeaderMap {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), ProfileError> {
        let name_header = HeaderName::from_str(name)
            .map_err(|_| ProfileError::InvalidHeader(format!("invalid name {name:?}")))?;
        let value_header = HeaderValue::from_str(value)
            .map_err(|_| ProfileError::InvalidHeader(format!("invalid value for {name}")))?;

        // Update in place if exists, else append. HeaderName is lowercase,
        // so equality is a case-insensitive match.
        if let Some((_, v)) = self.headers.iter_mut().find(|(n, _)| *n == name_header) {
            *v = value_header;
        } else {
            self.headers.push((name_header, value_header));
        }
        Ok(())
    }

    /// Remove a header; the remaining headers keep their relative order.
    pub fn remove(&mut self, name: &str) {
        if let Ok(target) = HeaderName::from_str(name) {
            self.headers.retain(|(n, _)| *n != target);
        }
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        let target = HeaderName::from_str(name).ok()?;
        self.headers
            .iter()
            .find(|(n, _)| *n == target)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.headers.iter().map(|(n, v)| (n, v))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Consumes the map and returns a standard http::HeaderMap.
    ///
    /// The result keeps the current order only until something is removed
    /// from it: `HeaderMap::remove` moves the last entry into the gap.
    pub fn to_header_map(self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in self.headers {
            map.append(name, value);
        }
        map
    }
}

/// Emission order for regular (non-pseudo) header names.
///
/// Names are stored lower-cased and are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct HeaderOrder {
    names: Vec<HeaderName>,
}

impl HeaderOrder {
    /// Build from header names; duplicates (case-insensitive) are rejected.
    pub fn new<I, S>(names: I) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut order = Vec::new();
        for name in names {
            let name = name.as_ref();
            let parsed = HeaderName::from_str(name).map_err(|_| {
                ProfileError::invalid("header-order", format!("invalid header name {name:?}"))
            })?;
            if order.contains(&parsed) {
                return Err(ProfileError::invalid(
                    "header-order",
                    format!("header {parsed} listed twice"),
                ));
            }
            order.push(parsed);
        }
        Ok(Self { names: order })
    }

    pub fn contains(&self, name: &HeaderName) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderName> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TryFrom<Vec<String>> for HeaderOrder {
    type Error = ProfileError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        HeaderOrder::new(names)
    }
}

impl From<HeaderOrder> for Vec<String> {
    fn from(order: HeaderOrder) -> Self {
        order.names.iter().map(|n| n.as_str().to_string()).collect()
    }
}

/// One field of a serialized header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Lower-case field name; pseudo-headers keep their leading colon.
    pub name: Cow<'static, str>,
    pub value: HeaderValue,
}

impl HeaderField {
    fn pseudo(id: PseudoId, value: HeaderValue) -> Self {
        Self {
            name: Cow::Borrowed(id.as_str()),
            value,
        }
    }

    fn regular(name: &HeaderName, value: &HeaderValue) -> Self {
        Self {
            name: Cow::Owned(name.as_str().to_string()),
            value: value.clone(),
        }
    }

    pub fn is_pseudo(&self) -> bool {
        self.name.starts_with(':')
    }
}

/// Serialize a request's header block in impersonation order.
///
/// 1. The four pseudo-headers, in `pseudo_order`.
/// 2. Each name in `header_order` present on the request (all of its
///    values) or else in `defaults`. Names found in neither are skipped.
/// 3. Remaining request headers, in the caller's order.
/// 4. Remaining defaults the request did not set, in their own order.
pub fn order_headers<'a, I>(
    pseudo_order: &PseudoOrder,
    header_order: &HeaderOrder,
    defaults: &HeaderMap,
    method: &Method,
    uri: &Uri,
    headers: I,
) -> Result<Vec<HeaderField>, ProfileError>
where
    I: IntoIterator<Item = (&'a HeaderName, &'a HeaderValue)>,
{
    let request: Vec<(&HeaderName, &HeaderValue)> = headers.into_iter().collect();
    let mut fields = Vec::with_capacity(4 + request.len() + defaults.len());

    for id in pseudo_order.iter() {
        fields.push(HeaderField::pseudo(id, pseudo_value(id, method, uri, &request)?));
    }

    let in_request = |name: &HeaderName| request.iter().any(|(n, _)| *n == name);

    for name in header_order.iter() {
        if in_request(name) {
            fields.extend(
                request
                    .iter()
                    .filter(|(n, _)| *n == name)
                    .map(|(n, v)| HeaderField::regular(n, v)),
            );
        } else {
            fields.extend(defaults.get_all(name).iter().map(|v| HeaderField::regular(name, v)));
        }
    }

    fields.extend(
        request
            .iter()
            .filter(|(n, _)| !header_order.contains(n))
            .map(|(n, v)| HeaderField::regular(n, v)),
    );

    for name in defaults.keys() {
        if header_order.contains(name) || in_request(name) {
            continue;
        }
        fields.extend(defaults.get_all(name).iter().map(|v| HeaderField::regular(name, v)));
    }

    Ok(fields)
}

fn pseudo_value(
    id: PseudoId,
    method: &Method,
    uri: &Uri,
    request: &[(&HeaderName, &HeaderValue)],
) -> Result<HeaderValue, ProfileError> {
    let text = match id {
        PseudoId::Method => method.as_str(),
        PseudoId::Scheme => uri.scheme_str().unwrap_or("https"),
        PseudoId::Path => match uri.path_and_query().map(|pq| pq.as_str()) {
            Some(pq) if !pq.is_empty() => pq,
            _ => "/",
        },
        PseudoId::Authority => match uri.authority() {
            Some(authority) => authority.as_str(),
            None => {
                return request
                    .iter()
                    .find(|(n, _)| **n == HOST)
                    .map(|(_, v)| (*v).clone())
                    .ok_or_else(|| {
                        ProfileError::InvalidHeader(format!("no authority for {uri}"))
                    });
            }
        },
    };
    HeaderValue::from_str(text)
        .map_err(|_| ProfileError::InvalidHeader(format!("invalid {id} value {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("Content-Type", "application/json").unwrap();
        assert_eq!(
            headers.get("Content-Type").unwrap().to_str().unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_case_insensitive_get() {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("ACCEPT", "text/html").unwrap();
        assert!(headers.get("accept").is_some());
        assert!(headers.get("Accept").is_some());
    }

    #[test]
    fn test_update_existing_header() {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("Host", "example.com").unwrap();
        headers.insert("Host", "updated.com").unwrap();
        assert_eq!(
            headers.get("Host").unwrap().to_str().unwrap(),
            "updated.com"
        );
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_remove_header() {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("X-Custom", "value").unwrap();
        headers.remove("X-Custom");
        assert!(headers.get("X-Custom").is_none());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_invalid_header_name() {
        let mut headers = OrderedHeaderMap::new();
        let result = headers.insert("Invalid Header", "value");
        assert!(matches!(result, Err(ProfileError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_header_value() {
        let mut headers = OrderedHeaderMap::new();
        assert!(headers.insert("Valid", "invalid\nvalue").is_err());
    }

    #[test]
    fn test_header_order_case_insensitive_duplicates() {
        let res = HeaderOrder::new(["Accept", "cookie", "accept"]);
        assert!(matches!(res, Err(ProfileError::InvalidProfile { .. })));
    }

    #[test]
    fn test_header_order_lowercases() {
        let order = HeaderOrder::new(["User-Agent", "Accept"]).unwrap();
        let names: Vec<String> = order.into();
        assert_eq!(names, vec!["user-agent", "accept"]);
    }

    #[test]
    fn test_pseudo_values() {
        let uri: Uri = "https://example.com:8443/a/b?c=d".parse().unwrap();
        let fields = order_headers(
            &PseudoOrder::CHROME,
            &HeaderOrder::default(),
            &HeaderMap::new(),
            &Method::POST,
            &uri,
            std::iter::empty(),
        )
        .unwrap();
        let pairs: Vec<_> = fields
            .iter()
            .map(|f| (&*f.name, f.value.to_str().unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (":method", "POST"),
                (":authority", "example.com:8443"),
                (":scheme", "https"),
                (":path", "/a/b?c=d"),
            ]
        );
    }

    #[test]
    fn test_authority_falls_back_to_host() {
        let uri: Uri = "/index.html".parse().unwrap();
        let mut headers = OrderedHeaderMap::new();
        headers.insert("host", "example.org").unwrap();
        let fields = order_headers(
            &PseudoOrder::FIREFOX,
            &HeaderOrder::default(),
            &HeaderMap::new(),
            &Method::GET,
            &uri,
            headers.iter(),
        )
        .unwrap();
        let authority = fields.iter().find(|f| f.name == ":authority").unwrap();
        assert_eq!(authority.value, "example.org");
    }

    #[test]
    fn test_missing_authority_is_error() {
        let uri: Uri = "/".parse().unwrap();
        let res = order_headers(
            &PseudoOrder::CHROME,
            &HeaderOrder::default(),
            &HeaderMap::new(),
            &Method::GET,
            &uri,
            std::iter::empty(),
        );
        assert!(matches!(res, Err(ProfileError::InvalidHeader(_))));
    }

    #[test]
    fn test_request_value_wins_over_default() {
        let uri: Uri = "https://example.com/".parse().unwrap();
        let order = HeaderOrder::new(["user-agent"]).unwrap();
        let mut defaults = HeaderMap::new();
        defaults.insert("user-agent", HeaderValue::from_static("Default/1.0"));
        let mut headers = OrderedHeaderMap::new();
        headers.insert("user-agent", "Mine/2.0").unwrap();

        let fields = order_headers(
            &PseudoOrder::CHROME,
            &order,
            &defaults,
            &Method::GET,
            &uri,
            headers.iter(),
        )
        .unwrap();
        let ua: Vec<_> = fields.iter().filter(|f| f.name == "user-agent").collect();
        assert_eq!(ua.len(), 1);
        assert_eq!(ua[0].value, "Mine/2.0");
    }

    #[test]
    fn test_multi_valued_header_grouped() {
        let uri: Uri = "https://example.com/".parse().unwrap();
        let order = HeaderOrder::new(["accept", "cookie"]).unwrap();
        let mut request = HeaderMap::new();
        request.append("cookie", HeaderValue::from_static("a=1"));
        request.append("x-other", HeaderValue::from_static("o"));
        request.append("cookie", HeaderValue::from_static("b=2"));

        let fields = order_headers(
            &PseudoOrder::CHROME,
            &order,
            &HeaderMap::new(),
            &Method::GET,
            &uri,
            request.iter(),
        )
        .unwrap();
        let names: Vec<_> = fields
            .iter()
            .filter(|f| !f.is_pseudo())
            .map(|f| (&*f.name, f.value.to_str().unwrap()))
            .collect();
        assert_eq!(names, vec![("cookie", "a=1"), ("cookie", "b=2"), ("x-other", "o")]);
    }

    #[test]
    fn test_unlisted_defaults_appended_last() {
        let uri: Uri = "https://example.com/".parse().unwrap();
        let order = HeaderOrder::new(["accept"]).unwrap();
        let mut defaults = HeaderMap::new();
        defaults.insert("dnt", HeaderValue::from_static("1"));
        defaults.insert("accept", HeaderValue::from_static("*/*"));
        let mut headers = OrderedHeaderMap::new();
        headers.insert("x-req", "r").unwrap();

        let fields = order_headers(
            &PseudoOrder::CHROME,
            &order,
            &defaults,
            &Method::GET,
            &uri,
            headers.iter(),
        )
        .unwrap();
        let names: Vec<_> = fields
            .iter()
            .filter(|f| !f.is_pseudo())
            .map(|f| &*f.name)
            .collect();
        assert_eq!(names, vec!["accept", "x-req", "dnt"]);
    }
}
