//! Header ordering policy tests.

use http::{HeaderMap, HeaderValue, Method, Uri};
use wiremask::client::Client;
use wiremask::http::orderedheaders::{order_headers, HeaderField, HeaderOrder, OrderedHeaderMap};
use wiremask::http::PseudoOrder;

fn regular_names(fields: &[HeaderField]) -> Vec<&str> {
    fields
        .iter()
        .filter(|f| !f.is_pseudo())
        .map(|f| &*f.name)
        .collect()
}

fn uri() -> Uri {
    "https://example.com/".parse().unwrap()
}

#[test]
fn test_listed_then_defaults_then_unlisted() {
    let mut request = OrderedHeaderMap::new();
    request.insert("cookie", "x").unwrap();
    request.insert("x-custom", "y").unwrap();

    let order = HeaderOrder::new(["host", "cookie", "accept"]).unwrap();
    let mut defaults = HeaderMap::new();
    defaults.insert("accept", HeaderValue::from_static("*/*"));

    let fields = order_headers(
        &PseudoOrder::CHROME,
        &order,
        &defaults,
        &Method::GET,
        &uri(),
        request.iter(),
    )
    .unwrap();

    assert_eq!(regular_names(&fields), vec!["cookie", "accept", "x-custom"]);
    assert_eq!(fields.iter().filter(|f| f.is_pseudo()).count(), 4);
}

#[test]
fn test_unlisted_keep_insertion_order() {
    let mut request = OrderedHeaderMap::new();
    request.insert("X-Zeta", "1").unwrap();
    request.insert("X-Alpha", "2").unwrap();
    request.insert("X-Mid", "3").unwrap();

    let fields = order_headers(
        &PseudoOrder::PROTOCOL_DEFAULT,
        &HeaderOrder::default(),
        &HeaderMap::new(),
        &Method::GET,
        &uri(),
        request.iter(),
    )
    .unwrap();

    assert_eq!(regular_names(&fields), vec!["x-zeta", "x-alpha", "x-mid"]);
}

#[test]
fn test_unlisted_defaults_after_request_headers() {
    let mut request = OrderedHeaderMap::new();
    request.insert("x-request", "r").unwrap();

    let mut defaults = HeaderMap::new();
    defaults.insert("x-default", HeaderValue::from_static("d"));
    defaults.insert("x-request", HeaderValue::from_static("ignored"));

    let fields = order_headers(
        &PseudoOrder::CHROME,
        &HeaderOrder::default(),
        &defaults,
        &Method::GET,
        &uri(),
        request.iter(),
    )
    .unwrap();

    assert_eq!(regular_names(&fields), vec!["x-request", "x-default"]);
    assert_eq!(fields[4].value, "r");
}

#[test]
fn test_unlisted_order_survives_removal() {
    let client = Client::new();
    let mut headers = OrderedHeaderMap::new();
    for name in ["x-a", "x-b", "x-c", "x-d"] {
        headers.insert(name, "1").unwrap();
    }
    headers.remove("x-a");

    let fields = client
        .encode_ordered(&Method::GET, &uri(), &headers)
        .unwrap();
    assert_eq!(regular_names(&fields), vec!["x-b", "x-c", "x-d"]);
}

#[test]
fn test_removal_in_middle_keeps_relative_order() {
    let mut headers = OrderedHeaderMap::new();
    for name in ["accept", "x-drop", "cookie", "referer"] {
        headers.insert(name, "v").unwrap();
    }
    headers.remove("X-Drop");

    let names: Vec<&str> = headers.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["accept", "cookie", "referer"]);
}

#[test]
fn test_pseudo_orders_per_browser() {
    for (order, expected) in [
        (PseudoOrder::CHROME, [":method", ":authority", ":scheme", ":path"]),
        (PseudoOrder::FIREFOX, [":method", ":path", ":authority", ":scheme"]),
        (PseudoOrder::SAFARI, [":method", ":scheme", ":path", ":authority"]),
    ] {
        let fields = order_headers(
            &order,
            &HeaderOrder::default(),
            &HeaderMap::new(),
            &Method::GET,
            &uri(),
            std::iter::empty(),
        )
        .unwrap();
        let names: Vec<&str> = fields.iter().map(|f| &*f.name).collect();
        assert_eq!(names, expected);
    }
}

#[test]
fn test_firefox_profile_order_via_client() {
    let client = Client::builder().impersonate("firefox_120").build().unwrap();
    let mut headers = OrderedHeaderMap::new();
    headers.insert("Referer", "https://example.com/").unwrap();
    headers.insert("Cookie", "sid=1").unwrap();

    let fields = client
        .encode_ordered(&Method::GET, &uri(), &headers)
        .unwrap();
    let names = regular_names(&fields);
    assert_eq!(
        names,
        vec![
            "user-agent",
            "accept",
            "accept-language",
            "referer",
            "cookie",
            "upgrade-insecure-requests",
            "sec-fetch-dest",
            "sec-fetch-mode",
            "sec-fetch-site",
            "sec-fetch-user",
            "te",
        ]
    );
}

#[test]
fn test_ordered_map_preserves_insertion_order() {
    let mut map = OrderedHeaderMap::new();
    map.insert("Host", "example.com").unwrap();
    map.insert("Connection", "keep-alive").unwrap();
    map.insert("Accept", "*/*").unwrap();
    map.insert("Connection", "close").unwrap();

    let names: Vec<&str> = map.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["host", "connection", "accept"]);
    assert_eq!(map.get("connection").unwrap(), "close");

    let header_map = map.to_header_map();
    assert_eq!(header_map.len(), 3);
    assert_eq!(header_map.keys().next().unwrap(), "host");
}

#[test]
fn test_empty_path_becomes_slash() {
    let uri: Uri = "https://example.com".parse().unwrap();
    let fields = order_headers(
        &PseudoOrder::CHROME,
        &HeaderOrder::default(),
        &HeaderMap::new(),
        &Method::GET,
        &uri,
        std::iter::empty(),
    )
    .unwrap();
    assert_eq!(fields[3].value, "/");
}
