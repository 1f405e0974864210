//! Asset request parsing

use std::collections::HashMap;

/// Transport-independent view of an incoming asset request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: String,
    /// URI path without the query string
    pub path: String,
    /// Decoded query parameters
    pub query: HashMap<String, String>,
    /// Request headers (names as received)
    pub headers: HashMap<String, String>,
}

impl AssetRequest {
    /// Build from a method and a request target such as `/assets/u1/img1?width=500`
    pub fn parse(method: &str, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query_string(query)),
            None => (target, HashMap::new()),
        };

        Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            query,
            headers: HashMap::new(),
        }
    }

    pub fn get(target: &str) -> Self {
        Self::parse("GET", target)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn is_head(&self) -> bool {
        self.method == "HEAD"
    }
}

/// Parse `application/x-www-form-urlencoded` pairs
///
/// `+` decodes to a space. Keys without `=` get an empty value. Pairs that
/// are not valid UTF-8 after decoding are skipped. Later duplicates win.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if let (Some(key), Some(value)) = (decode_component(key), decode_component(value)) {
            params.insert(key, value);
        }
    }

    params
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Storage key for `path` served under `route_prefix`
///
/// Segments after the prefix are percent-decoded and joined with `/`; empty
/// segments are dropped. Returns `None` when the path is outside the prefix,
/// the key is empty, or any segment is `.` or `..`.
pub fn storage_key(path: &str, route_prefix: &str) -> Option<String> {
    let prefix = route_prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?;
    if !(rest.is_empty() || rest.starts_with('/')) {
        return None;
    }

    let mut segments = Vec::new();
    for raw in rest.split('/').filter(|segment| !segment.is_empty()) {
        let segment = urlencoding::decode(raw).ok()?;
        if segment == "." || segment == ".." || segment.contains('/') {
            return None;
        }
        segments.push(segment.into_owned());
    }

    if segments.is_empty() {
        return None;
    }

    Some(segments.join("/"))
}
