//! Proxy utility functions.
//!
//! This module contains helper functions for request processing:
//! - Header extraction from Pingora requests
//! - Query parameter parsing
//! - Conversion into the transport-independent `AssetRequest`

use std::collections::HashMap;

use pingora_http::RequestHeader;

use crate::assets::{parse_query_string, AssetRequest};

/// Extract headers from Pingora RequestHeader into HashMap.
///
/// Converts all headers to string key-value pairs. Headers with non-UTF8
/// values are skipped.
pub fn extract_headers(req: &RequestHeader) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for (name, value) in req.headers.iter() {
        if let Ok(value_str) = value.to_str() {
            headers.insert(name.to_string(), value_str.to_string());
        }
    }
    headers
}

/// Extract query parameters from URI.
///
/// Values are URL-decoded, `+` decodes to a space.
pub fn extract_query_params(req: &RequestHeader) -> HashMap<String, String> {
    req.uri.query().map(parse_query_string).unwrap_or_default()
}

/// Build an `AssetRequest` from a Pingora request header
pub fn to_asset_request(req: &RequestHeader) -> AssetRequest {
    AssetRequest {
        method: req.method.as_str().to_ascii_uppercase(),
        path: req.uri.path().to_string(),
        query: extract_query_params(req),
        headers: extract_headers(req),
    }
}
