// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for reqtap
//!
//! Request/response models, endpoint targets and a reqwest-backed client that
//! runs requests through lifecycle plugins.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;

mod client;
mod request;
mod response;
mod target;

pub use client::{HttpClient, HttpClientConfig, PendingRequest};
pub use request::{Body, BodyStream, ByteStream, Request, CURL_SEPARATOR};
pub use response::Response;
pub use target::{Endpoint, Target};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("reqtap/", env!("CARGO_PKG_VERSION"));

/// Render a header map as `{"name": "value", ...}` with names sorted
///
/// Repeated headers are joined with `, `.
pub fn header_map_description(headers: &HeaderMap) -> String {
    let mut map: BTreeMap<&str, String> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes());
        map.entry(name.as_str())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.to_string());
    }
    format!("{:?}", map)
}
