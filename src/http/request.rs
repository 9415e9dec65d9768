// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types and builder

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::error::Result;

/// Separator placed between the arguments of a rendered curl command
pub const CURL_SEPARATOR: &str = " \\\n\t";

/// One-shot byte stream used as a streamed request body
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Sync>>;

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Body>,
    /// Request timeout
    pub timeout: Option<Duration>,
}

/// Request body, either buffered in memory or streamed
#[derive(Debug, Clone)]
pub enum Body {
    /// Fully buffered body
    Bytes(Bytes),
    /// Body produced by a stream while the request is on the wire
    Stream(BodyStream),
}

/// Streamed request body
///
/// Clones share the same underlying stream, which can be taken exactly once.
#[derive(Clone)]
pub struct BodyStream {
    stream: Arc<Mutex<Option<ByteStream>>>,
    length: Option<u64>,
}

impl BodyStream {
    /// Wrap a stream of byte chunks
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static,
    {
        Self {
            stream: Arc::new(Mutex::new(Some(Box::pin(stream)))),
            length: None,
        }
    }

    /// Set the expected total length
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Expected total length, if known
    pub fn length(&self) -> Option<u64> {
        self.length
    }

    /// Whether the stream has already been handed to the transport
    pub fn is_consumed(&self) -> bool {
        self.stream.lock().is_none()
    }

    /// Take the stream out, leaving every clone consumed
    pub fn take(&self) -> Option<ByteStream> {
        self.stream.lock().take()
    }
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyStream")
            .field("length", &self.length)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl fmt::Display for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length {
            Some(len) => write!(f, "<body stream: {} bytes>", len),
            None => write!(f, "<body stream: unknown length>"),
        }
    }
}

impl Request {
    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::from_url(method, Url::parse(url.as_ref())?))
    }

    /// Create a request for an already parsed URL
    pub fn from_url(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set a buffered request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(Body::Bytes(body.into()));
        self
    }

    /// Set a streamed request body
    pub fn body_stream(mut self, stream: BodyStream) -> Self {
        self.body = Some(Body::Stream(stream));
        self
    }

    /// Set JSON body
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.body = Some(Body::Bytes(Bytes::from(json)));
        Ok(self.header("content-type", "application/json"))
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Buffered body bytes, if the body is not streamed
    pub fn body_bytes(&self) -> Option<&Bytes> {
        match self.body {
            Some(Body::Bytes(ref bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Streamed body, if any
    pub fn body_stream_ref(&self) -> Option<&BodyStream> {
        match self.body {
            Some(Body::Stream(ref stream)) => Some(stream),
            _ => None,
        }
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Render the request as a reproducible curl command
    pub fn curl_command(&self) -> String {
        let mut components = vec!["$ curl -v".to_string()];

        if self.method != Method::GET {
            components.push(format!("-X {}", self.method));
        }

        for (name, value) in self.headers.iter() {
            let value = String::from_utf8_lossy(value.as_bytes());
            components.push(format!("-H \"{}: {}\"", name, escape_quotes(&value)));
        }

        if let Some(body) = self.body_bytes() {
            if let Ok(text) = std::str::from_utf8(body) {
                components.push(format!("-d \"{}\"", escape_quotes(text)));
            }
        }

        components.push(format!("\"{}\"", self.url));
        components.join(CURL_SEPARATOR)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::get("https://example.com/path").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.host_str(), Some("example.com"));
        assert_eq!(req.to_string(), "https://example.com/path");
    }

    #[test]
    fn test_request_headers() {
        let req = Request::get("https://example.com")
            .unwrap()
            .header("x-custom", "value");
        assert_eq!(
            req.headers.get("x-custom").map(|v| v.to_str().unwrap()),
            Some("value")
        );
    }

    #[test]
    fn test_request_json_and_timeout() {
        let req = Request::new(Method::PUT, "https://example.com/items/1")
            .unwrap()
            .header("x-custom", "value")
            .json(&serde_json::json!({ "name": "a" }))
            .unwrap()
            .timeout(Duration::from_secs(5));

        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.timeout, Some(Duration::from_secs(5)));
        assert_eq!(req.headers.get("content-type").unwrap(), "application/json");
        assert_eq!(req.body_bytes().map(|b| b.as_ref()), Some(&br#"{"name":"a"}"#[..]));
    }

    #[test]
    fn test_body_variants() {
        let req = Request::post("https://example.com").unwrap().body("abc");
        assert_eq!(req.body_bytes().map(|b| b.as_ref()), Some(&b"abc"[..]));
        assert!(req.body_stream_ref().is_none());

        let stream = BodyStream::new(futures::stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from(
            "abc",
        ))]))
            .with_length(3);
        let req = req.body_stream(stream);
        assert!(req.body_bytes().is_none());
        assert_eq!(req.body_stream_ref().unwrap().to_string(), "<body stream: 3 bytes>");
    }

    #[test]
    fn test_body_stream_taken_once() {
        let stream = BodyStream::new(futures::stream::empty::<std::io::Result<Bytes>>());
        let clone = stream.clone();

        assert!(!clone.is_consumed());
        assert!(stream.take().is_some());
        assert!(clone.is_consumed());
        assert!(clone.take().is_none());
    }

    #[test]
    fn test_curl_get() {
        let req = Request::get("https://example.com/users?id=1").unwrap();
        assert_eq!(req.curl_command(), "$ curl -v \\\n\t\"https://example.com/users?id=1\"");
    }

    #[test]
    fn test_curl_post_with_body() {
        let req = Request::post("https://example.com/users")
            .unwrap()
            .header("content-type", "application/json")
            .body(r#"{"name":"a"}"#);

        let curl = req.curl_command();
        let parts: Vec<&str> = curl.split(CURL_SEPARATOR).collect();
        assert_eq!(
            parts,
            vec![
                "$ curl -v",
                "-X POST",
                "-H \"content-type: application/json\"",
                r#"-d "{\"name\":\"a\"}""#,
                "\"https://example.com/users\"",
            ]
        );
    }

    #[test]
    fn test_curl_skips_non_utf8_body() {
        let req = Request::post("https://example.com")
            .unwrap()
            .body(vec![0xff, 0xfe]);
        assert!(!req.curl_command().contains("-d"));
    }
}
