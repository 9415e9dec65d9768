// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request targets
//!
//! A target describes a logical endpoint. Plugins receive it alongside the
//! request so they can refer to the endpoint without inspecting wire data.

use std::fmt;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use url::Url;

use super::request::Request;

/// Logical description of an endpoint
pub trait Target: Send + Sync {
    /// Base URL shared by the endpoints of a service
    fn base_url(&self) -> &Url;

    /// Path appended to the base URL
    fn path(&self) -> &str;

    /// HTTP method
    fn method(&self) -> Method {
        Method::GET
    }

    /// Headers sent with every request to this target
    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    /// Buffered body sent with the request
    fn body(&self) -> Option<Bytes> {
        None
    }

    /// Full URL: base URL and path joined by exactly one `/`
    fn url(&self) -> Url {
        join_path(self.base_url(), self.path())
    }

    /// Human readable description used in logs
    fn description(&self) -> String {
        format!("{} {}", self.method(), self.url())
    }

    /// Build the request for this target
    fn request(&self) -> Request {
        let mut request = Request::from_url(self.method(), self.url());
        request.headers = self.headers();
        match self.body() {
            Some(body) => request.body(body),
            None => request,
        }
    }
}

impl fmt::Display for dyn Target + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

fn join_path(base: &Url, path: &str) -> Url {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.clone();
    }

    let mut url = base.clone();
    let joined = format!("{}/{}", base.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url
}

/// Plain endpoint description
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: Url,
    path: String,
    method: Method,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Endpoint {
    /// Create a GET endpoint at the base URL
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            path: String::new(),
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Parse the base URL and create a GET endpoint
    pub fn parse(base_url: impl AsRef<str>) -> crate::error::Result<Self> {
        Ok(Self::new(Url::parse(base_url.as_ref())?))
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the method
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the headers
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl Target for Endpoint {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> Method {
        self.method.clone()
    }

    fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn body(&self) -> Option<Bytes> {
        self.body.clone()
    }
}
