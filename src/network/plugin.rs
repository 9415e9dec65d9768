// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request lifecycle plugins
//!
//! Plugins observe and modify requests without depending on the transport's
//! concrete types. Hooks run in this order for every request:
//! `prepare` -> `will_send` -> (transport) -> `did_receive` -> `process`.

use std::sync::Arc;

use crate::error::Result;
use crate::http::{Request, Response, Target};

/// Transport-independent view of an outgoing request
pub trait RequestType: Send + Sync {
    /// The request, if it could be built
    fn request(&self) -> Option<&Request>;

    /// Debug representation (a curl command for HTTP requests)
    fn debug_description(&self) -> Option<String> {
        None
    }
}

impl RequestType for Request {
    fn request(&self) -> Option<&Request> {
        Some(self)
    }

    fn debug_description(&self) -> Option<String> {
        Some(self.curl_command())
    }
}

/// Request lifecycle plugin
///
/// Every hook defaults to a no-op so plugins only implement what they need.
pub trait Plugin: Send + Sync {
    /// Modify the request before it is sent
    fn prepare(&self, request: Request, _target: &dyn Target) -> Request {
        request
    }

    /// Called immediately before the request goes on the wire
    fn will_send(&self, _request: &dyn RequestType, _target: &dyn Target) {}

    /// Called with the transport result, before any plugin processes it
    fn did_receive(&self, _result: &Result<Response>, _target: &dyn Target) {}

    /// Modify the result before it is handed to the caller
    fn process(&self, result: Result<Response>, _target: &dyn Target) -> Result<Response> {
        result
    }
}

/// Ordered collection of plugins
#[derive(Clone, Default)]
pub struct PluginSet {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin; hooks run in registration order
    pub fn add<P: Plugin + 'static>(&mut self, plugin: P) {
        self.plugins.push(Arc::new(plugin));
    }

    /// Add an already shared plugin
    pub fn add_shared(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Number of plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every `prepare` hook
    pub fn prepare(&self, request: Request, target: &dyn Target) -> Request {
        self.plugins
            .iter()
            .fold(request, |request, plugin| plugin.prepare(request, target))
    }

    /// Run every `will_send` hook
    pub fn will_send(&self, request: &dyn RequestType, target: &dyn Target) {
        for plugin in &self.plugins {
            plugin.will_send(request, target);
        }
    }

    /// Run every `did_receive` hook on the raw result, then every `process` hook
    pub fn complete(&self, result: Result<Response>, target: &dyn Target) -> Result<Response> {
        for plugin in &self.plugins {
            plugin.did_receive(&result, target);
        }

        self.plugins
            .iter()
            .fold(result, |result, plugin| plugin.process(result, target))
    }
}

/// Rejects responses whose status is not 2xx
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateStatus;

impl Plugin for ValidateStatus {
    fn process(&self, result: Result<Response>, _target: &dyn Target) -> Result<Response> {
        match result {
            Ok(response) if !response.is_success() => Err(crate::error::Error::status(
                response.url_str(),
                response.status_code(),
            )),
            other => other,
        }
    }
}
