// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network activity logging plugin

use std::fmt;

use super::format::{pretty_json, DataFormatter, LogFormatter};
use super::output::{stdout_output, OutputSink};
use super::plugin::{Plugin, RequestType};
use crate::error::Result;
use crate::http::{Response, Target};

/// Placed between the items of one output record
pub const SEPARATOR: &str = ", ";
/// Written after each output record
pub const TERMINATOR: &str = "\n";

/// Logger plugin configuration
#[derive(Clone)]
pub struct LoggerConfig {
    /// Log bodies, one output record per line
    pub verbose: bool,
    /// Log outgoing requests as a single curl command
    pub curl: bool,
    /// Where formatted records are delivered
    pub output: OutputSink,
    /// Transform applied to response bodies before logging
    pub response_data_formatter: Option<DataFormatter>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            curl: false,
            output: stdout_output(),
            response_data_formatter: None,
        }
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("verbose", &self.verbose)
            .field("curl", &self.curl)
            .field(
                "response_data_formatter",
                &self.response_data_formatter.is_some(),
            )
            .finish_non_exhaustive()
    }
}

impl LoggerConfig {
    /// Create a new logger config
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable verbose mode
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable/disable curl-style request logging
    pub fn curl(mut self, curl: bool) -> Self {
        self.curl = curl;
        self
    }

    /// Set the output sink
    pub fn output(mut self, output: OutputSink) -> Self {
        self.output = output;
        self
    }

    /// Set the response body transform
    pub fn response_data_formatter(mut self, formatter: DataFormatter) -> Self {
        self.response_data_formatter = Some(formatter);
        self
    }

    /// Verbose logging with pretty-printed JSON responses
    pub fn for_debugging() -> Self {
        Self::default()
            .verbose(true)
            .response_data_formatter(std::sync::Arc::new(pretty_json))
    }
}

/// Logs outgoing requests and incoming responses
///
/// Holds no per-request state; a single instance can serve any number of
/// concurrent requests.
pub struct NetworkLoggerPlugin {
    formatter: LogFormatter,
    curl: bool,
    output: OutputSink,
}

impl NetworkLoggerPlugin {
    /// Create a logger plugin
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            formatter: LogFormatter::new(config.verbose, config.response_data_formatter),
            curl: config.curl,
            output: config.output,
        }
    }

    /// Verbose mode sends one record per line, otherwise one record per event.
    fn output_items(&self, items: Vec<String>) {
        if self.formatter.verbose() {
            for item in items {
                (self.output)(std::slice::from_ref(&item), SEPARATOR, TERMINATOR);
            }
        } else {
            (self.output)(&items, SEPARATOR, TERMINATOR);
        }
    }
}

impl Default for NetworkLoggerPlugin {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl Plugin for NetworkLoggerPlugin {
    fn will_send(&self, request: &dyn RequestType, _target: &dyn Target) {
        if self.curl {
            if let Some(description) = request.debug_description() {
                (self.output)(std::slice::from_ref(&description), SEPARATOR, TERMINATOR);
                return;
            }
        }
        self.output_items(self.formatter.format_request(request.request()));
    }

    fn did_receive(&self, result: &Result<Response>, target: &dyn Target) {
        // The error itself is not logged; a failure reads like an empty response.
        let items = match result {
            Ok(response) => {
                self.formatter
                    .format_response(Some(response), Some(&response.body), target)
            }
            Err(_) => self.formatter.format_response(None, None, target),
        };
        self.output_items(items);
    }
}
