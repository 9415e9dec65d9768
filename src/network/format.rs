// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Formatting of network activity into log lines
//!
//! Every line has the shape `<logger id>: [<dd/mm/yyyy hh:mm:ss>] <label>: <message>`.
//! The timestamp is read fresh for each line.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Local;

use crate::http::{header_map_description, Request, Response, Target};

/// Fixed logger identifier prefixed to every line
pub const LOGGER_ID: &str = "Reqtap_Logger";

/// Numeric timestamp format, independent of the process locale
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Transform applied to response bodies before they are logged
pub type DataFormatter = Arc<dyn Fn(&Bytes) -> Bytes + Send + Sync>;

/// Category labels
pub mod labels {
    pub const REQUEST: &str = "Request";
    pub const REQUEST_HEADERS: &str = "Request Headers";
    pub const REQUEST_BODY_STREAM: &str = "Request Body Stream";
    pub const HTTP_METHOD: &str = "HTTP Request Method";
    pub const REQUEST_BODY: &str = "Request Body";
    pub const RESPONSE: &str = "Response";
    pub const RESPONSE_BODY: &str = "Response Body";
}

/// Turns requests and responses into log lines
#[derive(Clone, Default)]
pub struct LogFormatter {
    verbose: bool,
    response_data_formatter: Option<DataFormatter>,
}

impl LogFormatter {
    /// Create a formatter
    pub fn new(verbose: bool, response_data_formatter: Option<DataFormatter>) -> Self {
        Self {
            verbose,
            response_data_formatter,
        }
    }

    /// Whether bodies are included
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Format an outgoing request
    ///
    /// Lines absent from the request are skipped. The body is only included in
    /// verbose mode, and only when it is buffered UTF-8 text.
    pub fn format_request(&self, request: Option<&Request>) -> Vec<String> {
        let mut output = Vec::new();

        let description = request
            .map(|r| r.to_string())
            .unwrap_or_else(|| "(invalid request)".to_string());
        output.push(format_line(labels::REQUEST, &description));

        let Some(request) = request else {
            return output;
        };

        if !request.headers.is_empty() {
            output.push(format_line(
                labels::REQUEST_HEADERS,
                &header_map_description(&request.headers),
            ));
        }

        if let Some(stream) = request.body_stream_ref() {
            output.push(format_line(labels::REQUEST_BODY_STREAM, &stream.to_string()));
        }

        output.push(format_line(labels::HTTP_METHOD, request.method.as_str()));

        if self.verbose {
            if let Some(text) = request.body_bytes().and_then(|b| std::str::from_utf8(b).ok()) {
                output.push(format_line(labels::REQUEST_BODY, text));
            }
        }

        output
    }

    /// Format an incoming response
    ///
    /// A missing response yields a single line naming the target.
    pub fn format_response(
        &self,
        response: Option<&Response>,
        data: Option<&Bytes>,
        target: &dyn Target,
    ) -> Vec<String> {
        let Some(response) = response else {
            return vec![format_line(
                labels::RESPONSE,
                &format!("Received empty network response for {}.", target),
            )];
        };

        let mut output = vec![format_line(labels::RESPONSE, &response.to_string())];

        if self.verbose {
            if let Some(data) = data {
                let data = match self.response_data_formatter {
                    Some(ref formatter) => formatter(data),
                    None => data.clone(),
                };
                if let Ok(text) = std::str::from_utf8(&data) {
                    output.push(format_line(labels::RESPONSE_BODY, text));
                }
            }
        }

        output
    }
}

/// Current local time in [`DATE_FORMAT`]
pub fn timestamp() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Format a single log line
pub fn format_line(label: &str, message: &str) -> String {
    format!("{}: [{}] {}: {}", LOGGER_ID, timestamp(), label, message)
}

/// Pretty-print JSON bodies, passing anything else through unchanged
pub fn pretty_json(data: &Bytes) -> Bytes {
    serde_json::from_slice::<serde_json::Value>(data)
        .and_then(|value| serde_json::to_vec_pretty(&value))
        .map(Bytes::from)
        .unwrap_or_else(|_| data.clone())
}
