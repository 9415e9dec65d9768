// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request lifecycle instrumentation
//!
//! Exactly-once cancellation tokens, the plugin hooks a dispatcher calls
//! around each request, and the network activity logger built on them.

mod cancel;
mod format;
mod logger;
mod output;
mod plugin;

pub use cancel::{Cancellable, CancellationToken, RequestHandle, EMPTY_REQUEST_DESCRIPTION};
pub use format::{
    format_line, labels, pretty_json, timestamp, DataFormatter, LogFormatter, DATE_FORMAT,
    LOGGER_ID,
};
pub use logger::{LoggerConfig, NetworkLoggerPlugin, SEPARATOR, TERMINATOR};
pub use output::{render, stdout_output, tracing_output, OutputSink};
pub use plugin::{Plugin, PluginSet, RequestType, ValidateStatus};
