// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # reqtap - Request lifecycle plugins for HTTP clients
//!
//! A thin instrumentation and cancellation layer around an HTTP client.
//! Plugins observe and modify outgoing requests and incoming responses
//! without depending on the transport's concrete types.
//!
//! ## Features
//!
//! - Cancellation tokens: the cancel action runs exactly once, whatever the
//!   number of concurrent callers
//! - Network logging: itemized or curl-style request logs, optional verbose
//!   bodies and a response body transform
//! - Pluggable output: stdout, `tracing`, or any closure
//! - Plugin hooks: prepare, will_send, did_receive, process
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reqtap::{Endpoint, HttpClient, LoggerConfig, NetworkLoggerPlugin, Target};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new()?
//!         .plugin(NetworkLoggerPlugin::new(LoggerConfig::new().verbose(true)));
//!
//!     let target: Arc<dyn Target> = Arc::new(Endpoint::parse("https://example.com")?);
//!     let pending = client.spawn(target);
//!
//!     // Any clone of the token may cancel; the request is aborted once.
//!     let token = pending.token();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(std::time::Duration::from_secs(5)).await;
//!         token.cancel();
//!     });
//!
//!     let response = pending.wait().await?;
//!     println!("{}", response.status);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod network;

// Re-exports for convenience

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{
    Body, BodyStream, Endpoint, HttpClient, HttpClientConfig, PendingRequest, Request,
    Response, Target,
};

// Network
pub use network::{Cancellable, CancellationToken, RequestHandle};
pub use network::{LogFormatter, LoggerConfig, NetworkLoggerPlugin, OutputSink};
pub use network::{Plugin, PluginSet, RequestType, ValidateStatus};

/// reqtap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
