// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation
//!
//! A thin reqwest wrapper that runs every request through a [`PluginSet`] and
//! hands out a [`CancellationToken`] for spawned requests. Connection handling,
//! TLS and redirects stay with reqwest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::request::{Body, Request};
use super::response::Response;
use super::target::Target;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::network::{CancellationToken, Plugin, PluginSet, RequestHandle, RequestType};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("accept", HeaderValue::from_static("*/*"));
        default_headers.insert(
            "accept-encoding",
            HeaderValue::from_static("gzip, deflate, br"),
        );

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            accept_invalid_certs: false,
            default_headers,
            proxy: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set maximum redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

/// HTTP client with lifecycle plugins
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    plugins: PluginSet,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(config.default_headers.clone());

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            plugins: PluginSet::new(),
        })
    }

    /// Register a plugin
    pub fn plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.add(plugin);
        self
    }

    /// Register a shared plugin
    pub fn shared_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.add_shared(plugin);
        self
    }

    /// Registered plugins
    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Execute a request for a target, running every plugin hook
    pub async fn execute(&self, request: Request, target: &dyn Target) -> Result<Response> {
        let request = self.plugins.prepare(request, target);
        self.plugins.will_send(&request, target);

        let result = self.send(request).await;
        self.plugins.complete(result, target)
    }

    /// Issue a request for a target in the background
    ///
    /// The returned [`PendingRequest`] carries a token that cancels the
    /// request; a cancelled request completes with [`Error::Cancelled`].
    pub fn spawn(&self, target: Arc<dyn Target>) -> PendingRequest {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                return PendingRequest::failed(Error::config(format!(
                    "spawn requires a tokio runtime: {}",
                    e
                )))
            }
        };

        let request = self.plugins.prepare(target.request(), target.as_ref());

        let (cancel_tx, cancel_rx) = broadcast::channel(1);
        let handle = Arc::new(InFlight {
            cancel_tx,
            request: request.clone(),
        });
        let token = Arc::new(CancellationToken::from_handle(handle.clone()));

        let client = self.clone();
        let join = runtime.spawn(async move {
            client.plugins.will_send(handle.as_ref(), target.as_ref());
            let result = client.send_cancellable(request, cancel_rx).await;
            client.plugins.complete(result, target.as_ref())
        });

        PendingRequest {
            token,
            join: Some(join),
            failure: None,
        }
    }

    async fn send_cancellable(
        &self,
        request: Request,
        mut cancel_rx: broadcast::Receiver<()>,
    ) -> Result<Response> {
        tokio::select! {
            result = self.send(request) => result,
            _ = cancel_rx.recv() => Err(Error::Cancelled),
        }
    }

    /// Put the request on the wire and read the full response
    async fn send(&self, request: Request) -> Result<Response> {
        let start = Instant::now();
        let url = request.url.clone();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        match request.body {
            Some(Body::Bytes(bytes)) => builder = builder.body(bytes),
            Some(Body::Stream(stream)) => {
                let stream = stream
                    .take()
                    .ok_or_else(|| Error::other("request body stream already consumed"))?;
                builder = builder.body(reqwest::Body::wrap_stream(stream));
            }
            None => {}
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Request failed");
            Error::from(e)
        })?;

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let response_time = start.elapsed().as_millis() as u64;

        tracing::debug!(url = %final_url, status = %status, time_ms = response_time, "Response");

        Ok(Response::new(status, headers, body, final_url, response_time))
    }
}

/// Transport handle of a spawned request
struct InFlight {
    cancel_tx: broadcast::Sender<()>,
    request: Request,
}

impl RequestHandle for InFlight {
    fn cancel(&self) {
        // No receiver means the request already finished.
        let _ = self.cancel_tx.send(());
    }

    fn debug_description(&self) -> Option<String> {
        Some(self.request.curl_command())
    }
}

impl RequestType for InFlight {
    fn request(&self) -> Option<&Request> {
        Some(&self.request)
    }

    fn debug_description(&self) -> Option<String> {
        Some(self.request.curl_command())
    }
}

/// A request running in the background
pub struct PendingRequest {
    token: Arc<CancellationToken>,
    join: Option<JoinHandle<Result<Response>>>,
    failure: Option<Error>,
}

impl PendingRequest {
    /// A request that failed before it could be issued
    ///
    /// Its token has nothing to cancel.
    pub fn failed(error: Error) -> Self {
        Self {
            token: Arc::new(CancellationToken::new(|| {})),
            join: None,
            failure: Some(error),
        }
    }

    /// Token cancelling this request
    pub fn token(&self) -> Arc<CancellationToken> {
        Arc::clone(&self.token)
    }

    /// Cancel this request
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the request to complete
    pub async fn wait(self) -> Result<Response> {
        if let Some(error) = self.failure {
            return Err(error);
        }
        match self.join {
            Some(join) => join
                .await
                .map_err(|e| Error::other(format!("request task failed: {}", e)))?,
            None => Err(Error::other("request was never issued")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Endpoint;
    use crate::network::{LoggerConfig, NetworkLoggerPlugin, OutputSink, ValidateStatus};
    use parking_lot::Mutex;
    use reqwest::Method;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    type Calls = Arc<Mutex<Vec<Vec<String>>>>;

    fn capturing_logger(verbose: bool, curl: bool) -> (NetworkLoggerPlugin, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let sink_calls = calls.clone();
        let sink: OutputSink = Arc::new(move |items: &[String], _: &str, _: &str| {
            sink_calls.lock().push(items.to_vec());
        });
        let config = LoggerConfig::new().verbose(verbose).curl(curl).output(sink);
        (NetworkLoggerPlugin::new(config), calls)
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.config().user_agent, DEFAULT_USER_AGENT);
        assert!(client.plugins().is_empty());

        let shared: Arc<dyn Plugin> = Arc::new(NetworkLoggerPlugin::default());
        let first = client.clone().shared_plugin(shared.clone());
        let second = client.plugin(ValidateStatus).shared_plugin(shared);
        assert_eq!(first.plugins().len(), 1);
        assert_eq!(second.plugins().len(), 2);
    }

    #[test]
    fn test_invalid_proxy() {
        let result = HttpClient::with_config(HttpClientConfig::new().proxy("::not a proxy::"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_execute_logs_request_and_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items"))
            .and(header("x-trace", "abc"))
            .and(body_string("payload"))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .mount(&server)
            .await;

        let (logger, calls) = capturing_logger(false, false);
        let client = HttpClient::new().unwrap().plugin(logger);
        let target = Endpoint::parse(server.uri())
            .unwrap()
            .path("items")
            .method(Method::POST);
        let request = target.request().header("x-trace", "abc").body("payload");

        let response = client.execute(request, &target).await.unwrap();
        assert_eq!(response.status_code(), 201);
        assert_eq!(response.text().unwrap(), "created");

        let calls = calls.lock();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].len(), 3); // description, headers, method
        assert_eq!(calls[1].len(), 1);
        assert!(calls[1][0].contains("201 Created"));
    }

    #[tokio::test]
    async fn test_execute_streamed_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(body_string("chunk-1chunk-2"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let stream = crate::http::BodyStream::new(futures::stream::iter(vec![
            Ok::<_, std::io::Error>(bytes::Bytes::from("chunk-1")),
            Ok(bytes::Bytes::from("chunk-2")),
        ]));
        let target = Endpoint::parse(server.uri()).unwrap().method(Method::PUT);
        let request = target.request().body_stream(stream.clone());

        let client = HttpClient::new().unwrap();
        let response = client.execute(request, &target).await.unwrap();

        assert_eq!(response.status_code(), 204);
        assert!(stream.is_consumed());
    }

    #[tokio::test]
    async fn test_spawn_logs_curl_command() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let (logger, calls) = capturing_logger(true, true);
        let client = HttpClient::new().unwrap().plugin(logger);
        let target: Arc<dyn Target> = Arc::new(Endpoint::parse(server.uri()).unwrap().path("ping"));

        let pending = client.spawn(target);
        assert!(pending.token().debug_description().starts_with("$ curl -v"));

        let response = pending.wait().await.unwrap();
        assert_eq!(response.text().unwrap(), "ok");

        let calls = calls.lock();
        // curl line, then response and body as separate records
        assert_eq!(calls.len(), 3);
        assert!(calls[0][0].starts_with("$ curl -v"));
        assert!(calls[0][0].ends_with("/ping\""));
        assert!(calls[2][0].ends_with("Response Body: ok"));
    }

    #[tokio::test]
    async fn test_spawn_cancel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let (logger, calls) = capturing_logger(false, false);
        let client = HttpClient::new().unwrap().plugin(logger);
        let target: Arc<dyn Target> = Arc::new(Endpoint::parse(server.uri()).unwrap());

        let pending = client.spawn(target);
        let token = pending.token();
        token.cancel();
        token.cancel();
        assert!(token.is_canceled());

        let err = pending.wait().await.unwrap_err();
        assert!(err.is_cancelled());

        let calls = calls.lock();
        let last = calls.last().unwrap();
        assert_eq!(last.len(), 1);
        assert!(last[0].contains("Received empty network response for"));
    }

    #[tokio::test]
    async fn test_validate_status_plugin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap().plugin(ValidateStatus);
        let target = Endpoint::parse(server.uri()).unwrap();

        let err = client.execute(target.request(), &target).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_spawn_outside_runtime_fails() {
        let client = HttpClient::new().unwrap();
        let target: Arc<dyn Target> = Arc::new(Endpoint::parse("http://localhost").unwrap());

        let pending = client.spawn(target);
        assert_eq!(pending.token().debug_description(), "Empty Request");

        let err = tokio_test::block_on(pending.wait()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_failed_pending_request() {
        let pending = PendingRequest::failed(Error::config("bad target"));
        pending.cancel();
        assert_eq!(pending.token().debug_description(), "Empty Request");

        let err = pending.wait().await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
