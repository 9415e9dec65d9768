// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! reqtap CLI - issue a request and watch its network activity
//!
//! Example usage and demonstration of the reqtap library.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use reqtap::network::{pretty_json, tracing_output};
use reqtap::{Endpoint, HttpClient, LoggerConfig, NetworkLoggerPlugin, Target};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reqtap=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" | "curl" => {
            if args.len() < 3 {
                eprintln!("Usage: reqtap {} <url> [OPTIONS]", args[1]);
                return ExitCode::from(1);
            }
            let options = match Options::parse(&args[3..]) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::from(1);
                }
            };
            if args[1] == "curl" {
                print_curl(&args[2], &options)
            } else {
                fetch_url(&args[2], options).await
            }
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("reqtap {}", reqtap::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"reqtap - Request lifecycle logging for HTTP clients

USAGE:
    reqtap <COMMAND> <url> [OPTIONS]

COMMANDS:
    fetch <url>     Send a request and log its network activity
    curl <url>      Print the equivalent curl command without sending
    help            Show this help message
    version         Show version information

OPTIONS:
    -X <METHOD>         HTTP method (default: GET)
    -H "<name>: <value>" Add a request header (repeatable)
    -d <BODY>           Request body
    --verbose           Log bodies, one record per line
    --curl              Log the request as a curl command
    --pretty-json       Pretty-print JSON response bodies (implies --verbose)
    --tracing           Send network logs through tracing instead of stdout

Press Ctrl-C during fetch to cancel the in-flight request.

EXAMPLES:
    reqtap fetch https://httpbin.org/get --verbose
    reqtap fetch https://httpbin.org/post -X POST -d '{{"a":1}}' -H "content-type: application/json" --curl
    reqtap curl https://example.com/api -H "authorization: Bearer token"
"#
    );
}

/// Command line options shared by `fetch` and `curl`
#[derive(Debug, Default)]
struct Options {
    method: Option<Method>,
    headers: HeaderMap,
    body: Option<String>,
    verbose: bool,
    curl: bool,
    pretty_json: bool,
    tracing: bool,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-X" => {
                    let value = iter.next().ok_or("-X requires a method")?;
                    let method = Method::from_bytes(value.to_uppercase().as_bytes())
                        .map_err(|e| format!("Invalid HTTP method '{}': {}", value, e))?;
                    options.method = Some(method);
                }
                "-H" => {
                    let value = iter.next().ok_or("-H requires a header")?;
                    let (name, header_value) = value
                        .split_once(':')
                        .ok_or_else(|| format!("Invalid header '{}': expected name: value", value))?;
                    let name = HeaderName::try_from(name.trim())
                        .map_err(|e| format!("Invalid header name '{}': {}", name, e))?;
                    let header_value = HeaderValue::try_from(header_value.trim())
                        .map_err(|e| format!("Invalid header value for '{}': {}", name, e))?;
                    options.headers.append(name, header_value);
                }
                "-d" => {
                    let value = iter.next().ok_or("-d requires a body")?;
                    options.body = Some(value.clone());
                }
                "--verbose" => options.verbose = true,
                "--curl" => options.curl = true,
                "--pretty-json" => {
                    options.pretty_json = true;
                    options.verbose = true;
                }
                "--tracing" => options.tracing = true,
                other => return Err(format!("Unknown option: {}", other)),
            }
        }

        Ok(options)
    }

    fn endpoint(&self, url: &str) -> reqtap::Result<Endpoint> {
        let method = match (&self.method, &self.body) {
            (Some(method), _) => method.clone(),
            (None, Some(_)) => Method::POST,
            (None, None) => Method::GET,
        };

        let mut endpoint = Endpoint::parse(url)?
            .method(method)
            .headers(self.headers.clone());
        if let Some(ref body) = self.body {
            endpoint = endpoint.body(body.clone());
        }
        Ok(endpoint)
    }

    fn logger_config(&self) -> LoggerConfig {
        let mut config = LoggerConfig::new().verbose(self.verbose).curl(self.curl);
        if self.pretty_json {
            config = config.response_data_formatter(Arc::new(pretty_json));
        }
        if self.tracing {
            config = config.output(tracing_output());
        }
        config
    }
}

fn print_curl(url: &str, options: &Options) -> ExitCode {
    match options.endpoint(url) {
        Ok(endpoint) => {
            println!("{}", endpoint.request().curl_command());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid request: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn fetch_url(url: &str, options: Options) -> ExitCode {
    let target: Arc<dyn Target> = match options.endpoint(url) {
        Ok(endpoint) => Arc::new(endpoint),
        Err(e) => {
            eprintln!("Invalid request: {}", e);
            return ExitCode::from(1);
        }
    };

    let client = match HttpClient::new() {
        Ok(client) => client.plugin(NetworkLoggerPlugin::new(options.logger_config())),
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            return ExitCode::from(1);
        }
    };

    let pending = client.spawn(target);
    let token = pending.token();
    let wait = pending.wait();
    tokio::pin!(wait);

    let result = tokio::select! {
        result = &mut wait => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, cancelling request");
            token.cancel();
            wait.await
        }
    };

    match result {
        Ok(response) => {
            println!("\n=== Response ===");
            println!("Status: {}", response.status);
            println!("URL: {}", response.url);
            println!("Content-Type: {:?}", response.content_type());
            println!("Size: {} bytes", response.body.len());
            println!("Time: {}ms", response.response_time_ms);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("Request cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            ExitCode::from(1)
        }
    }
}
