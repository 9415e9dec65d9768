// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::sync::Arc;

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use reqtap::network::{pretty_json, DataFormatter};
use reqtap::{Endpoint, LogFormatter, Request, Response};

fn request_formatting_benchmark(c: &mut Criterion) {
    let request = Request::post("https://api.example.com/v1/items")
        .unwrap()
        .header("content-type", "application/json")
        .header("authorization", "Bearer token")
        .body(r#"{"name":"widget","count":3}"#);
    let formatter = LogFormatter::new(true, None);

    c.bench_function("format_request_verbose", |b| {
        b.iter(|| black_box(formatter.format_request(Some(black_box(&request)))))
    });

    c.bench_function("curl_command", |b| {
        b.iter(|| black_box(black_box(&request).curl_command()))
    });
}

fn response_formatting_benchmark(c: &mut Criterion) {
    let body = Bytes::from(r#"{"items":[{"id":1},{"id":2},{"id":3}]}"#);
    let response = Response::new(
        StatusCode::OK,
        HeaderMap::new(),
        body.clone(),
        Url::parse("https://api.example.com/v1/items").unwrap(),
        12,
    );
    let target = Endpoint::parse("https://api.example.com/v1").unwrap().path("items");
    let transform: DataFormatter = Arc::new(pretty_json);
    let pretty = LogFormatter::new(true, Some(transform));

    c.bench_function("format_response_pretty_json", |b| {
        b.iter(|| black_box(pretty.format_response(Some(&response), Some(&body), &target)))
    });
}

criterion_group!(benches, request_formatting_benchmark, response_formatting_benchmark);
criterion_main!(benches);
