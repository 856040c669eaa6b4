// ABOUTME: Criterion benchmarks for chain segmentation and report rendering
// ABOUTME: Measures classification, the segmenter and the Markdown/HTML emitters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for chain segmentation.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

mod common;

use chain_tracker::reports::{render_html, render_markdown, ChainReport};
use chain_tracker::segmentation::{classify, segment, MarkerConfig, OrderingPolicy, SegmenterConfig};
use chrono::Utc;
use common::fixtures::{generate_rides, HistorySize};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_classify(c: &mut Criterion) {
    let config = MarkerConfig::default();
    let mut group = c.benchmark_group("classify");

    group.bench_function("plain_title", |b| {
        b.iter(|| classify(black_box("Evening ride along the canal"), None, &config));
    });
    group.bench_function("end_marker_with_description", |b| {
        b.iter(|| {
            classify(
                black_box("Home ⛓️‍💥"),
                Some(black_box("Long day, closing the chain")),
                &config,
            )
        });
    });
    group.finish();
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");

    for size in [HistorySize::HalfYear, HistorySize::Large] {
        let rides = generate_rides(size);
        group.throughput(Throughput::Elements(rides.len() as u64));

        for ordering in [OrderingPolicy::Sort, OrderingPolicy::Trust] {
            let config = SegmenterConfig::with_ordering(ordering);
            group.bench_with_input(
                BenchmarkId::new(format!("{ordering:?}"), rides.len()),
                &rides,
                |b, rides| b.iter(|| segment(black_box(rides.clone()), &config).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let rides = generate_rides(HistorySize::Large);
    let segmentation = segment(rides, &SegmenterConfig::default()).unwrap();
    let report = ChainReport::from_chains(&segmentation.chains, Utc::now());

    let mut group = c.benchmark_group("render");
    group.bench_function("markdown", |b| b.iter(|| render_markdown(black_box(&report))));
    group.bench_function("html", |b| b.iter(|| render_html(black_box(&report))));
    group.finish();
}

criterion_group!(benches, bench_classify, bench_segment, bench_render);
criterion_main!(benches);
