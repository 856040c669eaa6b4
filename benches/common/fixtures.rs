// ABOUTME: Benchmark fixtures generating ride histories with chain markers
// ABOUTME: Deterministic data so measurements are reproducible across runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures for ride histories.

use chain_tracker::constants::markers;
use chain_tracker::models::{Activity, ActivityBuilder, SportType};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Predefined history sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum HistorySize {
    /// Half a year of daily rides
    HalfYear,
    /// Several years of rides
    Large,
}

impl HistorySize {
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::HalfYear => 180,
            Self::Large => 5_000,
        }
    }
}

fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 7, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Title for ride `index`: a chain opens every 10th ride and closes 6 rides later
fn ride_name(index: usize) -> String {
    match index % 10 {
        0 => format!("Ride {index} {}", markers::CHAIN_START),
        6 => format!("Ride {index} {}", markers::CHAIN_END),
        _ => format!("Ride {index}"),
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn generate_ride(index: usize) -> Activity {
    let distance_meters = 5_000.0 + ((index * 251) % 40_000) as f64;
    ActivityBuilder::new(
        format!("bench_ride_{index}"),
        ride_name(index),
        SportType::Ride,
        base_date() + Duration::hours(index as i64 * 20),
        "benchmark",
    )
    .distance_meters(distance_meters)
    .build()
}

/// Chronological ride history of the given size
#[must_use]
pub fn generate_rides(size: HistorySize) -> Vec<Activity> {
    (0..size.count()).map(generate_ride).collect()
}
