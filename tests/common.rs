// ABOUTME: Shared fixtures for chain tracker integration tests
// ABOUTME: Builds rides on consecutive days with optional descriptions and distances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(dead_code, clippy::unwrap_used, missing_docs)]

use chain_tracker::models::{Activity, ActivityBuilder, SportType};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub const START: &str = "⛓️";
pub const END: &str = "⛓️‍💥";

/// 07:00 UTC on the given day offset from 2025-05-01
pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 7, 0, 0).unwrap() + Duration::days(offset)
}

pub fn ride(id: &str, name: &str, km: f64, offset: i64) -> Activity {
    ActivityBuilder::new(id, name, SportType::Ride, day(offset), "strava")
        .distance_km(km)
        .build()
}

pub fn ride_with_description(id: &str, name: &str, description: &str, km: f64, offset: i64) -> Activity {
    ActivityBuilder::new(id, name, SportType::Ride, day(offset), "strava")
        .distance_km(km)
        .description(description)
        .build()
}

pub fn activity(id: &str, name: &str, sport_type: SportType, km: f64, offset: i64) -> Activity {
    ActivityBuilder::new(id, name, sport_type, day(offset), "strava")
        .distance_km(km)
        .build()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
