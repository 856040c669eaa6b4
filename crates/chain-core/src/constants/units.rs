// ABOUTME: Unit conversion constants for distance and display precision
// ABOUTME: Provides named constants to eliminate magic numbers in calculations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Meters per kilometer conversion factor
pub const METERS_PER_KM: f64 = 1000.0;

/// Decimal places used for chain totals and running totals
pub const TOTAL_DISTANCE_DECIMALS: usize = 2;

/// Decimal places used for a single activity's distance
pub const ACTIVITY_DISTANCE_DECIMALS: usize = 1;
