// ABOUTME: Core types and constants for the Strava chain tracker
// ABOUTME: Foundation crate with error handling, activity models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Chain Core
//!
//! Foundation crate providing shared types and constants for the chain tracker.
//! It changes rarely, so the provider crate and the main crate can compile
//! against it incrementally.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ProviderError`
//! - **constants**: Marker glyphs, units, provider names and environment keys
//! - **models**: `Activity`, `ActivityBuilder` and `SportType`

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Activity, SportType)
pub mod models;
