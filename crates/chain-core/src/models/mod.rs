// ABOUTME: Core data models for the chain tracker
// ABOUTME: Re-exports Activity, ActivityBuilder and SportType
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Provider-agnostic representation of the activities a chain is built from.
//! Providers map their own DTOs into these types; the segmenter and the report
//! layer only ever see `Activity`.

mod activity;
mod sport;

pub use activity::{Activity, ActivityBuilder};
pub use sport::SportType;
