// ABOUTME: Configuration module for the chain tracker
// ABOUTME: Exposes environment-driven settings and .env helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable loading and validation
pub mod environment;

pub use environment::{load_dotenv, upsert_env_line, StravaSettings, TrackerConfig};
