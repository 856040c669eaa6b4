// ABOUTME: Fitness activity model with ActivityBuilder for chain segmentation input
// ABOUTME: Carries title, description, start time and distance of a recorded activity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SportType;
use crate::constants::units::METERS_PER_KM;

/// Represents a single recorded activity from a provider
///
/// Only the fields needed to find and total chains are kept: identity, the
/// free-text title and description that may carry chain markers, the start
/// time and the distance. Fields are private; read them through the accessor
/// methods and construct instances with `ActivityBuilder`.
///
/// # Examples
///
/// ```rust
/// use chain_core::models::{ActivityBuilder, SportType};
/// use chrono::Utc;
///
/// let activity = ActivityBuilder::new("12345", "Commute ⛓️", SportType::Ride, Utc::now(), "strava")
///     .distance_meters(12_400.0)
///     .build();
///
/// assert_eq!(activity.id(), "12345");
/// assert_eq!(activity.distance_km(), Some(12.4));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier for the activity (provider-specific)
    id: String,
    /// Human-readable title of the activity
    name: String,
    /// Free-text description, when the provider supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Type of sport
    sport_type: SportType,
    /// When the activity started (UTC)
    start_date: DateTime<Utc>,
    /// Total distance covered in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance_meters: Option<f64>,
    /// Source provider of this activity data
    provider: String,
}

/// Accessor methods for Activity fields
impl Activity {
    /// Returns the unique identifier for the activity
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable title of the activity
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the type of sport
    #[must_use]
    pub const fn sport_type(&self) -> &SportType {
        &self.sport_type
    }

    /// Returns when the activity started (UTC)
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Returns the total distance in meters, if the provider reported one
    #[must_use]
    pub const fn distance_meters(&self) -> Option<f64> {
        self.distance_meters
    }

    /// Returns the distance normalized to kilometers
    #[must_use]
    pub fn distance_km(&self) -> Option<f64> {
        self.distance_meters.map(|meters| meters / METERS_PER_KM)
    }

    /// Returns the source provider name
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Returns a copy of this activity with the description replaced
    ///
    /// Used when a detail request fills in text the summary listing omitted.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Builder for `Activity`
#[derive(Debug, Clone)]
pub struct ActivityBuilder {
    activity: Activity,
}

impl ActivityBuilder {
    /// Creates a new `ActivityBuilder` with required fields
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sport_type: SportType,
        start_date: DateTime<Utc>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            activity: Activity {
                id: id.into(),
                name: name.into(),
                description: None,
                sport_type,
                start_date,
                distance_meters: None,
                provider: provider.into(),
            },
        }
    }

    /// Sets the distance in meters
    #[must_use]
    pub const fn distance_meters(mut self, value: f64) -> Self {
        self.activity.distance_meters = Some(value);
        self
    }

    /// Sets the distance in meters (optional)
    #[must_use]
    pub const fn distance_meters_opt(mut self, value: Option<f64>) -> Self {
        self.activity.distance_meters = value;
        self
    }

    /// Sets the distance in kilometers
    #[must_use]
    pub fn distance_km(mut self, value: f64) -> Self {
        self.activity.distance_meters = Some(value * METERS_PER_KM);
        self
    }

    /// Sets the description
    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.activity.description = Some(value.into());
        self
    }

    /// Sets the description (optional)
    #[must_use]
    pub fn description_opt(mut self, value: Option<String>) -> Self {
        self.activity.description = value;
        self
    }

    /// Builds the `Activity`
    #[must_use]
    pub fn build(self) -> Activity {
        self.activity
    }
}
