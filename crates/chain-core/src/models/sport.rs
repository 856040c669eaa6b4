// ABOUTME: Sport type enumeration for activities pulled from a provider
// ABOUTME: Maps provider type strings and identifies cycling activities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Enumeration of sport types seen in an activity listing
///
/// Chains are only ever built from cycling activities, so the cycling
/// variants are spelled out and everything else collapses into a handful of
/// common types plus `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SportType {
    /// Outdoor road cycling
    Ride,
    /// Indoor/trainer cycling activity
    VirtualRide,
    /// Electric bike ride
    EbikeRide,
    /// Mountain biking activity
    MountainBike,
    /// Gravel cycling activity
    GravelRide,
    /// Running activity
    Run,
    /// Walking activity
    Walk,
    /// Hiking activity
    Hike,
    /// Swimming activity
    Swim,
    /// Other activity type not covered above
    Other(String),
}

impl SportType {
    /// Create `SportType` from the provider's type string (Strava naming)
    #[must_use]
    pub fn from_provider_string(provider_sport: &str) -> Self {
        match provider_sport {
            "Ride" => Self::Ride,
            "VirtualRide" => Self::VirtualRide,
            "EBikeRide" => Self::EbikeRide,
            "MountainBikeRide" => Self::MountainBike,
            "GravelRide" => Self::GravelRide,
            "Run" => Self::Run,
            "Walk" => Self::Walk,
            "Hike" => Self::Hike,
            "Swim" => Self::Swim,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Whether this is any kind of bike ride
    #[must_use]
    pub const fn is_cycling(&self) -> bool {
        matches!(
            self,
            Self::Ride | Self::VirtualRide | Self::EbikeRide | Self::MountainBike | Self::GravelRide
        )
    }

    /// Get the human-readable name for this sport type
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Ride => "bike ride",
            Self::VirtualRide => "indoor bike ride",
            Self::EbikeRide => "e-bike ride",
            Self::MountainBike => "mountain bike ride",
            Self::GravelRide => "gravel ride",
            Self::Run => "run",
            Self::Walk => "walk",
            Self::Hike => "hike",
            Self::Swim => "swim",
            Self::Other(_) => "activity",
        }
    }
}
