// ABOUTME: Pure marker classification of activity titles and descriptions
// ABOUTME: Decides whether an activity opens a chain, closes one, both, or neither
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::constants::markers;

/// Emoji presentation selector; clients insert or drop it freely after `⛓`
const VARIATION_SELECTOR_16: char = '\u{fe0f}';

/// Glyphs recognized as chain boundaries and where to look for them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Glyph sequence marking the first activity of a chain
    pub start_marker: String,
    /// Glyph sequence marking the last activity of a chain
    pub end_marker: String,
    /// Also scan the description, not just the title
    pub search_description: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            start_marker: markers::CHAIN_START.to_owned(),
            end_marker: markers::CHAIN_END.to_owned(),
            search_description: true,
        }
    }
}

impl MarkerConfig {
    /// Custom start/end glyphs, scanning descriptions as well as titles
    #[must_use]
    pub fn new(start_marker: impl Into<String>, end_marker: impl Into<String>) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
            search_description: true,
        }
    }

    /// Enable or disable description scanning
    #[must_use]
    pub const fn with_search_description(mut self, search_description: bool) -> Self {
        self.search_description = search_description;
        self
    }

    /// Whether both markers read as the same glyph once variation selectors
    /// are ignored
    #[must_use]
    pub fn markers_coincide(&self) -> bool {
        normalize(&self.start_marker) == normalize(&self.end_marker)
    }
}

/// Marker content of a single activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// No marker
    None,
    /// Start marker only
    ChainStart,
    /// End marker only
    ChainEnd,
    /// Both markers: a complete single-activity chain
    Both,
}

impl MarkerKind {
    /// Combine independent start/end flags
    #[must_use]
    pub const fn from_flags(start: bool, end: bool) -> Self {
        match (start, end) {
            (false, false) => Self::None,
            (true, false) => Self::ChainStart,
            (false, true) => Self::ChainEnd,
            (true, true) => Self::Both,
        }
    }

    /// Whether the activity carries the start marker
    #[must_use]
    pub const fn has_start(self) -> bool {
        matches!(self, Self::ChainStart | Self::Both)
    }

    /// Whether the activity carries the end marker
    #[must_use]
    pub const fn has_end(self) -> bool {
        matches!(self, Self::ChainEnd | Self::Both)
    }

    /// Union of the markers found in two texts
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self::from_flags(
            self.has_start() || other.has_start(),
            self.has_end() || other.has_end(),
        )
    }
}

fn normalize(text: &str) -> Cow<'_, str> {
    if text.contains(VARIATION_SELECTOR_16) {
        Cow::Owned(text.replace(VARIATION_SELECTOR_16, ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Scan one text with already-normalized markers
fn scan(text: &str, start: &str, end: &str) -> MarkerKind {
    let text = normalize(text);
    let has_end = !end.is_empty() && text.contains(end);

    // The default end glyph is the start glyph plus a ZWJ suffix, so end
    // occurrences are blanked out before looking for a start.
    let has_start = !start.is_empty()
        && if has_end && end.contains(start) {
            text.replace(end, " ").contains(start)
        } else {
            text.contains(start)
        };

    MarkerKind::from_flags(has_start, has_end)
}

/// Classify an activity from its title and optional description
///
/// Matching is a plain substring search. U+FE0F variation selectors are
/// ignored on both sides, so `⛓` and `⛓️` are the same marker. Empty markers
/// never match.
///
/// # Examples
///
/// ```rust
/// use chain_tracker::segmentation::{classify, MarkerConfig, MarkerKind};
///
/// let config = MarkerConfig::default();
/// assert_eq!(classify("Day 1 ⛓️", None, &config), MarkerKind::ChainStart);
/// assert_eq!(classify("Done ⛓️‍💥", None, &config), MarkerKind::ChainEnd);
/// assert_eq!(classify("Commute", Some("⛓️ ⛓️‍💥"), &config), MarkerKind::Both);
/// ```
#[must_use]
pub fn classify(name: &str, description: Option<&str>, config: &MarkerConfig) -> MarkerKind {
    let start = normalize(&config.start_marker);
    let end = normalize(&config.end_marker);

    let from_title = scan(name, &start, &end);
    match description {
        Some(text) if config.search_description => from_title.merge(scan(text, &start, &end)),
        _ => from_title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_coincide_ignores_variation_selector() {
        assert!(MarkerConfig::new("\u{26d3}", "\u{26d3}\u{fe0f}").markers_coincide());
        assert!(!MarkerConfig::default().markers_coincide());
    }

    #[test]
    fn test_plain_title_has_no_marker() {
        let config = MarkerConfig::default();
        assert_eq!(classify("Morning ride", None, &config), MarkerKind::None);
    }

    #[test]
    fn test_end_glyph_is_not_a_start() {
        let config = MarkerConfig::default();
        assert_eq!(classify("⛓️‍💥 home", None, &config), MarkerKind::ChainEnd);
    }

    #[test]
    fn test_both_glyphs_in_title() {
        let config = MarkerConfig::default();
        assert_eq!(classify("⛓️ out and back ⛓️‍💥", None, &config), MarkerKind::Both);
    }

    #[test]
    fn test_missing_variation_selector_still_matches() {
        let config = MarkerConfig::default();
        assert_eq!(classify("\u{26d3} start", None, &config), MarkerKind::ChainStart);
        assert_eq!(
            classify("\u{26d3}\u{200d}\u{1f4a5} end", None, &config),
            MarkerKind::ChainEnd
        );
    }

    #[test]
    fn test_description_scanned_only_when_enabled() {
        let config = MarkerConfig::default();
        assert_eq!(
            classify("Ride", Some("starting a chain ⛓️"), &config),
            MarkerKind::ChainStart
        );

        let title_only = MarkerConfig::default().with_search_description(false);
        assert_eq!(
            classify("Ride", Some("starting a chain ⛓️"), &title_only),
            MarkerKind::None
        );
    }

    #[test]
    fn test_title_and_description_flags_are_merged() {
        let config = MarkerConfig::default();
        assert_eq!(classify("⛓️", Some("⛓️‍💥"), &config), MarkerKind::Both);
    }

    #[test]
    fn test_empty_markers_never_match() {
        let config = MarkerConfig::new("", "");
        assert_eq!(classify("anything", Some("at all"), &config), MarkerKind::None);
    }

    #[test]
    fn test_custom_ascii_markers() {
        let config = MarkerConfig::new("[chain]", "[/chain]");
        assert_eq!(classify("[chain] go", None, &config), MarkerKind::ChainStart);
        assert_eq!(classify("[/chain] stop", None, &config), MarkerKind::ChainEnd);
    }
}
