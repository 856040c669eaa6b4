// ABOUTME: Integration tests for marker classification and chain segmentation
// ABOUTME: Covers the documented scenarios, ordering policies, rejections and streaming
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chain_tracker::errors::{AppError, ErrorCode};
use chain_tracker::models::{ActivityBuilder, SportType};
use chain_tracker::segmentation::{
    classify, segment, ChainStatus, MarkerConfig, MarkerKind, OrderingPolicy, RejectionReason,
    Segmentation, SegmentationError, Segmenter, SegmenterConfig,
};
use common::{approx_eq, day, ride, ride_with_description, END, START};

fn run(activities: Vec<chain_tracker::models::Activity>) -> Segmentation {
    segment(activities, &SegmenterConfig::default()).unwrap()
}

fn ids(segmentation: &Segmentation, chain: usize) -> Vec<String> {
    segmentation.chains[chain]
        .activity_ids()
        .map(str::to_owned)
        .collect()
}

// ============================================================================
// Documented scenarios
// ============================================================================

#[test]
fn test_scenario_plain_chain_excludes_leading_ride() {
    let result = run(vec![
        ride("A", "Morning spin", 12.0, 0),
        ride("B", &format!("Chain day {START}"), 20.0, 1),
        ride("C", "Commute", 8.0, 2),
        ride("D", &format!("Done {END}"), 15.0, 3),
    ]);

    assert_eq!(result.chains.len(), 1);
    assert_eq!(ids(&result, 0), ["B", "C", "D"]);
    assert!(result.chains[0].is_well_formed());
    assert_eq!(result.diagnostics.unchained, 1);
}

#[test]
fn test_scenario_missing_end_is_unterminated() {
    let result = run(vec![
        ride("B", &format!("{START} start"), 10.0, 0),
        ride("C", "Recovery", 5.0, 1),
    ]);

    assert_eq!(result.chains.len(), 1);
    assert_eq!(ids(&result, 0), ["B", "C"]);
    assert_eq!(result.chains[0].status(), ChainStatus::Unterminated);
    assert!(!result.chains[0].is_well_formed());
    assert_eq!(result.diagnostics.malformed_chains.len(), 1);
}

#[test]
fn test_scenario_start_and_end_on_one_ride() {
    let result = run(vec![ride("B", &format!("{START} one and done {END}"), 42.0, 0)]);

    assert_eq!(result.chains.len(), 1);
    assert_eq!(ids(&result, 0), ["B"]);
    assert!(result.chains[0].is_well_formed());
    assert!(approx_eq(result.chains[0].total_distance_km(), 42.0));
}

#[test]
fn test_scenario_second_start_interrupts_open_chain() {
    let result = run(vec![
        ride("B", &format!("{START} first"), 10.0, 0),
        ride("X", &format!("{START} second"), 7.0, 1),
    ]);

    assert_eq!(result.chains.len(), 2);
    assert_eq!(ids(&result, 0), ["B"]);
    assert_eq!(result.chains[0].status(), ChainStatus::Interrupted);
    assert_eq!(ids(&result, 1), ["X"]);
    assert_eq!(result.chains[1].status(), ChainStatus::Unterminated);
    assert_eq!(result.chains[1].sequence_number(), 2);
}

#[test]
fn test_scenario_running_totals() {
    let result = run(vec![
        ride("B", START, 10.0, 0),
        ride("C", "middle", 20.5, 1),
        ride("D", END, 5.25, 2),
    ]);

    let running: Vec<f64> = result.chains[0]
        .entries()
        .iter()
        .map(chain_tracker::segmentation::ChainEntry::running_total_km)
        .collect();
    assert!(approx_eq(running[0], 10.0));
    assert!(approx_eq(running[1], 30.5));
    assert!(approx_eq(running[2], 35.75));
    assert!(approx_eq(result.chains[0].total_distance_km(), 35.75));
}

#[test]
fn test_scenario_empty_input() {
    let result = run(Vec::new());
    assert!(result.chains.is_empty());
    assert_eq!(result.diagnostics.activities_seen, 0);
    assert!(result.diagnostics.is_clean());
}

// ============================================================================
// Properties
// ============================================================================

fn mixed_history() -> Vec<chain_tracker::models::Activity> {
    vec![
        ride("1", "warmup", 5.0, 0),
        ride("2", START, 10.0, 1),
        ride("3", "tempo", 30.0, 2),
        ride("4", END, 12.5, 3),
        ride("5", "solo", 9.0, 4),
        ride("6", &format!("{START}{END}"), 50.0, 5),
        ride("7", START, 11.0, 6),
        ride("8", START, 14.0, 7),
        ride("9", "long", 80.0, 8),
    ]
}

#[test]
fn test_each_activity_in_at_most_one_chain() {
    let result = run(mixed_history());
    let mut seen: Vec<String> = result
        .chains
        .iter()
        .flat_map(|c| c.activity_ids().map(str::to_owned).collect::<Vec<_>>())
        .collect();
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), total);
}

#[test]
fn test_well_formed_chains_start_and_end_with_markers() {
    let result = run(mixed_history());
    for chain in result.chains.iter().filter(|c| c.is_well_formed()) {
        let entries = chain.entries();
        assert!(entries.first().unwrap().marker().has_start());
        assert!(entries.last().unwrap().marker().has_end());
    }
}

#[test]
fn test_totals_equal_sum_and_final_running_total() {
    let result = run(mixed_history());
    for chain in &result.chains {
        let sum: f64 = chain.entries().iter().map(|e| e.distance_km()).sum();
        assert!(approx_eq(chain.total_distance_km(), sum));
        assert!(approx_eq(
            chain.entries().last().unwrap().running_total_km(),
            chain.total_distance_km()
        ));
        let running: Vec<f64> = chain.entries().iter().map(|e| e.running_total_km()).collect();
        assert!(running.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_chain_dates_span_members() {
    let result = run(mixed_history());
    let first = &result.chains[0];
    assert_eq!(first.start_date(), day(1));
    assert_eq!(first.end_date(), day(3));
}

#[test]
fn test_segmentation_is_idempotent() {
    let first = run(mixed_history());
    let second = run(mixed_history());
    assert_eq!(first, second);
}

#[test]
fn test_mixed_history_statuses() {
    let result = run(mixed_history());
    let statuses: Vec<ChainStatus> = result.chains.iter().map(|c| c.status()).collect();
    assert_eq!(
        statuses,
        [
            ChainStatus::Complete,
            ChainStatus::Complete,
            ChainStatus::Interrupted,
            ChainStatus::Unterminated
        ]
    );
    assert_eq!(ids(&result, 3), ["8", "9"]);
}

// ============================================================================
// Ordering policies
// ============================================================================

#[test]
fn test_sort_policy_orders_by_start_time() {
    let result = run(vec![
        ride("D", END, 5.0, 3),
        ride("B", START, 10.0, 1),
        ride("C", "middle", 7.0, 2),
    ]);
    assert_eq!(ids(&result, 0), ["B", "C", "D"]);
    assert!(result.chains[0].is_well_formed());
}

#[test]
fn test_identical_timestamps_keep_input_order() {
    let result = run(vec![
        ride("A", START, 10.0, 0),
        ride("B", "middle", 7.0, 0),
        ride("C", END, 5.0, 0),
    ]);
    assert_eq!(result.chains.len(), 1);
    assert_eq!(ids(&result, 0), ["A", "B", "C"]);
    assert_eq!(result.chains[0].status(), ChainStatus::Complete);
}

#[test]
fn test_end_before_start_at_same_timestamp_stays_first() {
    let result = run(vec![
        ride("X", END, 5.0, 0),
        ride("Y", START, 10.0, 0),
        ride("Z", "later", 3.0, 1),
    ]);
    assert_eq!(result.chains.len(), 1);
    assert_eq!(ids(&result, 0), ["Y", "Z"]);
    assert_eq!(result.chains[0].status(), ChainStatus::Unterminated);
    assert_eq!(result.diagnostics.unchained, 1);
}

#[test]
fn test_validate_policy_rejects_unsorted_input() {
    let config = SegmenterConfig::with_ordering(OrderingPolicy::Validate);
    let error = segment(
        vec![ride("B", START, 10.0, 2), ride("C", "late", 7.0, 1)],
        &config,
    )
    .unwrap_err();

    assert_eq!(
        error,
        SegmentationError::UnsortedInput {
            index: 1,
            activity_id: "C".to_owned()
        }
    );

    let app: AppError = error.into();
    assert_eq!(app.code, ErrorCode::InvalidInput);
    assert_eq!(app.details["activity_id"], "C");
}

#[test]
fn test_trust_policy_keeps_given_order() {
    let config = SegmenterConfig::with_ordering(OrderingPolicy::Trust);
    let result = segment(
        vec![ride("D", END, 5.0, 3), ride("B", START, 10.0, 1)],
        &config,
    )
    .unwrap();
    assert_eq!(result.chains.len(), 1);
    assert_eq!(result.chains[0].status(), ChainStatus::Unterminated);
    assert_eq!(result.diagnostics.unchained, 1);
}

// ============================================================================
// Distance validation
// ============================================================================

#[test]
fn test_invalid_distances_are_rejected_individually() {
    let missing = ActivityBuilder::new("M", "no gps", SportType::Ride, day(1), "strava").build();
    let negative = ActivityBuilder::new("N", "glitch", SportType::Ride, day(2), "strava")
        .distance_meters(-100.0)
        .build();
    let nan = ActivityBuilder::new("F", "nan", SportType::Ride, day(3), "strava")
        .distance_meters(f64::NAN)
        .build();

    let result = run(vec![
        ride("B", START, 10.0, 0),
        missing,
        negative,
        nan,
        ride("D", END, 5.0, 4),
    ]);

    assert_eq!(ids(&result, 0), ["B", "D"]);
    assert!(approx_eq(result.chains[0].total_distance_km(), 15.0));

    let reasons: Vec<RejectionReason> = result
        .diagnostics
        .rejected
        .iter()
        .map(|r| r.reason)
        .collect();
    assert_eq!(reasons[0], RejectionReason::MissingDistance);
    assert_eq!(reasons[1], RejectionReason::NegativeDistance(-100.0));
    assert_eq!(reasons[2], RejectionReason::NonFiniteDistance);
    assert_eq!(result.diagnostics.activities_seen, 5);
}

#[test]
fn test_rejected_marker_ride_does_not_open_chain() {
    let missing = ActivityBuilder::new("M", START, SportType::Ride, day(0), "strava").build();
    let result = run(vec![missing, ride("C", "after", 5.0, 1)]);
    assert!(result.chains.is_empty());
    assert_eq!(result.diagnostics.rejected.len(), 1);
}

#[test]
fn test_zero_distance_is_accepted() {
    let result = run(vec![ride("B", &format!("{START}{END}"), 0.0, 0)]);
    assert_eq!(result.chains.len(), 1);
    assert!(approx_eq(result.chains[0].total_distance_km(), 0.0));
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_end_marker_alone_is_not_a_start() {
    let config = MarkerConfig::default();
    assert_eq!(classify(&format!("Wrap {END}"), None, &config), MarkerKind::ChainEnd);
    assert_eq!(classify(&format!("Go {START}"), None, &config), MarkerKind::ChainStart);
    assert_eq!(
        classify(&format!("{START} then {END}"), None, &config),
        MarkerKind::Both
    );
    assert_eq!(classify("plain", None, &config), MarkerKind::None);
}

#[test]
fn test_markers_match_without_variation_selector() {
    let config = MarkerConfig::default();
    assert_eq!(classify("Go \u{26d3}", None, &config), MarkerKind::ChainStart);
    assert_eq!(
        classify("Stop \u{26d3}\u{200d}\u{1f4a5}", None, &config),
        MarkerKind::ChainEnd
    );
}

#[test]
fn test_description_markers_count_unless_disabled() {
    let activities = vec![
        ride_with_description("B", "Saturday", &format!("starting {START}"), 10.0, 0),
        ride_with_description("C", "Sunday", &format!("finished {END}"), 10.0, 1),
    ];

    let with_description = segment(activities.clone(), &SegmenterConfig::default()).unwrap();
    assert_eq!(with_description.chains.len(), 1);
    assert!(with_description.chains[0].is_well_formed());

    let names_only = SegmenterConfig {
        markers: MarkerConfig::default().with_search_description(false),
        ordering: OrderingPolicy::Sort,
    };
    let without = segment(activities, &names_only).unwrap();
    assert!(without.chains.is_empty());
    assert_eq!(without.diagnostics.unchained, 2);
}

#[test]
fn test_custom_markers() {
    let config = SegmenterConfig {
        markers: MarkerConfig::new("[go]", "[stop]"),
        ordering: OrderingPolicy::Sort,
    };
    let result = segment(
        vec![
            ride("B", "[go] out", 10.0, 0),
            ride("C", START, 5.0, 1),
            ride("D", "[stop]", 3.0, 2),
        ],
        &config,
    )
    .unwrap();
    assert_eq!(ids(&result, 0), ["B", "C", "D"]);
    assert!(result.chains[0].is_well_formed());
}

// ============================================================================
// Incremental feeding
// ============================================================================

#[test]
fn test_incremental_segmenter_matches_batch() {
    let history = mixed_history();
    let batch = segment(
        history.clone(),
        &SegmenterConfig::with_ordering(OrderingPolicy::Trust),
    )
    .unwrap();

    let mut segmenter = Segmenter::new(SegmenterConfig::with_ordering(OrderingPolicy::Trust));
    let mut closed_while_streaming = 0;
    for page in history.chunks(2) {
        for activity in page {
            if segmenter.push(activity.clone()).unwrap().is_some() {
                closed_while_streaming += 1;
            }
        }
    }
    assert!(segmenter.in_chain());
    assert_eq!(segmenter.chains().len(), closed_while_streaming);

    let streamed = segmenter.finish();
    assert_eq!(streamed, batch);
    assert_eq!(closed_while_streaming, batch.chains.len() - 1);
}
