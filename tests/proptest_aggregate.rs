//! Property-based tests for the record aggregations
//!
//! Verifies:
//! 1. Tallies never count more records than they were given
//! 2. Tallies account for every record when all values are recognized
//! 3. Projections keep input order under any permutation
//! 4. Validation keeps the order of accepted rows

use proptest::prelude::*;
use serde_json::{json, Value};

use fleetdash::aggregate::{AlertTally, Metric, Projection, StatusTally, Summary};
use fleetdash::model::{validate_rows, ServerRecord};

// ── Strategies ──────────────────────────────────────────────────────────

fn status_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("online".to_string())),
        Just(Some("offline".to_string())),
        "[a-zA-Z]{0,8}".prop_map(Some),
    ]
}

fn alert_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("low".to_string())),
        Just(Some("medium".to_string())),
        Just(Some("critical".to_string())),
        "[a-zA-Z]{0,8}".prop_map(Some),
    ]
}

fn usage_strategy() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(0.0f64..=100.0)
}

fn record_strategy() -> impl Strategy<Value = ServerRecord> {
    (
        "[a-z0-9-]{1,12}",
        status_strategy(),
        alert_strategy(),
        usage_strategy(),
        usage_strategy(),
        usage_strategy(),
        prop::option::of(0.0f64..10_000.0),
    )
        .prop_map(|(name, status, alert, cpu, ram, disk, net)| {
            let mut record = ServerRecord::new(name.clone(), name);
            if let Some(status) = status {
                record = record.with_status(&status);
            }
            if let Some(alert) = alert {
                record = record.with_alert_level(&alert);
            }
            record.cpu_usage = cpu;
            record.ram_usage = ram;
            record.disk_usage = disk;
            record.network_traffic = net;
            record
        })
}

fn recognized_record_strategy() -> impl Strategy<Value = ServerRecord> {
    (
        "[a-z0-9-]{1,12}",
        prop::sample::select(vec!["online", "offline"]),
        prop::sample::select(vec!["low", "medium", "critical"]),
    )
        .prop_map(|(name, status, alert)| {
            ServerRecord::new(name.clone(), name)
                .with_status(status)
                .with_alert_level(alert)
        })
}

// ── Tally Properties ────────────────────────────────────────────────────

proptest! {
    /// online + offline never exceeds the number of records
    #[test]
    fn prop_status_tally_bounded(records in prop::collection::vec(record_strategy(), 0..50)) {
        let tally = StatusTally::from_records(&records);
        prop_assert!(tally.online + tally.offline <= records.len());
    }

    /// low + medium + critical never exceeds the number of records
    #[test]
    fn prop_alert_tally_bounded(records in prop::collection::vec(record_strategy(), 0..50)) {
        let tally = AlertTally::from_records(&records);
        prop_assert!(tally.low + tally.medium + tally.critical <= records.len());
    }

    /// With only recognized values every record is counted exactly once
    #[test]
    fn prop_tallies_exact_when_recognized(
        records in prop::collection::vec(recognized_record_strategy(), 0..50),
    ) {
        prop_assert_eq!(StatusTally::from_records(&records).total(), records.len());
        prop_assert_eq!(AlertTally::from_records(&records).total(), records.len());
    }

    /// Tallies do not depend on record order
    #[test]
    fn prop_tallies_order_independent(
        (records, shuffled) in prop::collection::vec(record_strategy(), 0..30)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
    ) {
        prop_assert_eq!(
            StatusTally::from_records(&records),
            StatusTally::from_records(&shuffled)
        );
        prop_assert_eq!(
            AlertTally::from_records(&records),
            AlertTally::from_records(&shuffled)
        );
    }
}

// ── Projection Properties ───────────────────────────────────────────────

proptest! {
    /// Position i of every projection describes record i, for any permutation
    #[test]
    fn prop_projection_preserves_order(
        shuffled in prop::collection::vec(record_strategy(), 0..30).prop_shuffle(),
    ) {
        for metric in Metric::all() {
            let projection = Projection::of(&shuffled, *metric);
            prop_assert_eq!(projection.len(), shuffled.len());
            for (i, record) in shuffled.iter().enumerate() {
                prop_assert_eq!(&projection.labels[i], &record.name);
                prop_assert_eq!(projection.values[i], metric.value(record));
            }
        }
    }

    /// The summary projections are all as long as the input
    #[test]
    fn prop_summary_projection_lengths(records in prop::collection::vec(record_strategy(), 0..30)) {
        let summary = Summary::from_records(&records);
        prop_assert_eq!(summary.records, records.len());
        for metric in Metric::all() {
            prop_assert_eq!(summary.projection(*metric).len(), records.len());
        }
    }
}

// ── Validation Properties ───────────────────────────────────────────────

fn row_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => (1u32..10_000, "[a-z]{1,8}").prop_map(|(id, name)| json!({"id": id, "name": name})),
        1 => "[a-z]{1,8}".prop_map(|name| json!({"name": name})),
        1 => Just(json!(42)),
    ]
}

proptest! {
    /// Every row is either accepted or rejected, and accepted rows keep input order
    #[test]
    fn prop_validation_partitions_rows(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let expected: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get("id").map(|id| id.to_string()))
            .collect();

        let total = rows.len();
        let (records, rejected) = validate_rows(rows);
        prop_assert_eq!(records.len() + rejected.len(), total);

        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        prop_assert_eq!(ids, expected);
    }
}

#[test]
fn test_empty_input() {
    let summary = Summary::from_records(&[]);
    assert_eq!(summary.status, StatusTally::default());
    assert_eq!(summary.alerts, AlertTally::default());
    for metric in Metric::all() {
        assert!(summary.projection(*metric).is_empty());
    }
}
