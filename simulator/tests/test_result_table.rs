//! Result table: per-bucket cap, bookkeeping totals, and running
//! statistics across merges.

use callcenter_simulator_core::harness::{BucketKey, ResultTable};

#[test]
fn test_bucket_cap_is_enforced() {
    let mut table = ResultTable::new(3);
    let key = BucketKey::patience(5);

    table.merge((0..10).map(|i| (key, i as f64)));

    assert_eq!(table.count(&key), 3);

    // Further matching samples must not be appended.
    table.merge(vec![(key, 99.0)]);
    assert_eq!(table.count(&key), 3);

    let totals = table.totals();
    assert_eq!(totals.observed, 11);
    assert_eq!(totals.stored, 3);
}

#[test]
fn test_cap_applies_per_bucket() {
    let mut table = ResultTable::new(2);

    table.merge(vec![
        (BucketKey::patience(0), 1.0),
        (BucketKey::patience(0), 2.0),
        (BucketKey::patience(0), 3.0),
        (BucketKey::patience(1), 1.0),
    ]);

    assert_eq!(table.count(&BucketKey::patience(0)), 2);
    assert_eq!(table.count(&BucketKey::patience(1)), 1);

    let totals = table.totals();
    assert_eq!(totals.min_bucket, 1);
    assert_eq!(totals.max_bucket, 2);
    assert_eq!(totals.observed, 4);
    assert_eq!(totals.stored, 3);
}

#[test]
fn test_running_statistics_update_across_merges() {
    let mut table = ResultTable::new(1000);
    let key = BucketKey::callback(10, 60);

    table.merge(vec![(key, 2.0), (key, 4.0)]);
    let rows = table.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].average, 3.0);
    assert_eq!(rows[0].count, 2);

    table.merge(vec![(key, 9.0)]);
    let rows = table.rows();
    assert_eq!(rows[0].average, 5.0);
    assert_eq!(rows[0].median, 4.0);
    assert_eq!(rows[0].count, 3);
}

#[test]
fn test_rows_come_out_in_key_order() {
    let mut table = ResultTable::new(100);

    table.merge(vec![
        (BucketKey::callback(3, 10), 1.0),
        (BucketKey::callback(1, 20), 1.0),
        (BucketKey::callback(1, 5), 1.0),
        (BucketKey::callback(2, 0), 1.0),
    ]);

    let keys: Vec<BucketKey> = table.rows().iter().map(|r| r.key).collect();
    assert_eq!(
        keys,
        vec![
            BucketKey::callback(1, 5),
            BucketKey::callback(1, 20),
            BucketKey::callback(2, 0),
            BucketKey::callback(3, 10),
        ]
    );
}

#[test]
fn test_empty_table_totals() {
    let table = ResultTable::new(10);

    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
    let totals = table.totals();
    assert_eq!(totals.observed, 0);
    assert_eq!(totals.stored, 0);
    assert_eq!(totals.min_bucket, 0);
    assert_eq!(totals.max_bucket, 0);
}

#[test]
#[should_panic(expected = "bucket cap must be at least 1")]
fn test_zero_cap_panics() {
    ResultTable::new(0);
}

#[test]
fn test_negative_outcomes_are_valid_samples() {
    // Callback mode records wait differences, which go negative whenever
    // calling back beats staying on hold.
    let mut table = ResultTable::new(10);
    let key = BucketKey::callback(30, 120);

    table.merge(vec![(key, -12.5), (key, 3.0)]);

    let rows = table.rows();
    assert_eq!(rows[0].count, 2);
    assert!(rows[0].average < 0.0);
}
