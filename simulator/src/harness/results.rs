//! Shared result table
//!
//! Maps patience (and, in callback mode, callback delay) to the outcome
//! samples observed for that combination. The table is explicit
//! process-scoped state with a documented lifecycle: created once, grows
//! monotonically through `merge`, never reset, never persisted. Each
//! bucket stops accepting samples at a fixed cap to bound memory;
//! offered-but-capped samples still count toward the observed total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::stats;

/// Key of one statistics bucket.
///
/// Remaining-wait mode uses `callback_delay: None`; callback mode uses
/// `Some(delay)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BucketKey {
    /// Minutes the caller was willing to wait before hanging up
    pub patience: u32,

    /// Minutes between hang-up and the hypothetical re-attempt, if any
    pub callback_delay: Option<u32>,
}

impl BucketKey {
    /// Remaining-wait bucket for a patience value
    pub fn patience(patience: u32) -> Self {
        Self {
            patience,
            callback_delay: None,
        }
    }

    /// Callback bucket for a (patience, delay) pair
    pub fn callback(patience: u32, delay: u32) -> Self {
        Self {
            patience,
            callback_delay: Some(delay),
        }
    }
}

/// Running statistics of one bucket, as handed to the reporting sink.
#[derive(Debug, Clone, Serialize)]
pub struct BucketRow {
    /// Bucket identity
    pub key: BucketKey,

    /// Running average outcome (minutes)
    pub average: f64,

    /// Running median outcome (minutes)
    pub median: f64,

    /// Samples currently stored in the bucket
    pub count: usize,
}

/// Whole-table bookkeeping for the reporting sink's summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TableTotals {
    /// Samples offered to the table, including ones rejected by the cap
    pub observed: u64,

    /// Samples actually stored
    pub stored: u64,

    /// Smallest bucket size
    pub min_bucket: usize,

    /// Largest bucket size
    pub max_bucket: usize,
}

/// Capped, append-only accumulation of outcome samples per bucket.
#[derive(Debug, Clone)]
pub struct ResultTable {
    buckets: BTreeMap<BucketKey, Vec<f64>>,
    cap: usize,
    observed: u64,
    stored: u64,
}

impl ResultTable {
    /// Create an empty table with the given per-bucket sample cap.
    ///
    /// # Panics
    /// Panics if the cap is zero
    pub fn new(cap: usize) -> Self {
        assert!(cap >= 1, "bucket cap must be at least 1");
        Self {
            buckets: BTreeMap::new(),
            cap,
            observed: 0,
            stored: 0,
        }
    }

    /// Per-bucket sample cap
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Number of buckets that have received at least one sample
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether any sample has been stored
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Samples currently stored for a bucket
    pub fn count(&self, key: &BucketKey) -> usize {
        self.buckets.get(key).map_or(0, Vec::len)
    }

    /// Append samples, dropping any for buckets already at the cap.
    ///
    /// Single-threaded by design: the parallel phase produces private
    /// sample lists and merging happens after the batch join.
    pub fn merge(&mut self, samples: impl IntoIterator<Item = (BucketKey, f64)>) {
        for (key, value) in samples {
            self.observed += 1;
            let bucket = self.buckets.entry(key).or_default();
            if bucket.len() < self.cap {
                bucket.push(value);
                self.stored += 1;
            }
        }
    }

    /// Running per-bucket statistics, in bucket-key order.
    ///
    /// Sorts each bucket in place (sample order carries no meaning) to
    /// compute the running median.
    pub fn rows(&mut self) -> Vec<BucketRow> {
        self.buckets
            .iter_mut()
            .map(|(key, samples)| {
                samples.sort_unstable_by(f64::total_cmp);
                BucketRow {
                    key: *key,
                    average: stats::mean(samples).expect("buckets are never empty"),
                    median: stats::median_sorted(samples).expect("buckets are never empty"),
                    count: samples.len(),
                }
            })
            .collect()
    }

    /// Whole-table bookkeeping for the summary line.
    pub fn totals(&self) -> TableTotals {
        let min_bucket = self.buckets.values().map(Vec::len).min().unwrap_or(0);
        let max_bucket = self.buckets.values().map(Vec::len).max().unwrap_or(0);
        TableTotals {
            observed: self.observed,
            stored: self.stored,
            min_bucket,
            max_bucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_keys_order_by_patience_then_delay() {
        let mut keys = vec![
            BucketKey::callback(2, 10),
            BucketKey::patience(1),
            BucketKey::callback(1, 0),
            BucketKey::callback(2, 0),
        ];
        keys.sort();

        assert_eq!(
            keys,
            vec![
                BucketKey::patience(1),
                BucketKey::callback(1, 0),
                BucketKey::callback(2, 0),
                BucketKey::callback(2, 10),
            ]
        );
    }

    #[test]
    fn test_merge_and_rows() {
        let mut table = ResultTable::new(100);
        table.merge(vec![
            (BucketKey::patience(0), 4.0),
            (BucketKey::patience(0), 2.0),
            (BucketKey::patience(0), 6.0),
            (BucketKey::patience(3), 1.0),
        ]);

        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, BucketKey::patience(0));
        assert_eq!(rows[0].average, 4.0);
        assert_eq!(rows[0].median, 4.0);
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[1].count, 1);
    }
}
