//! Per-question mean aggregation.
//!
//! This module reduces a collection of survey records into mean scores,
//! plus a small memoization layer so the means are recomputed only when
//! the record collection itself is replaced.

use crate::models::{AggregateMeans, SurveyRecord};
use tracing::debug;

/// Rounds to one fractional digit, half away from zero.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Reduces the records into per-question means.
///
/// Returns `None` for an empty collection — the explicit "no data"
/// sentinel. Callers must branch on it rather than rendering zeros.
///
/// For N records each field is `round1(sum / N)`. Coercion failures
/// were already defaulted to 0.0 upstream, and every record counts once
/// in every question's denominator, so a blank answer lowers the mean
/// instead of being excluded.
pub fn aggregate(records: &[SurveyRecord]) -> Option<AggregateMeans> {
    if records.is_empty() {
        return None;
    }

    let mut sums = [0.0f64; 10];
    for record in records {
        sums[0] += record.q3;
        sums[1] += record.q4;
        sums[2] += record.q5;
        sums[3] += record.q6;
        sums[4] += record.q7;
        sums[5] += record.q8_pre;
        sums[6] += record.q8_post;
        sums[7] += record.q10;
        sums[8] += record.q12;
        sums[9] += record.q13;
    }

    let count = records.len() as f64;
    Some(AggregateMeans {
        q3: round1(sums[0] / count),
        q4: round1(sums[1] / count),
        q5: round1(sums[2] / count),
        q6: round1(sums[3] / count),
        q7: round1(sums[4] / count),
        q8_pre: round1(sums[5] / count),
        q8_post: round1(sums[6] / count),
        q10: round1(sums[7] / count),
        q12: round1(sums[8] / count),
        q13: round1(sums[9] / count),
    })
}

/// A versioned record collection.
///
/// The collection is only ever replaced wholesale, never mutated in
/// place; each replacement bumps the version so memoized consumers can
/// tell the snapshots apart.
#[derive(Debug, Default)]
pub struct RecordSet {
    records: Vec<SurveyRecord>,
    version: u64,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection and bumps the version.
    pub fn replace(&mut self, records: Vec<SurveyRecord>) {
        self.records = records;
        self.version += 1;
        debug!(
            "record set replaced: {} records, version {}",
            self.records.len(),
            self.version
        );
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Memoized wrapper around [`aggregate`], keyed on the record-set version.
///
/// `aggregate` is pure and deterministic, so caching by version is safe:
/// the same version always yields the same means.
#[derive(Debug, Default)]
pub struct MemoizedAggregate {
    cached: Option<(u64, Option<AggregateMeans>)>,
}

impl MemoizedAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the means for the given record set, recomputing only
    /// when the version changed since the last call.
    pub fn get(&mut self, set: &RecordSet) -> Option<AggregateMeans> {
        if let Some((version, ref means)) = self.cached {
            if version == set.version() {
                return means.clone();
            }
        }

        let means = aggregate(set.records());
        self.cached = Some((set.version(), means.clone()));
        means
    }
}
