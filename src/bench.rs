use std::collections::HashMap;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{MomoError, Result};
use crate::models::TransactionRecord;

const MIN_RECORDS: usize = 20;

pub fn linear_search(records: &[TransactionRecord], id: u64) -> Option<&TransactionRecord> {
    records.iter().find(|r| r.id == id)
}

pub fn map_lookup<'a>(
    index: &HashMap<u64, &'a TransactionRecord>,
    id: u64,
) -> Option<&'a TransactionRecord> {
    index.get(&id).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub records_tested: usize,
    pub trials: usize,
    pub linear_total_s: f64,
    pub map_total_s: f64,
    pub linear_avg_ms: f64,
    pub map_avg_ms: f64,
}

fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

/// Time id lookups by linear scan against a hash index over the same
/// random targets. Small collections are padded to 20 by cycling copies.
pub fn compare<R: Rng>(records: &[TransactionRecord], trials: usize, rng: &mut R) -> Result<BenchReport> {
    if records.is_empty() {
        return Err(MomoError::EmptyDataset);
    }
    let mut data = records.to_vec();
    while data.len() < MIN_RECORDS {
        data.push(records[data.len() % records.len()].clone());
    }

    let ids: Vec<u64> = data.iter().map(|r| r.id).collect();
    let index: HashMap<u64, &TransactionRecord> = data.iter().map(|r| (r.id, r)).collect();
    let targets: Vec<u64> = (0..trials)
        .filter_map(|_| ids.choose(rng).copied())
        .collect();

    let t0 = Instant::now();
    for &id in &targets {
        std::hint::black_box(linear_search(&data, id));
    }
    let linear = t0.elapsed().as_secs_f64();

    let t0 = Instant::now();
    for &id in &targets {
        std::hint::black_box(map_lookup(&index, id));
    }
    let map = t0.elapsed().as_secs_f64();

    let per_trial_ms = |total: f64| {
        if trials == 0 {
            0.0
        } else {
            round6(total / trials as f64 * 1000.0)
        }
    };

    Ok(BenchReport {
        records_tested: data.len(),
        trials,
        linear_total_s: round6(linear),
        map_total_s: round6(map),
        linear_avg_ms: per_trial_ms(linear),
        map_avg_ms: per_trial_ms(map),
    })
}
