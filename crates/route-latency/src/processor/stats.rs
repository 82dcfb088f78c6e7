use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::{cmp::Ordering, fmt};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Sort ascending, NaN-tolerant
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted_values = values.to_vec();
    sorted_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted_values
}

/// Percentile of already sorted values, `pct` in 0..=100.
///
/// Linearly interpolates between the two closest order statistics (rank
/// `pct / 100 * (n - 1)`), which is the default definition in numpy and R (type 7).
/// statrs' `OrderStatistics::percentile` uses R type 8 and gives different values on
/// small samples, so it is not used here.
pub fn percentile(sorted_values: &[f64], pct: f64) -> f64 {
    let len = sorted_values.len();
    if len == 0 {
        return 0.0;
    }

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (len - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;

    sorted_values[lo] + (sorted_values[hi] - sorted_values[lo]) * weight
}

/// Counts of values per bucket.
///
/// `counts[i]` covers `[edges[i], edges[i + 1])`, except the last bucket which also
/// includes its right edge. Values outside `[edges[0], edges[last]]` are not counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn from_values(values: &[f64], edges: &[f64]) -> Self {
        let buckets = edges.len().saturating_sub(1);
        let mut counts = vec![0u64; buckets];

        if let (Some(&first), Some(&last)) = (edges.first(), edges.last()) {
            for &value in values {
                if buckets == 0 || value < first || value > last {
                    continue;
                }
                let bucket = if value == last {
                    buckets - 1
                } else {
                    edges.partition_point(|&edge| edge <= value) - 1
                };
                counts[bucket] += 1;
            }
        }

        Self {
            edges: edges.to_vec(),
            counts,
        }
    }

    /// Number of values that landed in a bucket
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<String> = self.counts.iter().map(u64::to_string).collect();
        write!(f, "[{}]", counts.join(", "))
    }
}
