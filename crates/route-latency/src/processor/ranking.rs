use crate::{
    error::AnalysisError,
    record::{AnalyzedRecord, AnalyzedRecords, DURATION_FIELD, PATH_FIELD},
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashSet};

/// A single request picked for a report, with its parsed duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub duration_ms: f64,
    pub record: AnalyzedRecord,
}

impl RankedRecord {
    /// Duration as it appeared in the log message
    pub fn raw_duration(&self) -> &str {
        self.record
            .message
            .get(DURATION_FIELD)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.record
            .message
            .get(PATH_FIELD)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// All records, longest duration first. Equal durations keep record order.
pub fn rank_by_duration(
    records: &AnalyzedRecords,
) -> Result<Vec<(f64, &AnalyzedRecord)>, AnalysisError> {
    let mut ranking = records
        .values()
        .map(|record| record.duration_ms().map(|duration_ms| (duration_ms, record)))
        .collect::<Result<Vec<_>, AnalysisError>>()?;
    ranking.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    Ok(ranking)
}

pub fn longest(ranking: &[(f64, &AnalyzedRecord)], top_n: usize) -> Vec<RankedRecord> {
    ranking
        .iter()
        .take(top_n)
        .map(|(duration_ms, record)| RankedRecord {
            duration_ms: *duration_ms,
            record: (*record).clone(),
        })
        .collect()
}

/// The first `top_n` distinct paths met while walking `ranking`, each with the
/// record that introduced it (its slowest request).
///
/// This is a cutoff on encounter order: a path that only shows up after `top_n`
/// others have been seen is left out.
pub fn worst_per_path(
    ranking: &[(f64, &AnalyzedRecord)],
    top_n: usize,
) -> Result<Vec<RankedRecord>, AnalysisError> {
    let mut seen = HashSet::new();
    let mut worst = Vec::new();
    for (duration_ms, record) in ranking {
        if worst.len() == top_n {
            break;
        }
        if !seen.insert(record.path()?) {
            continue;
        }
        worst.push(RankedRecord {
            duration_ms: *duration_ms,
            record: (*record).clone(),
        });
    }
    Ok(worst)
}
