use crate::{
    error::AnalysisError,
    processor::{
        Report,
        ranking::RankedRecord,
        routes::{RouteStats, sort_by_average},
    },
    record::{AnalyzedRecord, RequestTiming},
};
use indexmap::IndexMap;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Entry {
    seq: usize,
    duration_ms: f64,
    record: AnalyzedRecord,
}

impl From<Entry> for RankedRecord {
    fn from(entry: Entry) -> Self {
        Self {
            duration_ms: entry.duration_ms,
            record: entry.record,
        }
    }
}

/// Single-pass fold of analyzed records into a [`Report`].
///
/// Keeps the durations of every path, the `top_n` longest records and the slowest
/// record per path, never the full record set. Produces the same report as the
/// materialized pipeline over the same records, provided record ids are unique.
#[derive(Debug)]
pub struct RouteAccumulator {
    edges: Vec<f64>,
    top_n: usize,
    seen: usize,
    durations: IndexMap<String, Vec<f64>>,
    longest: Vec<Entry>,
    worst: IndexMap<String, Entry>,
}

impl RouteAccumulator {
    pub fn new(edges: &[f64], top_n: usize) -> Self {
        Self {
            edges: edges.to_vec(),
            top_n,
            seen: 0,
            durations: IndexMap::new(),
            longest: Vec::with_capacity(top_n + 1),
            worst: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.seen
    }

    pub fn is_empty(&self) -> bool {
        self.seen == 0
    }

    pub fn push(&mut self, record: AnalyzedRecord) -> Result<(), AnalysisError> {
        let timing = RequestTiming::try_from(&record)?;
        let path = timing.path.to_string();
        let duration_ms = timing.duration_ms;
        let seq = self.seen;
        self.seen += 1;

        self.durations
            .entry(path.clone())
            .or_default()
            .push(duration_ms);

        // Ties stay behind earlier records
        let pos = self
            .longest
            .partition_point(|e| e.duration_ms >= duration_ms);
        let keep_longest = pos < self.top_n;

        let replaces_worst = self
            .worst
            .get(&path)
            .is_none_or(|e| duration_ms > e.duration_ms);

        match (keep_longest, replaces_worst) {
            (false, false) => {}
            (true, false) => self.insert_longest(pos, seq, duration_ms, record),
            (false, true) => {
                self.worst.insert(
                    path,
                    Entry {
                        seq,
                        duration_ms,
                        record,
                    },
                );
            }
            (true, true) => {
                self.worst.insert(
                    path,
                    Entry {
                        seq,
                        duration_ms,
                        record: record.clone(),
                    },
                );
                self.insert_longest(pos, seq, duration_ms, record);
            }
        }

        Ok(())
    }

    fn insert_longest(&mut self, pos: usize, seq: usize, duration_ms: f64, record: AnalyzedRecord) {
        self.longest.insert(
            pos,
            Entry {
                seq,
                duration_ms,
                record,
            },
        );
        self.longest.truncate(self.top_n);
    }

    pub fn finish(self) -> Report {
        let mut slowest_endpoints: Vec<RouteStats> = self
            .durations
            .iter()
            .map(|(path, durations)| RouteStats::from_durations(path, durations, &self.edges))
            .collect();
        sort_by_average(&mut slowest_endpoints);
        slowest_endpoints.truncate(self.top_n);

        let mut worst: Vec<Entry> = self.worst.into_values().collect();
        worst.sort_by(|a, b| {
            b.duration_ms
                .partial_cmp(&a.duration_ms)
                .unwrap_or(Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        worst.truncate(self.top_n);

        Report {
            total_records: self.seen,
            slowest_endpoints,
            longest_responses: self.longest.into_iter().map(RankedRecord::from).collect(),
            worst_per_endpoint: worst.into_iter().map(RankedRecord::from).collect(),
        }
    }
}
