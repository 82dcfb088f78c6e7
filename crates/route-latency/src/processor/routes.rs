use crate::{
    error::AnalysisError,
    processor::stats::{Histogram, mean, percentile, sorted},
    record::AnalyzedRecords,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tabled::Tabled;
use tracing::debug;

/// Record ids grouped by endpoint path, paths in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGroups(IndexMap<String, Vec<String>>);

impl RouteGroups {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(path, ids)| (path.as_str(), ids.as_slice()))
    }
}

/// Partition record ids by their `path` field.
///
/// Fails on the first record without a path.
pub fn group_by_path(records: &AnalyzedRecords) -> Result<RouteGroups, AnalysisError> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for (id, record) in records {
        groups
            .entry(record.path()?.to_string())
            .or_default()
            .push(id.clone());
    }
    debug!("Grouped {} records into {} routes", records.len(), groups.len());
    Ok(RouteGroups(groups))
}

pub fn display_ms(ms: &f64) -> String {
    format!("{ms:.2}")
}

/// Latency summary of one endpoint
#[derive(Debug, Clone, PartialEq, Tabled, Serialize, Deserialize)]
pub struct RouteStats {
    #[tabled(rename = "endpoint")]
    pub name: String,
    #[tabled(display = "display_ms", rename = "avg(ms)")]
    pub avg_ms: f64,
    #[tabled(display = "display_ms", rename = "p99(ms)")]
    pub p99_ms: f64,
    #[tabled(display = "display_ms", rename = "p90(ms)")]
    pub p90_ms: f64,
    #[tabled(rename = "hits")]
    pub total: usize,
    #[tabled(rename = "histogram")]
    pub histogram: Histogram,
}

impl RouteStats {
    pub fn from_durations(name: impl Into<String>, durations: &[f64], edges: &[f64]) -> Self {
        let sorted_durations = sorted(durations);
        Self {
            name: name.into(),
            avg_ms: mean(durations),
            p99_ms: percentile(&sorted_durations, 99.0),
            p90_ms: percentile(&sorted_durations, 90.0),
            total: durations.len(),
            histogram: Histogram::from_values(durations, edges),
        }
    }
}

/// Stats for every group, in group order.
///
/// Fails on the first record whose duration is missing or not a number.
pub fn compute_route_stats(
    records: &AnalyzedRecords,
    groups: &RouteGroups,
    edges: &[f64],
) -> Result<Vec<RouteStats>, AnalysisError> {
    groups
        .iter()
        .map(|(path, ids)| -> Result<RouteStats, AnalysisError> {
            let durations = ids
                .iter()
                // ids come from `records`
                .filter_map(|id| records.get(id))
                .map(|record| record.duration_ms())
                .collect::<Result<Vec<f64>, _>>()?;
            Ok(RouteStats::from_durations(path, &durations, edges))
        })
        .collect()
}

/// Slowest average first. Equal averages keep their relative order.
pub fn sort_by_average(stats: &mut [RouteStats]) {
    stats.sort_by(|a, b| b.avg_ms.partial_cmp(&a.avg_ms).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AnalyzedRecord;
    use std::collections::HashSet;

    const EDGES: [f64; 3] = [0.0, 150.0, 1000.0];

    fn records(entries: &[(&str, &str, &str)]) -> AnalyzedRecords {
        entries
            .iter()
            .map(|(id, path, duration)| {
                let record = AnalyzedRecord {
                    id: id.to_string(),
                    message: [("path", *path), ("duration", *duration)]
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    timestamp: "2016-10-19T10:00:00.000Z".to_string(),
                    host: "ci-1".to_string(),
                };
                (id.to_string(), record)
            })
            .collect()
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let recs = records(&[
            ("1", "/a", "100"),
            ("2", "/b", "10"),
            ("3", "/a", "200"),
            ("4", "/c", "1"),
            ("5", "/b", "20"),
            ("6", "/a", "300"),
        ]);
        let groups = group_by_path(&recs).unwrap();

        assert_eq!(groups.len(), 3);
        let mut seen = HashSet::new();
        for (path, ids) in groups.iter() {
            for id in ids {
                assert_eq!(recs[id.as_str()].path().unwrap(), path);
                assert!(seen.insert(id.clone()), "{id} in two groups");
            }
        }
        let all: HashSet<String> = recs.keys().cloned().collect();
        assert_eq!(seen, all);

        // First appearance order
        let paths: Vec<&str> = groups.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
        assert_eq!(groups.get("/a").unwrap(), ["1", "3", "6"]);
    }

    #[test]
    fn test_missing_path_aborts_grouping() {
        let mut recs = records(&[("1", "/a", "100")]);
        recs.get_mut("1").unwrap().message.shift_remove("path");

        assert_eq!(
            group_by_path(&recs),
            Err(AnalysisError::MissingField {
                id: "1".to_string(),
                field: "path"
            })
        );
    }

    #[test]
    fn test_route_stats() {
        let recs = records(&[
            ("1", "/a", "100"),
            ("2", "/a", "200"),
            ("3", "/a", "300"),
            ("4", "/b", "10"),
            ("5", "/b", "20"),
        ]);
        let groups = group_by_path(&recs).unwrap();
        let mut stats = compute_route_stats(&recs, &groups, &EDGES).unwrap();
        sort_by_average(&mut stats);

        assert_eq!(stats[0].name, "/a");
        assert_eq!(stats[0].avg_ms, 200.0);
        assert_eq!(stats[0].total, 3);
        assert_eq!(stats[0].histogram.counts, vec![1, 2]);
        assert!((stats[0].p90_ms - 280.0).abs() < 1e-9);
        assert!((stats[0].p99_ms - 298.0).abs() < 1e-9);

        assert_eq!(stats[1].name, "/b");
        assert_eq!(stats[1].avg_ms, 15.0);
        assert_eq!(stats[1].total, 2);
    }

    #[test]
    fn test_bad_duration_aborts_stats() {
        let recs = records(&[("1", "/a", "100"), ("2", "/b", "slow"), ("3", "/a", "5")]);
        let groups = group_by_path(&recs).unwrap();

        assert_eq!(
            compute_route_stats(&recs, &groups, &EDGES),
            Err(AnalysisError::InvalidDuration {
                id: "2".to_string(),
                value: "slow".to_string()
            })
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_averages() {
        let mut stats = vec![
            RouteStats::from_durations("/first", &[10.0], &EDGES),
            RouteStats::from_durations("/slow", &[500.0], &EDGES),
            RouteStats::from_durations("/second", &[10.0], &EDGES),
        ];
        sort_by_average(&mut stats);

        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["/slow", "/first", "/second"]);
    }
}
