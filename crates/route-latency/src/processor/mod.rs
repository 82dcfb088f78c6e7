pub mod accumulator;
pub mod ranking;
pub mod routes;
pub mod stats;

use crate::{error::AnalysisError, record::AnalyzedRecords};
use ranking::{RankedRecord, longest, rank_by_duration, worst_per_path};
use routes::{RouteStats, compute_route_stats, group_by_path, sort_by_average};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use accumulator::RouteAccumulator;

/// The three ranked views printed at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_records: usize,
    /// Endpoints by average duration, slowest first
    pub slowest_endpoints: Vec<RouteStats>,
    /// Individual requests by duration, slowest first
    pub longest_responses: Vec<RankedRecord>,
    /// Slowest request of each endpoint, for the first endpoints met in duration order
    pub worst_per_endpoint: Vec<RankedRecord>,
}

impl Report {
    /// Build the report from the full record set.
    ///
    /// Nothing is returned if any record lacks a path or a numeric duration.
    pub fn from_records(
        records: &AnalyzedRecords,
        edges: &[f64],
        top_n: usize,
    ) -> Result<Self, AnalysisError> {
        let groups = group_by_path(records)?;
        let mut slowest_endpoints = compute_route_stats(records, &groups, edges)?;
        sort_by_average(&mut slowest_endpoints);
        slowest_endpoints.truncate(top_n);

        let ranking = rank_by_duration(records)?;
        let longest_responses = longest(&ranking, top_n);
        let worst_per_endpoint = worst_per_path(&ranking, top_n)?;

        info!(
            "Analyzed {} records across {} endpoints",
            records.len(),
            groups.len()
        );

        Ok(Self {
            total_records: records.len(),
            slowest_endpoints,
            longest_responses,
            worst_per_endpoint,
        })
    }
}
