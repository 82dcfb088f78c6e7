use crate::processor::{Report, ranking::RankedRecord};
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use tabled::{Table, builder::Builder as TableBuilder, settings::Style};

/// Output format for the final report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum ReportFormat {
    /// One line per entry
    #[default]
    #[value(name = "text")]
    Text,
    #[value(name = "table")]
    Table,
    #[value(name = "json")]
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

pub fn render(report: &Report, top_n: usize, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => render_text(report, top_n),
        ReportFormat::Table => render_table(report, top_n),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

pub fn render_text(report: &Report, top_n: usize) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{top_n} slowest endpoints:")?;
    for route in &report.slowest_endpoints {
        writeln!(
            out,
            "Endpoint {} - avg: {} ms - 99th percentile: {} - 90th percentile: {} - hits: {} - histo: {}",
            route.name, route.avg_ms, route.p99_ms, route.p90_ms, route.total, route.histogram
        )?;
    }

    writeln!(out, "\n\n{top_n} longest responses:")?;
    for ranked in &report.longest_responses {
        writeln!(
            out,
            "duration: {} - doc: {}",
            ranked.raw_duration(),
            serde_json::to_string(&ranked.record)?
        )?;
    }

    writeln!(out, "\n\n{top_n} endpoints which had the longest responses:")?;
    for ranked in &report.worst_per_endpoint {
        writeln!(
            out,
            "path: {} - duration: {} - doc: {}",
            ranked.path(),
            ranked.raw_duration(),
            serde_json::to_string(&ranked.record)?
        )?;
    }

    Ok(out)
}

fn records_table(records: &[RankedRecord]) -> String {
    let mut printable = vec![vec![
        "duration(ms)".to_string(),
        "path".to_string(),
        "id".to_string(),
        "host".to_string(),
        "timestamp".to_string(),
    ]];

    for ranked in records {
        printable.push(vec![
            ranked.raw_duration().to_string(),
            ranked.path().to_string(),
            ranked.record.id.to_string(),
            ranked.record.host.to_string(),
            ranked.record.timestamp.to_string(),
        ]);
    }

    TableBuilder::from(printable)
        .build()
        .with(Style::psql().remove_horizontals())
        .to_string()
}

pub fn render_table(report: &Report, top_n: usize) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{top_n} slowest endpoints:")?;
    writeln!(
        out,
        "{}",
        Table::new(&report.slowest_endpoints).with(Style::psql().remove_horizontals())
    )?;

    writeln!(out, "\n{top_n} longest responses:")?;
    writeln!(out, "{}", records_table(&report.longest_responses))?;

    writeln!(out, "\n{top_n} endpoints which had the longest responses:")?;
    writeln!(out, "{}", records_table(&report.worst_per_endpoint))?;

    Ok(out)
}
