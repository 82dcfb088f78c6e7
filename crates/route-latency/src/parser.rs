use crate::{
    ingestor::Record,
    record::{AnalyzedRecord, ParsedFields},
    settings::AnalysisSettings,
};
use tracing::info;

/// Split a log message into `key=value` fields.
///
/// Tokens are separated by single spaces and split on their first `=`. Tokens
/// without `=` are dropped. Extraction stops at the first token whose key is
/// `marker`, which is excluded along with everything after it. A repeated key
/// keeps its last value.
pub fn parse_message(message: &str, marker: &str) -> ParsedFields {
    let mut fields = ParsedFields::new();
    for token in message.split(' ') {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        if key == marker {
            break;
        }
        fields.insert(key.to_string(), value.to_string());
    }
    fields
}

/// Turns raw records into analyzed ones, reporting progress as it goes
#[derive(Debug)]
pub struct Analyzer {
    marker: String,
    progress_interval: u64,
    processed: u64,
}

impl Analyzer {
    pub fn new(marker: impl Into<String>, progress_interval: u64) -> Self {
        Self {
            marker: marker.into(),
            progress_interval: progress_interval.max(1),
            processed: 0,
        }
    }

    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self::new(&settings.marker_key, settings.progress_interval)
    }

    pub fn analyze(&mut self, record: Record) -> AnalyzedRecord {
        let analyzed = AnalyzedRecord {
            message: parse_message(&record.source.message, &self.marker),
            id: record.id,
            timestamp: record.source.timestamp,
            host: record.source.host,
        };
        self.tick();
        analyzed
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Count one record, returns true when a progress event was emitted
    fn tick(&mut self) -> bool {
        self.processed += 1;
        if self.processed % self.progress_interval == 0 {
            info!("{} documents processed", self.processed);
            return true;
        }
        false
    }
}
