use crate::error::AnalysisError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const PATH_FIELD: &str = "path";
pub const DURATION_FIELD: &str = "duration";

/// Fields extracted from a log message, in the order they first appeared
pub type ParsedFields = IndexMap<String, String>;

/// Every analyzed record of a run, keyed by record id.
///
/// This is the exact shape persisted to the cache file.
pub type AnalyzedRecords = IndexMap<String, AnalyzedRecord>;

/// A log record with its message decoded into key/value fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub message: ParsedFields,
    #[serde(rename = "_timestamp")]
    pub timestamp: String,
    #[serde(rename = "_host")]
    pub host: String,
}

impl AnalyzedRecord {
    pub fn field(&self, name: &'static str) -> Result<&str, AnalysisError> {
        self.message
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AnalysisError::MissingField {
                id: self.id.clone(),
                field: name,
            })
    }

    pub fn path(&self) -> Result<&str, AnalysisError> {
        self.field(PATH_FIELD)
    }

    /// Raw duration string as logged, e.g. "120.53"
    pub fn raw_duration(&self) -> Result<&str, AnalysisError> {
        self.field(DURATION_FIELD)
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> Result<f64, AnalysisError> {
        let raw = self.raw_duration()?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .ok_or_else(|| AnalysisError::InvalidDuration {
                id: self.id.clone(),
                value: raw.to_string(),
            })
    }
}

/// The only two message fields the aggregation consumes, typed.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTiming<'a> {
    pub path: &'a str,
    pub duration_ms: f64,
}

impl<'a> TryFrom<&'a AnalyzedRecord> for RequestTiming<'a> {
    type Error = AnalysisError;

    fn try_from(record: &'a AnalyzedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            path: record.path()?,
            duration_ms: record.duration_ms()?,
        })
    }
}
