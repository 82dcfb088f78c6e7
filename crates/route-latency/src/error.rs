use thiserror::Error;

/// Failures raised while turning analyzed records into statistics.
///
/// Any of these aborts the whole run: a single malformed record is never skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("record {id} has no '{field}' field")]
    MissingField { id: String, field: &'static str },

    #[error("record {id} has a non-numeric duration: {value:?}")]
    InvalidDuration { id: String, value: String },
}
