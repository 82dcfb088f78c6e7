use crate::settings::{FilterSettings, SearchSettings};
use serde_json::{Value, json};

/// The fixed boolean filter a run pulls its records with.
///
/// All four clauses must match: exact ident, host wildcard, message text and an
/// inclusive lower bound on the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct LogQuery {
    pub index: String,
    pub page_size: usize,
    pub filter: FilterSettings,
}

impl LogQuery {
    pub fn new(search: &SearchSettings, filter: &FilterSettings) -> Self {
        Self {
            index: search.index.clone(),
            page_size: search.page_size,
            filter: filter.clone(),
        }
    }

    /// Request body for the initial scroll search
    pub fn body(&self) -> Value {
        let f = &self.filter;
        json!({
            "size": self.page_size,
            // Scan order, the caller does not need sorted hits
            "sort": ["_doc"],
            "query": {
                "bool": {
                    "must": [
                        { "term": { &f.ident_field: &f.ident } },
                        { "wildcard": { &f.host_field: &f.host_pattern } },
                        { "match": { &f.message_field: &f.message_match } },
                        { "range": { &f.timestamp_field: { "gte": &f.since } } }
                    ]
                }
            }
        })
    }
}
