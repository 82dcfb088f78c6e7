use serde::{Deserialize, Serialize};

/// One raw log entry as stored in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: RecordSource,
}

/// NOTE: Only the fields we consume, the rest of `_source` is ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSource {
    pub message: String,
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    pub host: String,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        timestamp: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: RecordSource {
                message: message.into(),
                timestamp: timestamp.into(),
                host: host.into(),
            },
        }
    }
}

/// One batch of hits plus the cursor needed to request the next one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub scroll_id: Option<String>,
    pub hits: Vec<Record>,
}

/// Partial `_search` / `_search/scroll` response body
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "_scroll_id", default)]
    pub scroll_id: Option<String>,
    pub hits: SearchHits,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchHits {
    #[serde(default)]
    pub hits: Vec<Record>,
}

impl From<SearchResponse> for Page {
    fn from(resp: SearchResponse) -> Self {
        Self {
            scroll_id: resp.scroll_id,
            hits: resp.hits.hits,
        }
    }
}
