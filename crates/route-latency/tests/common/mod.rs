#![allow(dead_code)]

use route_latency::{
    ingestor::{Page, Record, source::MockLogSource},
    record::{AnalyzedRecord, AnalyzedRecords},
    settings::Settings,
};
use std::path::Path;

pub fn record(id: &str, path: &str, duration: &str) -> Record {
    Record::new(
        id,
        format!("method=GET path={path} format=html status=200 duration={duration} params={{\"id\"=>\"1\"}}"),
        "2016-10-19T10:00:00.000Z",
        "ci-1",
    )
}

pub fn analyzed(id: &str, path: &str, duration: &str) -> AnalyzedRecord {
    AnalyzedRecord {
        id: id.to_string(),
        message: [("path", path), ("duration", duration)]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        timestamp: "2016-10-19T10:00:00.000Z".to_string(),
        host: "ci-1".to_string(),
    }
}

pub fn analyzed_map(records: Vec<AnalyzedRecord>) -> AnalyzedRecords {
    records.into_iter().map(|r| (r.id.clone(), r)).collect()
}

/// A source serving `pages` in order, followed by an empty page.
///
/// Cursor ids are "scroll-N" where N is the index of the next page to serve.
pub fn paged_source(pages: Vec<Vec<Record>>) -> MockLogSource {
    paged_source_with_clears(pages, 1)
}

/// Like [`paged_source`], expecting the cursor to be cleared exactly `clears` times
pub fn paged_source_with_clears(pages: Vec<Vec<Record>>, clears: usize) -> MockLogSource {
    let mut source = MockLogSource::new();
    let first = pages.first().cloned().unwrap_or_default();

    source.expect_open().times(1).returning(move |_| {
        Ok(Page {
            scroll_id: Some("scroll-1".to_string()),
            hits: first.clone(),
        })
    });

    source.expect_scroll().returning(move |id| {
        let next: usize = id.trim_start_matches("scroll-").parse().unwrap();
        Ok(Page {
            scroll_id: Some(format!("scroll-{}", next + 1)),
            hits: pages.get(next).cloned().unwrap_or_default(),
        })
    });

    source.expect_clear().times(clears).returning(|_| Ok(()));
    source
}

/// A source that fails the test if it is ever queried
pub fn unused_source() -> MockLogSource {
    let mut source = MockLogSource::new();
    source.expect_open().never();
    source.expect_scroll().never();
    source.expect_clear().never();
    source
}

pub fn test_settings(cache_path: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.cache.path = cache_path.to_path_buf();
    settings.search.page_size = 2;
    settings
}
