use crate::{
    cache::CacheManager,
    ingestor::{ElasticsearchSource, LogQuery, LogSource, scan},
    parser::Analyzer,
    processor::{Report, RouteAccumulator},
    record::AnalyzedRecords,
    settings::{AggregationMode, Settings},
};
use anyhow::Result;
use futures::TryStreamExt;
use std::pin::pin;
use tracing::{info, warn};

/// Runs the fetch → parse → aggregate pipeline for one invocation
pub struct Orchestrator {
    settings: Settings,
    cache: CacheManager,
}

impl Orchestrator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            cache: CacheManager::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the report against the configured Elasticsearch cluster
    pub async fn report(&self, refresh: bool) -> Result<Report> {
        let source = ElasticsearchSource::from_settings(&self.settings.search)?;
        self.report_from(&source, refresh).await
    }

    /// Build the report, reusing the cache file unless `refresh` is set
    pub async fn report_from<S>(&self, source: &S, refresh: bool) -> Result<Report>
    where
        S: LogSource + Sync + ?Sized,
    {
        let analysis = &self.settings.analysis;
        let cache = &self.settings.cache;

        if cache.enabled && !refresh && self.cache.exists(&cache.path) {
            let records = self.cache.load(&cache.path)?;
            return Ok(Report::from_records(
                &records,
                &analysis.histogram_edges,
                analysis.top_n,
            )?);
        }

        match analysis.mode {
            AggregationMode::Materialized => {
                let records = self.fetch_from(source).await?;
                if cache.enabled {
                    self.cache.save(&records, &cache.path)?;
                }
                Ok(Report::from_records(
                    &records,
                    &analysis.histogram_edges,
                    analysis.top_n,
                )?)
            }
            AggregationMode::Streaming => {
                if cache.enabled {
                    warn!(
                        "Streaming aggregation keeps no record set, cache file {:?} will not be written",
                        cache.path
                    );
                }
                self.stream_from(source).await
            }
        }
    }

    /// Fetch everything from Elasticsearch and overwrite the cache file
    pub async fn fetch(&self) -> Result<usize> {
        let source = ElasticsearchSource::from_settings(&self.settings.search)?;
        let records = self.fetch_from(&source).await?;
        self.cache.save(&records, &self.settings.cache.path)?;
        Ok(records.len())
    }

    /// Pull and parse every matching record into memory
    pub async fn fetch_from<S>(&self, source: &S) -> Result<AnalyzedRecords>
    where
        S: LogSource + Sync + ?Sized,
    {
        let query = LogQuery::new(&self.settings.search, &self.settings.filter);
        let mut analyzer = Analyzer::from_settings(&self.settings.analysis);
        let mut records = AnalyzedRecords::new();

        info!("Fetching records from index {}", query.index);
        let mut stream = pin!(scan(source, &query));
        while let Some(record) = stream.try_next().await? {
            let analyzed = analyzer.analyze(record);
            records.insert(analyzed.id.clone(), analyzed);
        }

        info!(
            "Fetched {} records ({} unique ids)",
            analyzer.processed(),
            records.len()
        );
        Ok(records)
    }

    async fn stream_from<S>(&self, source: &S) -> Result<Report>
    where
        S: LogSource + Sync + ?Sized,
    {
        let analysis = &self.settings.analysis;
        let query = LogQuery::new(&self.settings.search, &self.settings.filter);
        let mut analyzer = Analyzer::from_settings(analysis);
        let mut accumulator = RouteAccumulator::new(&analysis.histogram_edges, analysis.top_n);

        info!("Streaming records from index {}", query.index);
        let mut stream = pin!(scan(source, &query));
        while let Some(record) = stream.try_next().await? {
            accumulator.push(analyzer.analyze(record))?;
        }

        info!("Aggregated {} records", accumulator.len());
        Ok(accumulator.finish())
    }
}
