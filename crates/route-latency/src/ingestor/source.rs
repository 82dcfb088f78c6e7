use crate::{
    ingestor::{
        query::LogQuery,
        types::{Page, SearchResponse},
    },
    settings::SearchSettings,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use mockall::automock;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// A paginated log backend.
///
/// `open` starts a cursor for `query` and returns the first page, `scroll` returns
/// the page after the given cursor and `clear` releases the cursor server side.
#[automock]
#[async_trait]
pub trait LogSource {
    async fn open(&self, query: &LogQuery) -> Result<Page>;
    async fn scroll(&self, scroll_id: &str) -> Result<Page>;
    async fn clear(&self, scroll_id: &str) -> Result<()>;
}

/// Elasticsearch scroll API client
#[derive(Clone)]
pub struct ElasticsearchSource {
    client: reqwest::Client,
    base_url: String,
    keepalive: String,
    credentials: Option<(String, Option<String>)>,
}

impl ElasticsearchSource {
    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            keepalive: settings.scroll_keepalive.clone(),
            credentials: settings
                .username
                .clone()
                .map(|user| (user, settings.password.clone())),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let request = self.client.request(method, url);
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, password.as_ref()),
            None => request,
        }
    }

    async fn fetch_page(&self, request: RequestBuilder) -> Result<Page> {
        let response = request.send().await?.error_for_status()?;
        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;
        Ok(body.into())
    }
}

#[async_trait]
impl LogSource for ElasticsearchSource {
    async fn open(&self, query: &LogQuery) -> Result<Page> {
        debug!(
            "Opening scroll on index {} with page size {}",
            query.index, query.page_size
        );
        let path = format!("{}/_search?scroll={}", query.index, self.keepalive);
        let request = self.request(Method::POST, &path).json(&query.body());

        self.fetch_page(request)
            .await
            .with_context(|| format!("Search on index {} failed", query.index))
    }

    async fn scroll(&self, scroll_id: &str) -> Result<Page> {
        let request = self
            .request(Method::POST, "_search/scroll")
            .json(&json!({ "scroll": self.keepalive, "scroll_id": scroll_id }));

        self.fetch_page(request)
            .await
            .context("Scroll request failed")
    }

    async fn clear(&self, scroll_id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, "_search/scroll")
            .json(&json!({ "scroll_id": [scroll_id] }))
            .send()
            .await?;

        // Already expired contexts are fine
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Scroll context already released");
            return Ok(());
        }
        response
            .error_for_status()
            .context("Failed to clear scroll context")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_normalizes_url() {
        let settings = SearchSettings {
            url: "http://localhost:9200/".to_string(),
            username: Some("ops".to_string()),
            password: Some("secret".to_string()),
            ..SearchSettings::default()
        };
        let source = ElasticsearchSource::from_settings(&settings).unwrap();

        assert_eq!(source.base_url, "http://localhost:9200");
        assert_eq!(source.keepalive, "5m");
        assert_eq!(
            source.credentials,
            Some(("ops".to_string(), Some("secret".to_string())))
        );
    }

    #[test]
    fn test_request_url() {
        let source = ElasticsearchSource::from_settings(&SearchSettings::default()).unwrap();
        let request = source
            .request(Method::POST, "logstash-*/_search?scroll=5m")
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:9200/logstash-*/_search?scroll=5m"
        );
    }
}
