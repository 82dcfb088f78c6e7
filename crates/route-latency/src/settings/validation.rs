use crate::settings::Settings;
use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Validate the configuration values
pub fn validate_config(settings: &Settings) -> Result<()> {
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&settings.log_level.to_lowercase().as_str()) {
        bail!(
            "Invalid log level '{}'. Valid options are: {:?}",
            settings.log_level,
            valid_log_levels
        );
    }

    // Validate search settings
    if settings.search.url.is_empty() {
        bail!("Search URL cannot be empty");
    }

    if !settings.search.url.starts_with("http://") && !settings.search.url.starts_with("https://")
    {
        bail!("Search URL must start with http:// or https://");
    }

    if settings.search.index.is_empty() {
        bail!("Search index cannot be empty");
    }

    if settings.search.page_size == 0 {
        bail!("Search page_size must be greater than 0");
    }

    if settings.search.scroll_keepalive.is_empty() {
        bail!("Search scroll_keepalive cannot be empty");
    }

    if settings.search.username.is_some() && settings.search.password.is_none() {
        bail!("Search username is set but password is missing");
    }

    if settings.search.timeout_secs == Some(0) {
        bail!("Search timeout_secs must be greater than 0 when set");
    }

    // Validate filter settings
    if !is_iso8601(&settings.filter.since) {
        bail!(
            "Filter since must be an ISO-8601 date or date-time, got '{}'",
            settings.filter.since
        );
    }

    // Validate analysis settings
    if settings.analysis.marker_key.is_empty() {
        bail!("Analysis marker_key cannot be empty");
    }

    if settings.analysis.progress_interval == 0 {
        bail!("Analysis progress_interval must be greater than 0");
    }

    if settings.analysis.top_n == 0 {
        bail!("Analysis top_n must be greater than 0");
    }

    let edges = &settings.analysis.histogram_edges;
    if edges.len() < 2 {
        bail!(
            "Analysis histogram_edges needs at least 2 edges, got {}",
            edges.len()
        );
    }

    if edges.iter().any(|e| !e.is_finite()) {
        bail!("Analysis histogram_edges must be finite numbers");
    }

    if edges.windows(2).any(|w| w[0] >= w[1]) {
        bail!("Analysis histogram_edges must be strictly increasing, got {edges:?}");
    }

    Ok(())
}

/// Accepts RFC 3339 timestamps as well as the zone-less forms Elasticsearch
/// understands for date ranges
fn is_iso8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_config(&Settings::default()).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut settings = Settings::default();
        settings.log_level = "verbose".to_string();
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn test_invalid_search_url() {
        let mut settings = Settings::default();
        settings.search.url = "localhost:9200".to_string();
        assert!(validate_config(&settings).is_err());

        settings.search.url = String::new();
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn test_zero_page_size() {
        let mut settings = Settings::default();
        settings.search.page_size = 0;
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn test_username_requires_password() {
        let mut settings = Settings::default();
        settings.search.username = Some("ops".to_string());
        assert!(validate_config(&settings).is_err());

        settings.search.password = Some("secret".to_string());
        assert!(validate_config(&settings).is_ok());
    }

    #[test]
    fn test_since_formats() {
        let mut settings = Settings::default();
        for since in [
            "2016-10-19",
            "2016-10-19T00:00:00",
            "2016-10-19T00:00:00.250",
            "2016-10-19T00:00:00Z",
            "2016-10-19T00:00:00+02:00",
        ] {
            settings.filter.since = since.to_string();
            assert!(validate_config(&settings).is_ok(), "{since} should be valid");
        }

        settings.filter.since = "yesterday".to_string();
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn test_histogram_edges_must_increase() {
        let mut settings = Settings::default();
        settings.analysis.histogram_edges = vec![0.0, 500.0, 500.0];
        assert!(validate_config(&settings).is_err());

        settings.analysis.histogram_edges = vec![100.0];
        assert!(validate_config(&settings).is_err());

        settings.analysis.histogram_edges = vec![0.0, f64::INFINITY];
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let mut settings = Settings::default();
        settings.analysis.top_n = 0;
        assert!(validate_config(&settings).is_err());

        let mut settings = Settings::default();
        settings.analysis.progress_interval = 0;
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn test_empty_marker_rejected() {
        let mut settings = Settings::default();
        settings.analysis.marker_key = String::new();
        assert!(validate_config(&settings).is_err());
    }
}
