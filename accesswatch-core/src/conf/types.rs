use crate::conf::ConfigError;
use crate::filter::StreamFilter;
use crate::stream::constants::{MAX_CHART_POINTS, MAX_RECENT_EVENTS, TICK_INTERVAL};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    #[serde(default)]
    pub stream: StreamSettings,

    /// Initial filter; the session can replace it at any time.
    #[serde(default)]
    pub filter: StreamFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamSettings {
    /// SSE endpoint, e.g. "http://localhost:8080/api/stream/access".
    pub endpoint: Option<Url>,
    pub tick_interval_ms: u64,
    pub chart_capacity: usize,
    pub log_capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
            chart_capacity: MAX_CHART_POINTS,
            log_capacity: MAX_RECENT_EVENTS,
        }
    }
}

impl StreamSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.stream;

        if s.tick_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "stream.tick_interval_ms",
                "must be greater than zero",
            ));
        }
        if s.chart_capacity == 0 {
            return Err(ConfigError::invalid(
                "stream.chart_capacity",
                "must be greater than zero",
            ));
        }
        if s.log_capacity == 0 {
            return Err(ConfigError::invalid(
                "stream.log_capacity",
                "must be greater than zero",
            ));
        }
        if let Some(endpoint) = &s.endpoint {
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(ConfigError::invalid(
                    "stream.endpoint",
                    format!(
                        "unsupported scheme '{}', expected http or https",
                        endpoint.scheme()
                    ),
                ));
            }
        }

        let method = &self.filter.method;
        if !method.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::invalid(
                "filter.method",
                format!("'{method}' is not an upper-case HTTP method"),
            ));
        }

        Ok(())
    }
}
