use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single access record as delivered by the live stream.
///
/// Produced by a transport and never mutated afterwards. Absent or `null`
/// fields deserialize to their empty value, so filtering compares them as "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub host: String,
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status_code: u16,
    #[serde(deserialize_with = "null_as_default")]
    pub duration_ns: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub client_ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub scheme: String,
    #[serde(deserialize_with = "null_as_default")]
    pub protocol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub router_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub origin_status_code: u16,
    #[serde(deserialize_with = "null_as_default")]
    pub origin_duration_ns: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub overhead_ns: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub trace_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub span_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub retry_attempts: u32,
}

impl AccessEvent {
    pub fn duration_ms(&self) -> f64 {
        self.duration_ns as f64 / 1_000_000.0
    }

    /// Hundreds digit of the status code (2 for 2xx, 5 for 5xx, ...).
    pub fn status_class(&self) -> u16 {
        self.status_code / 100
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code >= 500
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
