/// Commented starting point printed by `accesswatch config init`.
pub const DEFAULT_CONFIG: &str = r#"# accesswatch configuration

[stream]
# Server-Sent-Events endpoint publishing `access` events.
endpoint = "http://localhost:8080/api/stream/access"

# How often buffered events are folded into the views.
tick_interval_ms = 1000

# Number of one-tick buckets kept in the chart series.
chart_capacity = 60

# Number of events kept in the live access log.
log_capacity = 100

[filter]
# Case-insensitive substring of the request host.
host = ""
# Case-insensitive substring of the request path.
path = ""
# Exact HTTP method, empty for all.
method = ""
"#;
