use crate::event::{AccessEvent, parse_access_event};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

#[test]
fn parses_full_access_record() {
    // Arrange
    let data = r#"{
        "timestamp": "2026-02-06T15:30:00Z",
        "host": "ik.am",
        "path": "/test/sse",
        "method": "GET",
        "statusCode": 200,
        "durationNs": 50000000,
        "clientIp": "10.0.0.1",
        "scheme": "https",
        "protocol": "HTTP/2.0",
        "serviceName": "blog@kubernetes",
        "routerName": "blog-router",
        "originStatusCode": 200,
        "originDurationNs": 45000000,
        "overheadNs": 5000000,
        "traceId": "0af7651916cd43dd8448eb211c80319c",
        "spanId": "b7ad6b7169203331",
        "retryAttempts": 0
    }"#;

    // Act
    let event = parse_access_event(data).unwrap();

    // Assert
    assert_eq!(
        event,
        AccessEvent {
            timestamp: Some(Utc.with_ymd_and_hms(2026, 2, 6, 15, 30, 0).unwrap()),
            host: "ik.am".into(),
            path: "/test/sse".into(),
            method: "GET".into(),
            status_code: 200,
            duration_ns: 50_000_000,
            client_ip: "10.0.0.1".into(),
            scheme: "https".into(),
            protocol: "HTTP/2.0".into(),
            service_name: "blog@kubernetes".into(),
            router_name: "blog-router".into(),
            origin_status_code: 200,
            origin_duration_ns: 45_000_000,
            overhead_ns: 5_000_000,
            trace_id: "0af7651916cd43dd8448eb211c80319c".into(),
            span_id: "b7ad6b7169203331".into(),
            retry_attempts: 0,
        }
    );
    assert_eq!(event.duration_ms(), 50.0);
    assert_eq!(event.status_class(), 2);
}

#[test]
fn missing_and_null_fields_become_empty() {
    let event = parse_access_event(r#"{"host": null, "statusCode": 404}"#).unwrap();

    assert_eq!(event.host, "");
    assert_eq!(event.path, "");
    assert_eq!(event.method, "");
    assert_eq!(event.timestamp, None);
    assert_eq!(event.status_code, 404);
}

#[test]
fn malformed_records_are_dropped() {
    assert!(parse_access_event("not json").is_none());
    assert!(parse_access_event("42").is_none());
    assert!(parse_access_event(r#"{"statusCode": "two hundred"}"#).is_none());
    assert!(parse_access_event(r#"{"statusCode": -1}"#).is_none());
}

#[test]
fn server_errors_start_at_500() {
    let ok = AccessEvent {
        status_code: 499,
        ..Default::default()
    };
    let err = AccessEvent {
        status_code: 500,
        ..Default::default()
    };

    assert!(!ok.is_server_error());
    assert!(err.is_server_error());
}
