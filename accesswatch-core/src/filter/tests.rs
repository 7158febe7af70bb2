use crate::event::AccessEvent;
use crate::filter::{StreamFilter, matches};

fn event(host: &str, path: &str, method: &str) -> AccessEvent {
    AccessEvent {
        host: host.into(),
        path: path.into(),
        method: method.into(),
        status_code: 200,
        ..Default::default()
    }
}

#[test]
fn empty_filter_matches_everything() {
    let filter = StreamFilter::default();

    assert!(filter.is_empty());
    assert!(matches(&event("ik.am", "/", "GET"), &filter));
    assert!(matches(&AccessEvent::default(), &filter));
}

#[test]
fn host_is_case_insensitive_substring() {
    let filter = StreamFilter::new("IK.AM", "", "");

    assert!(matches(&event("blog.ik.am", "/", "GET"), &filter));
    assert!(matches(&event("Ik.Am", "/", "GET"), &filter));
    assert!(!matches(&event("example.com", "/", "GET"), &filter));
}

#[test]
fn path_is_case_insensitive_substring() {
    let filter = StreamFilter::new("", "/API", "");

    assert!(matches(&event("ik.am", "/api/entries", "GET"), &filter));
    assert!(matches(&event("ik.am", "/v1/Api", "GET"), &filter));
    assert!(!matches(&event("ik.am", "/entries", "GET"), &filter));
}

#[test]
fn method_is_exact_and_case_sensitive() {
    let filter = StreamFilter::new("", "", "POST");

    assert!(matches(&event("ik.am", "/", "POST"), &filter));
    assert!(!matches(&event("ik.am", "/", "post"), &filter));
    assert!(!matches(&event("ik.am", "/", "POSTX"), &filter));
    assert!(!matches(&event("ik.am", "/", "GET"), &filter));
}

#[test]
fn all_criteria_must_pass() {
    let filter = StreamFilter::new("ik.am", "/api", "GET");

    assert!(matches(&event("ik.am", "/api/x", "GET"), &filter));
    assert!(!matches(&event("other", "/api/x", "GET"), &filter));
    assert!(!matches(&event("ik.am", "/web", "GET"), &filter));
    assert!(!matches(&event("ik.am", "/api/x", "PUT"), &filter));
}

#[test]
fn absent_event_fields_compare_as_empty() {
    let empty = AccessEvent::default();

    assert!(!matches(&empty, &StreamFilter::new("ik", "", "")));
    assert!(!matches(&empty, &StreamFilter::new("", "", "GET")));
}
