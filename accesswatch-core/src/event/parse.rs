use crate::event::AccessEvent;
use tracing::debug;

/// Decode one JSON access record.
///
/// Malformed records are dropped (`None`) so a single bad line never
/// interrupts the stream.
pub fn parse_access_event(data: &str) -> Option<AccessEvent> {
    match serde_json::from_str::<AccessEvent>(data) {
        Ok(event) => Some(event),
        Err(err) => {
            debug!(error = %err, bytes = data.len(), "dropping malformed access event");
            None
        }
    }
}
