use crate::event::AccessEvent;
use crate::stream::IntakeBuffer;
use std::thread;

fn event(path: &str) -> AccessEvent {
    AccessEvent {
        path: path.into(),
        ..Default::default()
    }
}

#[test]
fn drain_returns_events_in_arrival_order_and_empties() {
    // Arrange
    let intake = IntakeBuffer::new();
    intake.push(event("/a"));
    intake.push(event("/b"));
    intake.push(event("/c"));

    // Act
    let drained = intake.drain();

    // Assert
    let paths: Vec<_> = drained.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/a", "/b", "/c"]);
    assert!(intake.is_empty());
    assert!(intake.drain().is_empty());
}

#[test]
fn bursts_are_not_capped() {
    let intake = IntakeBuffer::new();

    for i in 0..10_000 {
        intake.push(event(&format!("/{i}")));
    }

    assert_eq!(intake.len(), 10_000);
    assert_eq!(intake.drain().len(), 10_000);
}

#[test]
fn close_discards_buffer_and_rejects_pushes() {
    let intake = IntakeBuffer::new();
    intake.push(event("/a"));
    intake.push(event("/b"));

    let discarded = intake.close();

    assert_eq!(discarded, 2);
    assert!(intake.is_closed());
    assert!(!intake.push(event("/c")));
    assert_eq!(intake.rejected(), 1);
    assert!(intake.drain().is_empty());
}

#[test]
fn concurrent_push_and_drain_lose_nothing() {
    // Arrange
    let intake = IntakeBuffer::new();
    let writer = intake.clone();

    // Act
    let producer = thread::spawn(move || {
        for i in 0..5_000 {
            writer.push(event(&i.to_string()));
        }
    });

    let mut seen = Vec::new();
    while !producer.is_finished() {
        seen.extend(intake.drain());
    }
    producer.join().unwrap();
    seen.extend(intake.drain());

    // Assert
    let expected: Vec<String> = (0..5_000).map(|i| i.to_string()).collect();
    let actual: Vec<String> = seen.into_iter().map(|e| e.path).collect();
    assert_eq!(actual, expected);
}
