//! Ordering and concurrency tests for SessionControlChannel
//!
//! Demonstrates:
//! - FIFO delivery across interleaved operation kinds
//! - A single winner when many tasks race to start
//! - Fire-and-forget delivery against a slow collaborator

use std::sync::Arc;

use navbridge_session_channel::{
    Annotation, ChannelConfig, ChannelError, SessionControlChannel, SessionSignal, SessionState,
    Waypoint,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[tokio::test]
async fn waypoint_batches_arrive_in_send_order() {
    init_tracing();
    let (channel, mut inbox) = SessionControlChannel::new();

    channel.start(vec![Waypoint::named("origin", 0.0, 0.0)]).unwrap();
    for i in 0..10 {
        channel
            .add_waypoints(vec![Waypoint::named(format!("wp-{i}"), i as f64, 0.0)])
            .unwrap();
    }

    assert!(matches!(inbox.recv().await.unwrap(), SessionSignal::Start { .. }));
    for i in 0..10 {
        match inbox.recv().await.unwrap() {
            SessionSignal::AddWaypoints { waypoints, .. } => {
                assert_eq!(waypoints[0].name.as_deref(), Some(format!("wp-{i}").as_str()));
            }
            other => panic!("expected AddWaypoints, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn interleaved_annotations_keep_their_place_in_the_stream() {
    let (channel, mut inbox) = SessionControlChannel::new();

    channel.start(vec![Waypoint::new(0.0, 0.0)]).unwrap();
    channel.add_waypoints(vec![Waypoint::new(1.0, 0.0)]).unwrap();
    channel
        .add_annotations(vec![Annotation::labeled("between", 0.5, 0.0)])
        .unwrap();
    channel.add_waypoints(vec![Waypoint::new(2.0, 0.0)]).unwrap();

    let names: Vec<&'static str> = [
        inbox.recv().await.unwrap(),
        inbox.recv().await.unwrap(),
        inbox.recv().await.unwrap(),
        inbox.recv().await.unwrap(),
    ]
    .iter()
    .map(|s| s.name())
    .collect();
    assert_eq!(
        names,
        vec!["Start", "AddWaypoints", "AddAnnotations", "AddWaypoints"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_starts_produce_exactly_one_session() {
    init_tracing();
    let (channel, mut inbox) = SessionControlChannel::new();
    let channel = Arc::new(channel);

    let mut handles = Vec::new();
    for i in 0..8 {
        let ch = channel.clone();
        handles.push(tokio::spawn(async move {
            ch.start(vec![Waypoint::new(i as f64, 0.0)])
        }));
    }

    let mut started = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => started += 1,
            Err(ChannelError::SessionAlreadyActive { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(started, 1);
    assert_eq!(rejected, 7);
    assert_eq!(channel.state(), SessionState::Active);
    assert_eq!(channel.stats().sessions_started, 1);

    // Exactly one Start signal crossed the boundary.
    assert!(matches!(inbox.try_recv(), Some(SessionSignal::Start { .. })));
    assert!(inbox.try_recv().is_none());
}

#[tokio::test]
async fn slow_collaborator_never_blocks_the_caller() {
    let (channel, mut inbox) = SessionControlChannel::with_config(ChannelConfig {
        inbox_capacity: 4,
    });

    // The collaborator drains nothing while the caller keeps sending.
    channel.start(vec![Waypoint::new(0.0, 0.0)]).unwrap();
    channel.add_waypoints(vec![Waypoint::new(1.0, 0.0)]).unwrap();
    channel.add_waypoints(vec![Waypoint::new(2.0, 0.0)]).unwrap();
    channel.add_waypoints(vec![Waypoint::new(3.0, 0.0)]).unwrap();

    // Inbox is full now; the overflow is reported, not blocked on.
    let err = channel
        .add_waypoints(vec![Waypoint::new(4.0, 0.0)])
        .unwrap_err();
    assert!(matches!(err, ChannelError::DeliveryFailed { .. }));
    assert_eq!(channel.stats().delivery_failures, 1);

    // Once the collaborator catches up, delivery resumes.
    assert!(inbox.recv().await.is_some());
    channel.add_waypoints(vec![Waypoint::new(5.0, 0.0)]).unwrap();
}

#[tokio::test]
async fn stop_does_not_recall_in_flight_signals() {
    let (channel, mut inbox) = SessionControlChannel::new();

    channel.start(vec![Waypoint::new(0.0, 0.0)]).unwrap();
    channel.add_waypoints(vec![Waypoint::new(1.0, 0.0)]).unwrap();
    channel.stop().unwrap();

    // The waypoint batch sent before stop() still reaches the collaborator.
    assert!(matches!(inbox.recv().await.unwrap(), SessionSignal::Start { .. }));
    assert!(matches!(
        inbox.recv().await.unwrap(),
        SessionSignal::AddWaypoints { .. }
    ));
    assert!(matches!(inbox.recv().await.unwrap(), SessionSignal::Stop));
}
