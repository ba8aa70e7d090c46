//! Tracking loop behavior over whole sessions


use head_zone_control::{
    config::TrackingConfig,
    gesture::DebounceMode,
    replay::{Detection, RecordedPerception, TraceFrame},
    tracking::{LoopState, PublishedState, TickOutcome, TrackingLoop},
    zones::Zone,
    Error,
};
use rand::Rng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_helpers::{action_times, assert_close, held_pose, run_frames, start_tracker, FRAME_MS};

#[tokio::test]
async fn test_session_warm_up_center_then_bottom_left() {
    let mut tracker = start_tracker(&TrackingConfig::default()).await.unwrap();

    let published = Arc::new(Mutex::new(Vec::<PublishedState>::new()));
    let sink = Arc::clone(&published);
    tracker.subscribe(move |state| sink.lock().unwrap().push(*state));

    let actions = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&actions);
    tracker.on_action(move || *counter.lock().unwrap() += 1);

    // Stream still loading
    for t in [0, 33, 66] {
        assert_eq!(tracker.tick(&TraceFrame::loading(t)), TickOutcome::WarmingUp);
    }
    assert!(published.lock().unwrap().is_empty());
    assert!(!tracker.is_ready());

    let outcome = tracker.tick(&TraceFrame::looking(99, 0.0, 0.0));
    let state = outcome.published().unwrap();
    assert!(state.ready);
    assert_eq!(state.zone, Zone::Center);

    let outcomes = run_frames(&mut tracker, &held_pose(-30.0, 30.0, 132, 2000));
    assert!(outcomes
        .iter()
        .all(|o| o.published().map(|s| s.zone) == Some(Zone::BottomLeft)));

    let fired = action_times(&outcomes);
    assert_eq!(fired.len(), 2);
    assert_eq!(fired[0] - 132, 0);
    assert!((fired[1] - 132 - 1500).abs() <= FRAME_MS);
    assert_eq!(*actions.lock().unwrap(), 2);
    assert_eq!(published.lock().unwrap().len(), 1 + outcomes.len());
}

#[tokio::test]
async fn test_missed_detections_freeze_state() {
    let config = TrackingConfig::default();
    let valid = |t| TraceFrame::looking(t, -30.0, 30.0);

    let mut with_misses = start_tracker(&config).await.unwrap();
    let first = with_misses.tick(&valid(0)).published().unwrap();
    for i in 1..=10 {
        let outcome = with_misses.tick(&TraceFrame::no_face(i * FRAME_MS));
        assert_eq!(outcome, TickOutcome::Missed(first));
    }
    let smoother_after_misses = with_misses.pipeline().smoother_state();
    let last = with_misses.tick(&valid(11 * FRAME_MS));

    let mut without_misses = start_tracker(&config).await.unwrap();
    without_misses.tick(&valid(0));
    assert_eq!(without_misses.pipeline().smoother_state(), smoother_after_misses);
    let expected = without_misses.tick(&valid(11 * FRAME_MS));

    assert_eq!(last, expected);
    assert_eq!(
        with_misses.pipeline().debouncer_state(),
        without_misses.pipeline().debouncer_state()
    );
    assert_eq!(with_misses.stats().missed, 10);
}

#[tokio::test]
async fn test_misses_around_neutral_pose_keep_published_values() {
    let mut tracker = start_tracker(&TrackingConfig::default()).await.unwrap();
    let first = tracker.tick(&TraceFrame::looking(0, 0.0, 0.0)).published().unwrap();

    for i in 1..=10 {
        tracker.tick(&TraceFrame::no_face(i * FRAME_MS));
    }
    let again = tracker.tick(&TraceFrame::looking(11 * FRAME_MS, 0.0, 0.0)).published().unwrap();

    assert_eq!(again.zone, first.zone);
    assert_close(again.yaw_deg, first.yaw_deg, 1e-9);
    assert_close(again.pitch_deg, first.pitch_deg, 1e-9);
}

#[tokio::test]
async fn test_detection_fault_is_skipped() {
    let mut tracker = start_tracker(&TrackingConfig::default()).await.unwrap();
    let first = tracker.tick(&TraceFrame::looking(0, 20.0, 0.0)).published().unwrap();
    let smoother = tracker.pipeline().smoother_state();

    let fault = TraceFrame::new(33, 640, 480, Detection::Fault("inference timeout".to_string()));
    assert_eq!(tracker.tick(&fault), TickOutcome::Missed(first));
    assert_eq!(tracker.pipeline().smoother_state(), smoother);
    assert_eq!(tracker.state(), LoopState::Running);
    assert_eq!(tracker.stats().faults, 1);

    // the loop carries on
    let next = tracker.tick(&TraceFrame::looking(66, 20.0, 0.0));
    assert!(matches!(next, TickOutcome::Published { .. }));
}

#[tokio::test]
async fn test_initialization_failure_stops_loop() {
    let mut tracker: TrackingLoop<RecordedPerception> = TrackingLoop::new(&TrackingConfig::default()).unwrap();
    let result = tracker
        .start(async { Err(Error::InvalidInput("camera unavailable".to_string())) })
        .await;

    match result {
        Err(Error::Initialization(msg)) => assert!(msg.contains("camera unavailable")),
        other => panic!("Expected Initialization error, got {other:?}"),
    }
    assert_eq!(tracker.state(), LoopState::Stopped);
    assert_eq!(tracker.tick(&TraceFrame::looking(0, 0.0, 0.0)), TickOutcome::Inactive);
    assert!(!tracker.is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_slow_acquisition() {
    let mut tracker = TrackingLoop::new(&TrackingConfig::default()).unwrap();
    tracker
        .start(async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(RecordedPerception::new())
        })
        .await
        .unwrap();

    assert_eq!(tracker.state(), LoopState::WarmingUp);
}

#[tokio::test]
async fn test_invalid_config_rejected_at_construction() {
    let config = TrackingConfig {
        debounce_millis: -5,
        ..TrackingConfig::default()
    };
    let result: Result<TrackingLoop<RecordedPerception>, _> = TrackingLoop::new(&config);
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn test_rising_edge_session() {
    let config = TrackingConfig {
        debounce_mode: DebounceMode::RisingEdge,
        ..TrackingConfig::default()
    };
    let mut tracker = start_tracker(&config).await.unwrap();

    let mut frames = held_pose(-30.0, 30.0, 0, 4000);
    let outcomes = run_frames(&mut tracker, &frames);
    assert_eq!(action_times(&outcomes), vec![0]);

    // look away long enough for the smoother to settle, then come back
    frames = held_pose(0.0, 0.0, 4000, 1000);
    frames.extend(held_pose(-30.0, 30.0, 5000, 500));
    let outcomes = run_frames(&mut tracker, &frames);
    assert_eq!(action_times(&outcomes).len(), 1);
}

#[tokio::test]
async fn test_cancel_from_another_task() {
    let mut tracker = start_tracker(&TrackingConfig::default()).await.unwrap();
    tracker.tick(&TraceFrame::looking(0, 0.0, 0.0));

    let handle = tracker.cancel_handle();
    tokio::spawn(async move { handle.cancel() }).await.unwrap();

    assert_eq!(tracker.tick(&TraceFrame::looking(33, 0.0, 0.0)), TickOutcome::Inactive);
    assert_eq!(tracker.state(), LoopState::Stopped);
}

#[tokio::test]
async fn test_noise_inside_center_band_never_fires() {
    let mut tracker = start_tracker(&TrackingConfig::default()).await.unwrap();
    let mut rng = rand::thread_rng();

    for i in 0..500 {
        let yaw = rng.gen_range(-4.5..4.5);
        let pitch = rng.gen_range(-13.5..13.5);
        let outcome = tracker.tick(&TraceFrame::looking(i * FRAME_MS, yaw, pitch));

        assert_eq!(outcome.published().unwrap().zone, Zone::Center);
        assert!(outcome.action().is_none());
    }
    assert_eq!(tracker.stats().processed, 500);
}
