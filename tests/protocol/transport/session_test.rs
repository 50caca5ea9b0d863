//! Transport session tests: bounded wait, drain, overflow and channel errors.
mod helpers {
    include!("../../helpers/mod.rs");
}

use helpers::{read_response, RecordingTimer, SimError, SimulatedController};
use rtu_telemetry::core::MAX_RESPONSE_BYTES;
use rtu_telemetry::protocol::{
    rtu::{frame::build_request, RegisterGroup},
    transport::{session::TransportSession, TimeoutPolicy},
};

const PANEL_VOLTAGE: RegisterGroup = RegisterGroup::read("panel_voltage", 0x0107, 1);

#[tokio::test]
async fn test_silent_channel_times_out_after_policy_bound() {
    // No byte ever arrives: exactly max_checks sleeps of check_interval_ms, empty buffer.
    let controller = SimulatedController::new(0xFF).silence(0x0107);
    let mut session =
        TransportSession::new(controller, RecordingTimer::default(), TimeoutPolicy::default());

    let request = build_request(0xFF, &PANEL_VOLTAGE);
    let response = session.send_and_receive(request.as_bytes()).await.unwrap();

    assert!(response.is_empty());
    assert_eq!(session.timer_mut().delays, vec![5; 10]);
    assert_eq!(session.channel().requests, vec![request.as_bytes().to_vec()]);
}

#[tokio::test]
async fn test_custom_policy_bounds_the_wait() {
    let controller = SimulatedController::new(0xFF).silence(0x0107);
    let policy = TimeoutPolicy {
        max_checks: 3,
        check_interval_ms: 20,
    };
    let mut session = TransportSession::new(controller, RecordingTimer::default(), policy);

    let request = build_request(0xFF, &PANEL_VOLTAGE);
    let response = session.send_and_receive(request.as_bytes()).await.unwrap();

    assert!(response.is_empty());
    assert_eq!(session.timer_mut().delays, vec![20, 20, 20]);
    assert_eq!(session.policy().bound_ms(), 60);
}

#[tokio::test]
async fn test_available_response_is_drained_without_waiting() {
    let controller = SimulatedController::new(0xFF).with_register(0x0107, 0x00B6);
    let mut session =
        TransportSession::new(controller, RecordingTimer::default(), TimeoutPolicy::default());

    let request = build_request(0xFF, &PANEL_VOLTAGE);
    let response = session.send_and_receive(request.as_bytes()).await.unwrap();

    assert_eq!(response.as_slice(), read_response(0xFF, &[0x00B6]).as_slice());
    assert!(session.timer_mut().delays.is_empty());
    assert_eq!(session.channel().pending(), 0);
}

#[tokio::test]
async fn test_overflow_is_dropped_and_channel_left_clean() {
    let mut controller = SimulatedController::new(0xFF).with_register(0x0107, 0x00B6);
    controller.trailing_noise = 100;
    let mut session =
        TransportSession::new(controller, RecordingTimer::default(), TimeoutPolicy::default());

    let request = build_request(0xFF, &PANEL_VOLTAGE);
    let response = session.send_and_receive(request.as_bytes()).await.unwrap();

    assert_eq!(response.len(), MAX_RESPONSE_BYTES);
    assert_eq!(&response.as_slice()[..7], read_response(0xFF, &[0x00B6]).as_slice());
    assert_eq!(session.channel().pending(), 0);
}

#[tokio::test]
async fn test_write_failure_is_reported() {
    let mut controller = SimulatedController::new(0xFF);
    controller.fail_writes = true;
    let mut session =
        TransportSession::new(controller, RecordingTimer::default(), TimeoutPolicy::default());

    let request = build_request(0xFF, &PANEL_VOLTAGE);
    let result = session.send_and_receive(request.as_bytes()).await;

    assert_eq!(result, Err(SimError::WriteFailed));
    assert!(session.timer_mut().delays.is_empty());
}

#[tokio::test]
async fn test_late_reply_is_discarded_before_next_request() {
    // The 0x0107 reply lands just after its wait bound expired.
    let controller = SimulatedController::new(0xFF)
        .with_register(0x0107, 0x00B6)
        .with_register(0x0108, 0x00FA)
        .delay_reply(0x0107, 12);
    let mut session =
        TransportSession::new(controller, RecordingTimer::default(), TimeoutPolicy::default());

    let request = build_request(0xFF, &PANEL_VOLTAGE);
    let response = session.send_and_receive(request.as_bytes()).await.unwrap();
    assert!(response.is_empty());

    let panel_current = RegisterGroup::read("panel_current", 0x0108, 1);
    let request = build_request(0xFF, &panel_current);
    let response = session.send_and_receive(request.as_bytes()).await.unwrap();

    assert_eq!(response.as_slice(), read_response(0xFF, &[0x00FA]).as_slice());
    assert_eq!(session.channel().pending(), 0);
    assert_eq!(session.timer_mut().delays, vec![5; 10]);
}
