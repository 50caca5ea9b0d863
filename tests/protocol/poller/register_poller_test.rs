//! Register poller tests: full cycles of both dialects and per-group failure isolation.
mod helpers {
    include!("../../helpers/mod.rs");
}

use helpers::{RecordingTimer, SimError, SimulatedController};
use rtu_telemetry::protocol::{
    poller::{
        dialect::{AnyDialect, Dialect, DialectKind},
        RegisterPoller,
    },
    rtu::frame::build_request,
    telemetry::{SnapshotField, TelemetrySnapshot},
    transport::{session::TransportSession, TimeoutPolicy},
};

/// Controller answering every legacy register.
fn legacy_controller() -> SimulatedController {
    SimulatedController::new(0xFF)
        .with_register(0x0107, 182)
        .with_register(0x0108, 250)
        .with_register(0x0109, 45)
        .with_register(0x0101, 131)
        .with_register(0x0102, 310)
        .with_register(0x0100, 87)
        .with_register(0x0104, 130)
        .with_register(0x0105, 12)
        .with_register(0x0106, 2)
        .with_register(0x0120, 0x8002)
        .with_registers(0x0121, &[0x0004, 0x0010])
}

fn poller(
    controller: SimulatedController,
    kind: DialectKind,
) -> RegisterPoller<SimulatedController, RecordingTimer> {
    let session =
        TransportSession::new(controller, RecordingTimer::default(), TimeoutPolicy::default());
    RegisterPoller::new(session, AnyDialect::from(kind), 0xFF)
}

#[tokio::test]
async fn test_legacy_cycle_fills_every_field() {
    let mut poller = poller(legacy_controller(), DialectKind::Legacy);
    let mut snapshot = TelemetrySnapshot::new();

    let result = poller.poll_cycle(&mut snapshot).await;

    assert!(result.is_complete());
    assert_eq!(result.completed_groups.len(), 11);
    assert_eq!(snapshot.panel_voltage, 182);
    assert_eq!(snapshot.panel_current, 250);
    assert_eq!(snapshot.panel_power, 45);
    assert_eq!(snapshot.battery_voltage, 131);
    assert_eq!(snapshot.battery_current, 310);
    assert_eq!(snapshot.battery_percent, 87);
    assert_eq!(snapshot.load_voltage, 130);
    assert_eq!(snapshot.load_current, 12);
    assert_eq!(snapshot.load_power, 2);
    assert_eq!(snapshot.load_status, 0x8002);
    assert_eq!(snapshot.error_status, 0x0004);
    assert_eq!(snapshot.error_status_2, 0);
}

#[tokio::test]
async fn test_requests_follow_group_order() {
    let mut poller = poller(legacy_controller(), DialectKind::Legacy);
    let mut snapshot = TelemetrySnapshot::new();
    poller.poll_cycle(&mut snapshot).await;

    let expected: Vec<Vec<u8>> = poller
        .dialect()
        .groups()
        .iter()
        .map(|group| build_request(0xFF, group).as_bytes().to_vec())
        .collect();
    assert_eq!(poller.session().channel().requests, expected);
}

#[tokio::test]
async fn test_timed_out_group_keeps_stale_value() {
    // Third group (panel power) never answers; the others still update.
    let controller = legacy_controller().silence(0x0109);
    let mut poller = poller(controller, DialectKind::Legacy);
    let mut snapshot = TelemetrySnapshot {
        panel_power: 77,
        ..TelemetrySnapshot::new()
    };

    let result = poller.poll_cycle(&mut snapshot).await;

    assert_eq!(result.failed_groups.iter().collect::<Vec<_>>(), vec![2]);
    assert_eq!(result.completed_groups.len(), 10);
    assert!(result.completed_groups.contains(0));
    assert!(result.completed_groups.contains(1));
    assert!(result.completed_groups.contains(3));
    assert_eq!(snapshot.panel_power, 77);
    assert_eq!(snapshot.panel_voltage, 182);
    assert_eq!(snapshot.battery_voltage, 131);
    assert_eq!(poller.session_mut().timer_mut().delays.len(), 10);
}

#[tokio::test]
async fn test_late_reply_does_not_shift_later_groups() {
    // Panel power answers only after its wait bound; the next group must not consume it.
    let controller = legacy_controller().delay_reply(0x0109, 12);
    let mut poller = poller(controller, DialectKind::Legacy);
    let mut snapshot = TelemetrySnapshot {
        panel_power: 77,
        ..TelemetrySnapshot::new()
    };

    let result = poller.poll_cycle(&mut snapshot).await;

    assert_eq!(result.failed_groups.iter().collect::<Vec<_>>(), vec![2]);
    assert_eq!(snapshot.panel_power, 77);
    assert_eq!(snapshot.battery_voltage, 131);
    assert_eq!(snapshot.battery_current, 310);
    assert_eq!(snapshot.battery_percent, 87);
    assert_eq!(snapshot.load_voltage, 130);
    assert_eq!(snapshot.load_current, 12);
    assert_eq!(snapshot.load_power, 2);
    assert_eq!(snapshot.load_status, 0x8002);
    assert_eq!(snapshot.error_status, 0x0004);
    assert_eq!(poller.session().channel().pending(), 0);
}

#[tokio::test]
async fn test_corrupt_and_exception_frames_are_discarded() {
    let controller = legacy_controller().corrupt(0x0101).reject(0x0100);
    let mut poller = poller(controller, DialectKind::Legacy);
    let mut snapshot = TelemetrySnapshot {
        battery_voltage: 120,
        battery_percent: 50,
        ..TelemetrySnapshot::new()
    };

    let result = poller.poll_cycle(&mut snapshot).await;

    assert_eq!(result.failed_groups.iter().collect::<Vec<_>>(), vec![3, 5]);
    assert_eq!(snapshot.battery_voltage, 120);
    assert_eq!(snapshot.battery_percent, 50);
    assert_eq!(snapshot.battery_current, 310);
}

#[tokio::test]
async fn test_channel_error_fails_every_group() {
    let mut controller = legacy_controller();
    controller.fail_writes = true;
    let mut poller = poller(controller, DialectKind::Legacy);
    let mut snapshot = TelemetrySnapshot::new();

    let result = poller.poll_cycle(&mut snapshot).await;

    assert!(result.completed_groups.is_empty());
    assert_eq!(result.failed_groups.len(), 11);
    assert_eq!(snapshot, TelemetrySnapshot::new());

    let group = poller.dialect().groups()[0];
    let err = poller.poll_group(&group, &mut snapshot).await.unwrap_err();
    assert!(matches!(
        err,
        rtu_telemetry::error::PollError::Channel(SimError::WriteFailed)
    ));
}

#[tokio::test]
async fn test_holding_block_cycle() {
    let controller = SimulatedController::new(0xFF)
        .with_registers(0x0100, &[80, 132, 288, 0x1985, 131, 16, 2, 200, 160, 32])
        .with_registers(0x0121, &[0x0000, 0x0004]);
    let mut poller = poller(controller, DialectKind::HoldingBlock);
    let mut snapshot = TelemetrySnapshot::new();

    let result = poller.poll_cycle(&mut snapshot).await;

    assert!(result.is_complete());
    assert_eq!(result.completed_groups.len(), 2);
    assert_eq!(snapshot.battery_capacity, 80);
    assert_eq!(snapshot.controller_temperature, 0x19);
    assert_eq!(snapshot.battery_temperature, 0x85);
    assert_eq!(snapshot.reading(SnapshotField::BatteryTemperature), -5.0);
    assert_eq!(snapshot.panel_power, 32);
    assert_eq!(snapshot.error_status_2, 0x0004);
    assert_eq!(poller.session().channel().requests.len(), 2);
}

#[tokio::test]
async fn test_other_slave_address_is_ignored() {
    // The controller only answers its own address, so every group times out.
    let controller = SimulatedController::new(0x01).with_registers(0x0100, &[0; 10]);
    let mut poller = poller(controller, DialectKind::HoldingBlock);
    let mut snapshot = TelemetrySnapshot::new();

    let result = poller.poll_cycle(&mut snapshot).await;

    assert_eq!(result.failed_groups.len(), 2);
    assert_eq!(poller.session_mut().timer_mut().delays.len(), 20);
}
