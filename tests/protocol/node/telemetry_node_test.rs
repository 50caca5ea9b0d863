//! Telemetry node tests: tick sequencing, TX busy skipping, failure counting and downlinks.
mod helpers {
    include!("../../helpers/mod.rs");
}

use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
use helpers::{FixedSensors, MockTimer, RecordingTimer, RecordingUplink, SimulatedController};
use rtu_telemetry::config::NodeConfig;
use rtu_telemetry::protocol::{
    node::{DownlinkFrame, NodeEvent, TelemetryNode, TickOutcome, TxVerdict, UplinkStatus},
    poller::{dialect::DialectKind, downlink::LOAD_SWITCH_REGISTER},
    telemetry::{schema::TRACKER_FULL_SCHEMA, EnvironmentReadings, GnssFix, TrackerLayout},
};
use tokio::time::{timeout, Duration};

type TestNode = TelemetryNode<SimulatedController, RecordingTimer, RecordingUplink>;

fn readings() -> EnvironmentReadings {
    EnvironmentReadings {
        battery_mv: 3300,
        humidity: 60.0,
        temperature: 20.0,
        gnss: None,
    }
}

fn controller() -> SimulatedController {
    SimulatedController::new(0xFF)
        .with_register(0x0107, 182)
        .with_register(0x0101, 131)
        .with_register(0x0100, 87)
        .with_register(0x0120, 0x8002)
        .with_registers(0x0121, &[0x0000, 0x0000])
}

fn node(config: &NodeConfig, uplink: RecordingUplink) -> TestNode {
    TelemetryNode::from_config(controller(), RecordingTimer::default(), uplink, config)
}

#[tokio::test]
async fn test_tick_sends_tracker_then_controller_frame() {
    let mut node = node(&NodeConfig::default(), RecordingUplink::default());

    let outcome = node.tick(&readings()).await.unwrap();

    match outcome {
        TickOutcome::Sent {
            tracker,
            controller,
            poll,
        } => {
            assert_eq!(tracker, UplinkStatus::Queued);
            assert_eq!(controller, UplinkStatus::Queued);
            assert!(poll.is_complete());
        }
        TickOutcome::Skipped => panic!("first tick must not be skipped"),
    }

    let sent = &node.uplink().sent;
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        vec![0x08, 0x02, 0x01, 0x4A, 0x07, 0x68, 0x78, 0x02, 0x67, 0x00, 0xC8]
    );
    assert_eq!(sent[1].len(), 25);
    assert_eq!(&sent[1][..4], &[0x0C, 0x02, 0x00, 0xB6]);
    assert_eq!(&sent[1][20..22], &[0x80, 0x02]);
    assert_eq!(sent[1][24], 0x00);
    assert!(node.tx_busy());
}

#[tokio::test]
async fn test_out_of_range_gnss_fix_is_clamped() {
    // A glitched fix must not cost the cycle: both frames still go out.
    let config = NodeConfig::default().with_tracker(TrackerLayout {
        gnss: true,
        environment: true,
    });
    let mut node = node(&config, RecordingUplink::default());
    let glitch = EnvironmentReadings {
        gnss: Some(GnssFix {
            latitude: f32::NAN,
            longitude: -1.0e9,
            altitude: 90_000.0,
        }),
        ..readings()
    };

    let outcome = node.tick(&glitch).await.unwrap();

    assert!(matches!(outcome, TickOutcome::Sent { .. }));
    assert!(!node.poller().session().channel().requests.is_empty());
    let sent = &node.uplink().sent;
    assert_eq!(sent.len(), 2);
    let tracker = &sent[0];
    assert_eq!(tracker.len(), TRACKER_FULL_SCHEMA.len());
    let at = |id: &str| TRACKER_FULL_SCHEMA.offset_of(id).unwrap();
    assert_eq!(&tracker[at("Latitude")..at("Latitude") + 3], &[0x00, 0x00, 0x00]);
    assert_eq!(&tracker[at("Longitude")..at("Longitude") + 3], &[0x80, 0x00, 0x00]);
    assert_eq!(&tracker[at("Altitude")..at("Altitude") + 3], &[0x7F, 0xFF, 0xFF]);
}

#[tokio::test]
async fn test_tick_skipped_while_tx_busy() {
    let mut node = node(&NodeConfig::default(), RecordingUplink::default());

    node.tick(&readings()).await.unwrap();
    let requests = node.poller().session().channel().requests.len();

    assert_eq!(node.tick(&readings()).await.unwrap(), TickOutcome::Skipped);
    assert_eq!(node.uplink().sent.len(), 2);
    assert_eq!(node.poller().session().channel().requests.len(), requests);

    assert_eq!(node.on_tx_finished(true), TxVerdict::Continue);
    assert!(!node.tx_busy());
    assert!(matches!(
        node.tick(&readings()).await.unwrap(),
        TickOutcome::Sent { .. }
    ));
}

#[tokio::test]
async fn test_busy_radio_does_not_mark_tx_in_flight() {
    let uplink = RecordingUplink::scripted(&[UplinkStatus::Busy, UplinkStatus::Rejected]);
    let mut node = node(&NodeConfig::default(), uplink);

    let outcome = node.tick(&readings()).await.unwrap();

    assert!(matches!(
        outcome,
        TickOutcome::Sent {
            tracker: UplinkStatus::Busy,
            controller: UplinkStatus::Rejected,
            ..
        }
    ));
    assert!(!node.tx_busy());
    assert!(node.uplink().sent.is_empty());
}

#[tokio::test]
async fn test_reset_requested_at_tenth_consecutive_nak() {
    let mut node = node(&NodeConfig::default(), RecordingUplink::default());

    for _ in 0..9 {
        assert_eq!(node.on_tx_finished(false), TxVerdict::Continue);
    }
    assert_eq!(node.send_failures(), 9);
    assert_eq!(node.on_tx_finished(false), TxVerdict::ResetRequired);
}

#[tokio::test]
async fn test_ack_clears_failure_counter() {
    let config = NodeConfig::default().with_max_send_failures(3);
    let mut node = node(&config, RecordingUplink::default());

    node.on_tx_finished(false);
    node.on_tx_finished(false);
    assert_eq!(node.on_tx_finished(true), TxVerdict::Continue);
    assert_eq!(node.send_failures(), 0);
    node.on_tx_finished(false);
    node.on_tx_finished(false);
    assert_eq!(node.on_tx_finished(false), TxVerdict::ResetRequired);
}

#[tokio::test]
async fn test_downlink_on_command_port_switches_load() {
    let mut node = node(&NodeConfig::default(), RecordingUplink::default());
    node.tick(&readings()).await.unwrap();
    assert!(node.tx_busy());

    let ignored = node.on_downlink(&DownlinkFrame::new(5, &[0x00, 0x69])).await;
    assert!(ignored.is_none());
    assert!(!node.tx_busy());
    assert_eq!(
        node.poller().session().channel().register(LOAD_SWITCH_REGISTER),
        0
    );

    let outcome = node
        .on_downlink(&DownlinkFrame::new(2, &[0x00, 0x69]))
        .await
        .unwrap();
    assert!(outcome.is_applied());
    assert_eq!(
        node.poller().session().channel().register(LOAD_SWITCH_REGISTER),
        1
    );

    // The next controller frame reports the downlink, the one after does not.
    node.tick(&readings()).await.unwrap();
    assert_eq!(node.uplink().sent[3][24], 0x01);
    node.on_tx_finished(true);
    node.tick(&readings()).await.unwrap();
    assert_eq!(node.uplink().sent[5][24], 0x00);
}

#[tokio::test]
async fn test_holding_block_node_sends_block_frame() {
    let config = NodeConfig::default().with_dialect(DialectKind::HoldingBlock);
    let controller = SimulatedController::new(0xFF)
        .with_registers(0x0100, &[80, 132, 288, 0x1914, 131, 16, 2, 200, 160, 32])
        .with_registers(0x0121, &[0x0000, 0x0004]);
    let mut node = TelemetryNode::from_config(
        controller,
        RecordingTimer::default(),
        RecordingUplink::default(),
        &config,
    );

    node.tick(&readings()).await.unwrap();

    let frame = &node.uplink().sent[1];
    assert_eq!(frame.len(), 29);
    assert_eq!(&frame[..4], &[0x0C, 0x03, 0x00, 0x50]);
    assert_eq!(&frame[26..28], &[0x00, 0x04]);
    assert_eq!(node.snapshot().battery_temperature, 0x14);
}

#[tokio::test]
async fn test_drive_serves_events_until_reset() {
    let mut node = node(&NodeConfig::default(), RecordingUplink::default());
    let events: Channel<NoopRawMutex, NodeEvent, 16> = Channel::new();

    events
        .try_send(NodeEvent::Downlink(DownlinkFrame::new(2, &[0x00, 0x69])))
        .unwrap();
    for _ in 0..10 {
        events.try_send(NodeEvent::TxFinished { acked: false }).unwrap();
    }

    let mut interval = MockTimer;
    let mut sensors = FixedSensors(readings());
    let result = timeout(
        Duration::from_secs(5),
        node.drive(&mut interval, &mut sensors, &events),
    )
    .await
    .expect("drive should stop at the reset threshold");

    assert!(result.is_ok());
    assert_eq!(node.uplink().sent.len(), 2);
    assert_eq!(node.send_failures(), 10);
    assert_eq!(
        node.poller().session().channel().register(LOAD_SWITCH_REGISTER),
        1
    );
}
