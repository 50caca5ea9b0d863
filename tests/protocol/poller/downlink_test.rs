//! Downlink dispatch tests: load switch writes, echo checks and the received flag.
mod helpers {
    include!("../../helpers/mod.rs");
}

use helpers::{RecordingTimer, SimulatedController};
use rtu_telemetry::error::PollError;
use rtu_telemetry::protocol::{
    poller::{
        dialect::{AnyDialect, DialectKind},
        downlink::{DownlinkCommand, DownlinkOutcome, LOAD_SWITCH_REGISTER},
        RegisterPoller,
    },
    telemetry::TelemetrySnapshot,
    transport::{session::TransportSession, TimeoutPolicy},
};

fn poller(controller: SimulatedController) -> RegisterPoller<SimulatedController, RecordingTimer> {
    let session =
        TransportSession::new(controller, RecordingTimer::default(), TimeoutPolicy::default());
    RegisterPoller::new(session, AnyDialect::from(DialectKind::Legacy), 0xFF)
}

#[tokio::test]
async fn test_load_on_writes_register() {
    let mut poller = poller(SimulatedController::new(0xFF));

    let outcome = poller.handle_downlink(&[0x00, 0x69]).await;

    assert!(matches!(outcome, DownlinkOutcome::Applied(DownlinkCommand::LoadOn)));
    let controller = poller.session().channel();
    assert_eq!(
        controller.requests,
        vec![vec![0xFF, 0x06, 0x01, 0x0A, 0x00, 0x01, 0x7C, 0x2A]]
    );
    assert_eq!(controller.register(LOAD_SWITCH_REGISTER), 1);
    assert!(poller.pending_downlink());
}

#[tokio::test]
async fn test_load_off_writes_register() {
    let controller = SimulatedController::new(0xFF).with_register(LOAD_SWITCH_REGISTER, 1);
    let mut poller = poller(controller);

    let outcome = poller.handle_downlink(&[0x00, 0x70]).await;

    assert!(outcome.is_applied());
    assert_eq!(outcome.command(), Some(DownlinkCommand::LoadOff));
    let controller = poller.session().channel();
    assert_eq!(
        controller.requests,
        vec![vec![0xFF, 0x06, 0x01, 0x0A, 0x00, 0x00, 0xBD, 0xEA]]
    );
    assert_eq!(controller.register(LOAD_SWITCH_REGISTER), 0);
}

#[tokio::test]
async fn test_unknown_opcode_sends_nothing_but_sets_flag() {
    let mut poller = poller(SimulatedController::new(0xFF));

    let outcome = poller.handle_downlink(&[0x01, 0x69]).await;
    assert!(matches!(outcome, DownlinkOutcome::Unrecognized));
    assert!(poller.session().channel().requests.is_empty());
    assert!(poller.pending_downlink());

    let short = poller.handle_downlink(&[0x00]).await;
    assert!(matches!(short, DownlinkOutcome::Unrecognized));
}

#[tokio::test]
async fn test_flag_is_copied_into_next_cycle_once() {
    let mut poller = poller(SimulatedController::new(0xFF));
    let mut snapshot = TelemetrySnapshot::new();

    poller.handle_downlink(&[0xDE, 0xAD]).await;
    poller.poll_cycle(&mut snapshot).await;
    assert!(snapshot.received_downlink);
    assert!(!poller.pending_downlink());

    snapshot.received_downlink = false;
    poller.poll_cycle(&mut snapshot).await;
    assert!(!snapshot.received_downlink);
}

#[tokio::test]
async fn test_unanswered_write_is_reported() {
    let controller = SimulatedController::new(0xFF).silence(LOAD_SWITCH_REGISTER);
    let mut poller = poller(controller);

    let outcome = poller.handle_downlink(&[0x00, 0x69]).await;

    assert!(matches!(
        outcome,
        DownlinkOutcome::Failed(DownlinkCommand::LoadOn, PollError::Timeout)
    ));
    assert!(poller.pending_downlink());
}

#[tokio::test]
async fn test_rejected_write_is_reported() {
    let controller = SimulatedController::new(0xFF).reject(LOAD_SWITCH_REGISTER);
    let mut poller = poller(controller);

    let outcome = poller.handle_downlink(&[0x00, 0x70]).await;

    assert!(matches!(
        outcome,
        DownlinkOutcome::Failed(DownlinkCommand::LoadOff, PollError::Frame(_))
    ));
}
