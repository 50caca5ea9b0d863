//! Periodic telemetry node.
//!
//! Each tick packs the tracker frame from the node's own sensors, polls the
//! charge controller, packs the controller frame and hands both to the radio
//! through [`UplinkSink`]. The node also keeps the radio bookkeeping the
//! firmware needs:
//!
//! * a "TX in progress" flag that makes ticks skip while a frame is in flight;
//! * a consecutive send-failure counter that asks for a reset at a threshold;
//! * the downlink entry point forwarding remote commands to the poller.
//!
//! Radio events reach [`TelemetryNode::drive`] through a pre-allocated
//! [`embassy_sync::channel::Channel`]; the library performs no allocation.
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use futures_util::{future::select, future::Either, pin_mut, Future};

use crate::config::NodeConfig;
use crate::core::MAX_PAYLOAD_BYTES;
use crate::error::SerializationError;
use crate::infra::codec::engine;
use crate::protocol::poller::{
    dialect::{AnyDialect, Dialect},
    downlink::DownlinkOutcome,
    PollResult, RegisterPoller,
};
use crate::protocol::telemetry::{EnvironmentReadings, TelemetrySnapshot, TrackerLayout};
use crate::protocol::transport::session::TransportSession;
use crate::protocol::transport::traits::{rtu_timer::RtuTimer, serial_channel::SerialChannel};

/// Largest downlink payload kept by a [`DownlinkFrame`].
pub const MAX_DOWNLINK_BYTES: usize = MAX_PAYLOAD_BYTES;

//==================================================================================COLLABORATORS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Answer of the radio stack to a send request.
pub enum UplinkStatus {
    /// Accepted; a transmission is now in flight.
    Queued,
    /// Radio busy (duty cycle, join in progress); frame dropped.
    Busy,
    /// Payload refused, typically too large for the current data rate.
    Rejected,
}

/// Radio stack seen from the node.
pub trait UplinkSink {
    /// Queue `payload` for transmission.
    fn send<'a>(&'a mut self, payload: &'a [u8]) -> impl Future<Output = UplinkStatus> + 'a;
}

/// Node-side sensors sampled at every tick.
pub trait SensorSource {
    fn readings(&mut self) -> EnvironmentReadings;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Downlink payload with the port it arrived on.
pub struct DownlinkFrame {
    pub port: u8,
    len: usize,
    data: [u8; MAX_DOWNLINK_BYTES],
}

impl DownlinkFrame {
    /// Copy `payload`; bytes beyond [`MAX_DOWNLINK_BYTES`] are dropped.
    pub fn new(port: u8, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_DOWNLINK_BYTES);
        let mut data = [0u8; MAX_DOWNLINK_BYTES];
        data[..len].copy_from_slice(&payload[..len]);
        Self { port, len, data }
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Events pushed by the radio stack.
pub enum NodeEvent {
    /// Payload received from the network server.
    Downlink(DownlinkFrame),
    /// The in-flight transmission ended.
    TxFinished { acked: bool },
}

//==================================================================================OUTCOMES
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Result of one tick.
pub enum TickOutcome {
    /// A transmission was still in flight; nothing was sampled or sent.
    Skipped,
    Sent {
        tracker: UplinkStatus,
        controller: UplinkStatus,
        poll: PollResult,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What the firmware should do after a transmission ended.
pub enum TxVerdict {
    Continue,
    /// Too many consecutive unacknowledged uplinks.
    ResetRequired,
}

//==================================================================================TELEMETRY_NODE
pub struct TelemetryNode<S, T, U, D = AnyDialect>
where
    S: SerialChannel,
    T: RtuTimer,
    U: UplinkSink,
    D: Dialect,
{
    poller: RegisterPoller<S, T, D>,
    uplink: U,
    snapshot: TelemetrySnapshot,
    tracker: TrackerLayout,
    send_interval_ms: u32,
    command_port: u8,
    max_send_failures: u8,
    tx_busy: bool,
    send_failures: u8,
}

impl<S, T, U> TelemetryNode<S, T, U, AnyDialect>
where
    S: SerialChannel,
    T: RtuTimer,
    U: UplinkSink,
{
    /// Assemble session, poller and node from a configuration.
    pub fn from_config(channel: S, timer: T, uplink: U, config: &NodeConfig) -> Self {
        let session = TransportSession::new(channel, timer, config.timeout);
        let poller = RegisterPoller::new(
            session,
            AnyDialect::from(config.dialect),
            config.slave_address,
        );
        Self::new(poller, uplink, config)
    }
}

impl<S, T, U, D> TelemetryNode<S, T, U, D>
where
    S: SerialChannel,
    T: RtuTimer,
    U: UplinkSink,
    D: Dialect,
{
    pub fn new(poller: RegisterPoller<S, T, D>, uplink: U, config: &NodeConfig) -> Self {
        Self {
            poller,
            uplink,
            snapshot: TelemetrySnapshot::new(),
            tracker: config.tracker,
            send_interval_ms: config.send_interval_ms,
            command_port: config.command_port,
            max_send_failures: config.max_send_failures.max(1),
            tx_busy: false,
            send_failures: 0,
        }
    }

    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    pub fn poller(&self) -> &RegisterPoller<S, T, D> {
        &self.poller
    }

    pub fn poller_mut(&mut self) -> &mut RegisterPoller<S, T, D> {
        &mut self.poller
    }

    pub fn uplink(&self) -> &U {
        &self.uplink
    }

    /// A transmission is in flight.
    pub fn tx_busy(&self) -> bool {
        self.tx_busy
    }

    /// Consecutive unacknowledged uplinks.
    pub fn send_failures(&self) -> u8 {
        self.send_failures
    }

    /// Sample, poll and send both frames, unless a transmission is in flight.
    pub async fn tick(
        &mut self,
        readings: &EnvironmentReadings,
    ) -> Result<TickOutcome, SerializationError> {
        if self.tx_busy {
            #[cfg(feature = "defmt")]
            defmt::debug!("TX in progress, tick skipped");
            return Ok(TickOutcome::Skipped);
        }

        let mut payload = [0u8; MAX_PAYLOAD_BYTES];

        let len = engine::serialize(readings, &mut payload, self.tracker.schema())?;
        let tracker = self.send(&payload[..len]).await;

        let poll = self.poller.poll_cycle(&mut self.snapshot).await;
        let schema = self.poller.dialect().uplink_schema();
        let len = self.snapshot.take_uplink(schema, &mut payload)?;
        let controller = self.send(&payload[..len]).await;

        Ok(TickOutcome::Sent {
            tracker,
            controller,
            poll,
        })
    }

    /// Account for the end of a transmission.
    pub fn on_tx_finished(&mut self, acked: bool) -> TxVerdict {
        self.tx_busy = false;

        if acked {
            self.send_failures = 0;
            return TxVerdict::Continue;
        }

        self.send_failures = self.send_failures.saturating_add(1);
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "Uplink not acknowledged ({}/{})",
            self.send_failures,
            self.max_send_failures
        );

        if self.send_failures >= self.max_send_failures {
            #[cfg(feature = "defmt")]
            defmt::error!("Send failure threshold reached, reset required");
            return TxVerdict::ResetRequired;
        }
        TxVerdict::Continue
    }

    /// Handle a downlink: any downlink ends the in-flight transmission, and
    /// frames on the command port are forwarded to the poller.
    pub async fn on_downlink(
        &mut self,
        frame: &DownlinkFrame,
    ) -> Option<DownlinkOutcome<S::Error>> {
        self.tx_busy = false;

        if frame.port != self.command_port {
            #[cfg(feature = "defmt")]
            defmt::debug!("Downlink on port {} ignored", frame.port);
            return None;
        }
        Some(self.poller.handle_downlink(frame.payload()).await)
    }

    /// Run the node forever: tick, then wait for the send interval while
    /// serving radio events.
    ///
    /// `interval` paces the ticks; the session keeps its own timer for the
    /// response wait loop. Returns `Ok(())` when a reset is required.
    pub async fn drive<I, Src, M, const N: usize>(
        &mut self,
        interval: &mut I,
        sensors: &mut Src,
        events: &Channel<M, NodeEvent, N>,
    ) -> Result<(), SerializationError>
    where
        I: RtuTimer,
        Src: SensorSource,
        M: RawMutex,
    {
        loop {
            let readings = sensors.readings();
            self.tick(&readings).await?;

            let delay = interval.delay_ms(self.send_interval_ms);
            pin_mut!(delay);

            loop {
                let receive = events.receive();
                pin_mut!(receive);

                match select(delay.as_mut(), receive).await {
                    Either::Left(((), _)) => break,
                    Either::Right((NodeEvent::Downlink(frame), _)) => {
                        self.on_downlink(&frame).await;
                    }
                    Either::Right((NodeEvent::TxFinished { acked }, _)) => {
                        if self.on_tx_finished(acked) == TxVerdict::ResetRequired {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    async fn send(&mut self, payload: &[u8]) -> UplinkStatus {
        let status = self.uplink.send(payload).await;
        match status {
            UplinkStatus::Queued => self.tx_busy = true,
            UplinkStatus::Busy | UplinkStatus::Rejected => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Uplink of {} bytes not queued: {}", payload.len(), status);
            }
        }
        status
    }
}
