//! Register poller: one bounded round trip per register group of the
//! configured dialect, decoded values written into the caller's snapshot.
//!
//! A failed group (timeout, CRC, malformed or exception frame, channel error)
//! leaves its fields untouched and the cycle moves on. Nothing is retried
//! within or across cycles.
pub mod dialect;
pub mod downlink;

use crate::core::ResponseBuffer;
use crate::error::PollError;
use crate::protocol::rtu::{
    frame::{build_request, parse_response},
    RegisterGroup,
};
#[cfg(feature = "defmt")]
use crate::protocol::{status::ErrorCategory, telemetry::SnapshotField};
use crate::protocol::telemetry::TelemetrySnapshot;
use crate::protocol::transport::session::TransportSession;
use crate::protocol::transport::traits::{rtu_timer::RtuTimer, serial_channel::SerialChannel};
use dialect::{AnyDialect, Dialect};
use downlink::{DownlinkCommand, DownlinkOutcome};

//==================================================================================POLL_RESULT
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Set of group indices within a dialect's group table.
pub struct GroupSet(u32);

impl GroupSet {
    /// Largest group table a set can describe.
    pub const CAPACITY: usize = 32;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Mark `index`; indices beyond [`Self::CAPACITY`] are ignored.
    pub fn insert(&mut self, index: usize) {
        if index < Self::CAPACITY {
            self.0 |= 1 << index;
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < Self::CAPACITY && self.0 & (1 << index) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::CAPACITY).filter(move |idx| self.contains(*idx))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Outcome of one poll cycle.
pub struct PollResult {
    pub completed_groups: GroupSet,
    pub failed_groups: GroupSet,
}

impl PollResult {
    /// Every group answered.
    pub fn is_complete(&self) -> bool {
        self.failed_groups.is_empty()
    }
}

//==================================================================================REGISTER_POLLER
/// Drives the transport session through the frame codec for each group.
pub struct RegisterPoller<S: SerialChannel, T: RtuTimer, D: Dialect = AnyDialect> {
    session: TransportSession<S, T>,
    dialect: D,
    slave: u8,
    /// A downlink was handled since the last cycle.
    pending_downlink: bool,
}

impl<S: SerialChannel, T: RtuTimer, D: Dialect> RegisterPoller<S, T, D> {
    pub fn new(session: TransportSession<S, T>, dialect: D, slave: u8) -> Self {
        Self {
            session,
            dialect,
            slave,
            pending_downlink: false,
        }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn slave(&self) -> u8 {
        self.slave
    }

    pub fn session(&self) -> &TransportSession<S, T> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TransportSession<S, T> {
        &mut self.session
    }

    /// Downlink flag waiting for the next cycle.
    pub fn pending_downlink(&self) -> bool {
        self.pending_downlink
    }

    /// Poll every group once and update `snapshot` with what answered.
    pub async fn poll_cycle(&mut self, snapshot: &mut TelemetrySnapshot) -> PollResult {
        let mut result = PollResult::default();

        if self.pending_downlink {
            snapshot.received_downlink = true;
            self.pending_downlink = false;
        }

        let groups = self.dialect.groups();
        for (index, group) in groups.iter().enumerate() {
            match self.poll_group(group, snapshot).await {
                Ok(()) => result.completed_groups.insert(index),
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "Group {} ({=u16:#x}) failed: {}",
                        group.name,
                        group.address,
                        defmt::Debug2Format(&_err)
                    );
                    result.failed_groups.insert(index);
                }
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Poll cycle done: {} ok, {} failed",
            result.completed_groups.len(),
            result.failed_groups.len()
        );
        #[cfg(feature = "defmt")]
        {
            for field in SnapshotField::ALL {
                defmt::debug!(
                    "  {}: {} {}",
                    field.name(),
                    snapshot.reading(field),
                    field.unit().unwrap_or("")
                );
            }
            defmt::debug!("  Status: {}", ErrorCategory::decode(snapshot.error_status));
        }
        result
    }

    /// One round trip for `group`; on success the dialect writes the values.
    pub async fn poll_group(
        &mut self,
        group: &RegisterGroup,
        snapshot: &mut TelemetrySnapshot,
    ) -> Result<(), PollError<S::Error>> {
        let response = self.exchange(group).await?;
        let frame = parse_response(response.as_slice(), self.slave, group)?;
        self.dialect.apply(group, &frame, snapshot);
        Ok(())
    }

    /// Match the opcode and issue the corresponding register write.
    ///
    /// The pending received-downlink flag is raised whatever the opcode, so
    /// the next controller frame reports that a downlink arrived.
    pub async fn handle_downlink(&mut self, bytes: &[u8]) -> DownlinkOutcome<S::Error> {
        self.pending_downlink = true;

        let Some(command) = DownlinkCommand::parse(bytes) else {
            #[cfg(feature = "defmt")]
            defmt::info!("Unrecognized downlink opcode");
            return DownlinkOutcome::Unrecognized;
        };

        #[cfg(feature = "defmt")]
        defmt::info!("Downlink command {}", command);

        let group = command.group();
        let outcome = match self.exchange(group).await {
            Ok(response) => parse_response(response.as_slice(), self.slave, group)
                .map(|_| ())
                .map_err(PollError::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => DownlinkOutcome::Applied(command),
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Downlink command {} not confirmed", command);
                DownlinkOutcome::Failed(command, err)
            }
        }
    }

    /// Send the request for `group`; an empty answer is a timeout.
    async fn exchange(
        &mut self,
        group: &RegisterGroup,
    ) -> Result<ResponseBuffer, PollError<S::Error>> {
        let request = build_request(self.slave, group);
        let response = self
            .session
            .send_and_receive(request.as_bytes())
            .await
            .map_err(PollError::Channel)?;
        if response.is_empty() {
            return Err(PollError::Timeout);
        }
        Ok(response)
    }
}
