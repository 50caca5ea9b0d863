//! Remote commands received over the radio and the register writes they map to.
use crate::error::PollError;
use crate::protocol::rtu::RegisterGroup;

/// Register switching the load output.
pub const LOAD_SWITCH_REGISTER: u16 = 0x010A;

/// Opcode switching the load on.
pub const LOAD_ON_OPCODE: [u8; 2] = [0x00, 0x69];
/// Opcode switching the load off.
pub const LOAD_OFF_OPCODE: [u8; 2] = [0x00, 0x70];

static LOAD_ON_GROUP: RegisterGroup =
    RegisterGroup::write("load_on", LOAD_SWITCH_REGISTER, 0x0001);
static LOAD_OFF_GROUP: RegisterGroup =
    RegisterGroup::write("load_off", LOAD_SWITCH_REGISTER, 0x0000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Commands understood by the node.
pub enum DownlinkCommand {
    LoadOn,
    LoadOff,
}

impl DownlinkCommand {
    /// Match the 2-byte opcode at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let opcode = bytes.get(..2)?;
        if opcode == LOAD_ON_OPCODE {
            Some(DownlinkCommand::LoadOn)
        } else if opcode == LOAD_OFF_OPCODE {
            Some(DownlinkCommand::LoadOff)
        } else {
            None
        }
    }

    /// Write request carrying out the command.
    pub fn group(self) -> &'static RegisterGroup {
        match self {
            DownlinkCommand::LoadOn => &LOAD_ON_GROUP,
            DownlinkCommand::LoadOff => &LOAD_OFF_GROUP,
        }
    }
}

#[derive(Debug)]
/// Result of [`RegisterPoller::handle_downlink`](super::RegisterPoller::handle_downlink).
pub enum DownlinkOutcome<E: core::fmt::Debug> {
    /// Opcode not recognised; nothing was sent.
    Unrecognized,
    /// Write acknowledged by a matching echo.
    Applied(DownlinkCommand),
    /// Write sent but not confirmed.
    Failed(DownlinkCommand, PollError<E>),
}

impl<E: core::fmt::Debug> DownlinkOutcome<E> {
    /// Command decoded from the opcode, if any.
    pub fn command(&self) -> Option<DownlinkCommand> {
        match self {
            DownlinkOutcome::Unrecognized => None,
            DownlinkOutcome::Applied(cmd) | DownlinkOutcome::Failed(cmd, _) => Some(*cmd),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, DownlinkOutcome::Applied(_))
    }
}
