//! One request/response exchange at a time over a half-duplex serial channel.
//!
//! The session writes a frame, then waits in bounded steps for the first
//! response byte. As soon as one is available it drains everything the
//! receiver holds, without further waiting: controllers answer in a single
//! burst, and callers reject short frames through the codec.
//!
//! Bytes pending before the write belong to an earlier exchange (a reply that
//! arrived after its wait bound) and are discarded.
use crate::core::ResponseBuffer;
use crate::protocol::transport::traits::{rtu_timer::RtuTimer, serial_channel::SerialChannel};
use crate::protocol::transport::TimeoutPolicy;

/// Owns the serial channel and the timer used by the wait loop.
pub struct TransportSession<S: SerialChannel, T: RtuTimer> {
    channel: S,
    timer: T,
    policy: TimeoutPolicy,
}

impl<S: SerialChannel, T: RtuTimer> TransportSession<S, T> {
    /// Build a session with the given wait bound.
    pub fn new(channel: S, timer: T, policy: TimeoutPolicy) -> Self {
        Self {
            channel,
            timer,
            policy,
        }
    }

    /// Current wait bound.
    pub fn policy(&self) -> TimeoutPolicy {
        self.policy
    }

    /// Borrow the underlying channel.
    pub fn channel(&self) -> &S {
        &self.channel
    }

    /// Mutable access to the timer, shared with the node scheduler.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Discard stale input, write `frame`, then collect the response.
    ///
    /// Returns an empty buffer when no byte arrived after
    /// `policy.max_checks` sleeps of `policy.check_interval_ms`. A timeout is
    /// a normal outcome; only channel errors are reported as `Err`.
    pub async fn send_and_receive(&mut self, frame: &[u8]) -> Result<ResponseBuffer, S::Error> {
        let stale = self.discard_pending();
        if stale > 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Discarded {} stale bytes before request", stale);
        }

        self.channel.write(frame).await?;

        let mut response = ResponseBuffer::new();
        if !self.wait_for_data().await {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "No response after {} checks of {} ms",
                self.policy.max_checks,
                self.policy.check_interval_ms
            );
            return Ok(response);
        }

        self.drain_into(&mut response);
        Ok(response)
    }

    /// Poll for a first byte, sleeping between checks. `true` once data is pending.
    async fn wait_for_data(&mut self) -> bool {
        for _ in 0..self.policy.max_checks {
            if self.channel.available() > 0 {
                return true;
            }
            self.timer.delay_ms(self.policy.check_interval_ms).await;
        }
        self.channel.available() > 0
    }

    /// Read and drop every pending byte. Returns how many were dropped.
    fn discard_pending(&mut self) -> usize {
        let mut dropped = 0usize;
        while self.channel.available() > 0 {
            if self.channel.read().is_none() {
                break;
            }
            dropped += 1;
        }
        dropped
    }

    /// Move every buffered byte into `response`; overflow is read and dropped.
    fn drain_into(&mut self, response: &mut ResponseBuffer) {
        let mut dropped = 0usize;
        while self.channel.available() > 0 {
            let Some(byte) = self.channel.read() else {
                break;
            };
            if !response.push(byte) {
                dropped += 1;
            }
        }

        if dropped > 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Response exceeded {} bytes, dropped {}",
                crate::core::MAX_RESPONSE_BYTES,
                dropped
            );
        }
    }
}
