//! Minimal abstraction for a half-duplex serial channel. Allows the library to
//! plug into various implementations (embedded UART driver, desktop serial
//! port, simulated controller in tests).
use futures_util::Future;

/// Contract to write request frames and pull response bytes.
///
/// Reads are non-blocking: the session decides how long to wait by polling
/// [`available`](SerialChannel::available) between timer sleeps.
pub trait SerialChannel {
    type Error: core::fmt::Debug;
    /// Write the whole frame. Asynchronous to accommodate DMA/interrupt drivers.
    fn write<'a>(
        &'a mut self,
        bytes: &'a [u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
    /// Number of bytes currently buffered by the receiver.
    fn available(&mut self) -> usize;
    /// Pop one buffered byte, `None` when the receive buffer is empty.
    fn read(&mut self) -> Option<u8>;
}
