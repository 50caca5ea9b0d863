//! Asynchronous timer abstraction providing the sleeps of the response wait
//! loop and the node's send interval.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait RtuTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}

/// [`RtuTimer`] backed by the `embassy-time` driver of the target.
#[cfg(feature = "embassy")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyTimer;

#[cfg(feature = "embassy")]
impl RtuTimer for EmbassyTimer {
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a {
        embassy_time::Timer::after(embassy_time::Duration::from_millis(millis as u64))
    }
}
