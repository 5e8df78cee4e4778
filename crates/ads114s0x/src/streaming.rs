//! Streaming plumbing around [`Ads114s0x::on_trigger`](crate::Ads114s0x::on_trigger)
//!
//! - [`ChannelSink`]: pushes samples into an embassy [`Channel`] without
//!   blocking the acquisition task.
//! - [`SoftwareTrigger`]: a "sample now" source fired from software (a
//!   timer task, a test, a GPIO interrupt handler).
//!
//! Typical acquisition task:
//!
//! ```ignore
//! loop {
//!     TRIGGER.wait().await;
//!     let _ = adc.on_trigger(&mut sink, &TRIGGER).await;
//! }
//! ```
//!
//! [`Channel`]: embassy_sync::channel::Channel

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embassy_sync::signal::Signal;
use platform::{Sample, SampleSink, TriggerSource};

/// [`SampleSink`] over an embassy channel sender.
///
/// Never waits: when the channel is full the sample is dropped and counted,
/// so a slow consumer cannot stall the trigger path.
pub struct ChannelSink<'ch, M: RawMutex, const N: usize> {
    sender: Sender<'ch, M, Sample, N>,
    dropped: u32,
}

impl<'ch, M: RawMutex, const N: usize> ChannelSink<'ch, M, N> {
    /// Wrap a channel sender.
    pub fn new(sender: Sender<'ch, M, Sample, N>) -> Self {
        Self { sender, dropped: 0 }
    }

    /// Samples lost to a full channel so far.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<M: RawMutex, const N: usize> SampleSink for ChannelSink<'_, M, N> {
    fn push(&mut self, sample: Sample) {
        if self.sender.try_send(sample).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("sample channel full, ch{} dropped", sample.channel);
        }
    }
}

/// Software trigger source.
///
/// [`fire`](Self::fire) wakes the task blocked in [`wait`](Self::wait);
/// fires that arrive before the task waits collapse into one.
/// [`TriggerSource::notify_done`] counts acknowledged triggers.
pub struct SoftwareTrigger<M: RawMutex> {
    fired: Signal<M, ()>,
    completed: AtomicU32,
}

impl<M: RawMutex> SoftwareTrigger<M> {
    /// Idle trigger; usable in a `static`.
    pub const fn new() -> Self {
        Self {
            fired: Signal::new(),
            completed: AtomicU32::new(0),
        }
    }

    /// Request one sample.
    pub fn fire(&self) {
        self.fired.signal(());
    }

    /// Wait for the next [`fire`](Self::fire).
    pub async fn wait(&self) {
        self.fired.wait().await;
    }

    /// A fire is pending and not yet consumed by [`wait`](Self::wait).
    pub fn is_pending(&self) -> bool {
        self.fired.signaled()
    }

    /// Triggers acknowledged by the driver so far.
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::Acquire)
    }
}

impl<M: RawMutex> Default for SoftwareTrigger<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> TriggerSource for SoftwareTrigger<M> {
    fn notify_done(&self) {
        self.completed.fetch_add(1, Ordering::AcqRel);
    }
}
