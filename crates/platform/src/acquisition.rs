//! Acquisition abstraction: samples, buffered sinks and trigger sources
//!
//! These are the boundaries between an ADC driver and the rest of the
//! system. The driver produces [`Sample`]s on each trigger and hands them to
//! a [`SampleSink`]; it acknowledges every trigger through
//! [`TriggerSource::notify_done`], whether the read succeeded or not.

/// One conversion result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Channel index the converter was multiplexed to.
    pub channel: u8,
    /// Raw two's complement conversion code.
    pub value: i16,
    /// Monotonic host timestamp at acquisition, in microseconds.
    pub timestamp_us: u64,
}

/// Buffered streaming sink.
///
/// Back-pressure is the sink's business: a full sink decides whether to drop
/// the new sample, evict an old one, or count the overflow. The producer
/// never waits on it.
pub trait SampleSink {
    /// Push one sample.
    fn push(&mut self, sample: Sample);
}

/// External "sample now" event source.
pub trait TriggerSource {
    /// Acknowledge that the acquisition for the last fire has finished.
    ///
    /// Must be called exactly once per fire, including when the read failed.
    fn notify_done(&self);
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn push(&mut self, sample: Sample) {
        (**self).push(sample);
    }
}

impl<T: TriggerSource + ?Sized> TriggerSource for &T {
    fn notify_done(&self) {
        (**self).notify_done();
    }
}

/// Bounded FIFO sink: when full, the oldest sample is evicted.
impl<const N: usize> SampleSink for heapless::Deque<Sample, N> {
    fn push(&mut self, sample: Sample) {
        if self.is_full() {
            let _ = self.pop_front();
        }
        // Cannot fail: a slot was freed above when the deque was full.
        let _ = self.push_back(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: i16) -> Sample {
        Sample {
            channel: 0,
            value,
            timestamp_us: 0,
        }
    }

    #[test]
    fn deque_sink_keeps_newest_on_overflow() {
        let mut sink: heapless::Deque<Sample, 2> = heapless::Deque::new();
        sink.push(sample(1));
        sink.push(sample(2));
        sink.push(sample(3));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.pop_front().map(|s| s.value), Some(2));
        assert_eq!(sink.pop_front().map(|s| s.value), Some(3));
    }

    #[test]
    fn mutable_reference_forwards_to_sink() {
        let mut sink: heapless::Deque<Sample, 4> = heapless::Deque::new();
        {
            let mut by_ref = &mut sink;
            SampleSink::push(&mut by_ref, sample(7));
        }
        assert_eq!(sink.len(), 1);
    }
}
