//! Property-based tests for the acquisition sinks.
//! Verifies invariants hold for ALL push sequences, not just fixed examples.

use platform::{Sample, SampleSink};

fn sample(value: i16) -> Sample {
    Sample {
        channel: 0,
        value,
        timestamp_us: 0,
    }
}

proptest::proptest! {
    /// A bounded deque sink never exceeds its capacity, whatever is pushed.
    #[test]
    fn deque_sink_never_exceeds_capacity(values in proptest::collection::vec(proptest::num::i16::ANY, 0..64)) {
        let mut sink: heapless::Deque<Sample, 8> = heapless::Deque::new();
        for v in &values {
            sink.push(sample(*v));
            assert!(sink.len() <= 8);
        }
        assert_eq!(sink.len(), values.len().min(8));
    }

    /// After overflow the sink holds exactly the newest samples, oldest first.
    #[test]
    fn deque_sink_keeps_newest_in_order(values in proptest::collection::vec(proptest::num::i16::ANY, 0..64)) {
        let mut sink: heapless::Deque<Sample, 8> = heapless::Deque::new();
        for v in &values {
            sink.push(sample(*v));
        }
        let kept: Vec<i16> = sink.iter().map(|s| s.value).collect();
        let skip = values.len().saturating_sub(8);
        assert_eq!(kept.as_slice(), values.get(skip..).unwrap_or(&[]));
    }
}
