//! Concurrency integration tests.
//!
//! One-shot reads and triggered acquisitions run on separate OS threads
//! against one device guarded by a `CriticalSectionRawMutex`. The simulated
//! chip yields inside every SPI operation, so any frame the driver failed to
//! serialize would show up interleaved in its transaction log.
//!
//! Run with: cargo test -p ads114s0x --test concurrency

// Integration test file -- intentional test patterns permitted.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
)]

use ads114s0x::{
    Ads114s0x, DeviceId, DriverConfig, NoResetPin, Sample, SimulatedAds114s0x, SoftwareTrigger,
};
use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal_mock::eh1::delay::NoopDelay;

type SharedAdc = Ads114s0x<CriticalSectionRawMutex, SimulatedAds114s0x, NoResetPin, NoopDelay>;

const TRIGGER_THREADS: usize = 4;
const TRIGGERS_PER_THREAD: usize = 8;
const ONE_SHOT_READS: usize = 6;

const STREAM_CHANNEL: u8 = 1;
const ONE_SHOT_CHANNEL: u8 = 9;

/// Frames sent while setting up: RESET, WREG INPMUX, START.
const SETUP_FRAMES: usize = 3;

/// Attached and streaming on `STREAM_CHANNEL`.
fn streaming_adc() -> SharedAdc {
    let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
    chip.set_code(STREAM_CHANNEL, 100);
    chip.set_code(ONE_SHOT_CHANNEL, -900);

    block_on(async {
        let adc: SharedAdc = Ads114s0x::attach(
            DeviceId::Ads114s08,
            chip,
            None,
            NoopDelay::new(),
            DriverConfig::default(),
        )
        .await
        .unwrap();
        let mut mask = adc.new_scan_mask();
        mask.enable(STREAM_CHANNEL).unwrap();
        adc.update_scan_mode(mask).await.unwrap();
        adc.pre_enable().await.unwrap();
        adc
    })
}

/// Split a frame log into the opcode of each transaction.
fn opcodes(chip: &SimulatedAds114s0x) -> Vec<u8> {
    chip.frames()
        .iter()
        .map(|f| *f.first().expect("empty frame"))
        .collect()
}

#[test]
fn test_one_shot_and_triggers_never_interleave() {
    let adc = streaming_adc();
    let trigger: SoftwareTrigger<CriticalSectionRawMutex> = SoftwareTrigger::new();

    let (one_shots, captured) = std::thread::scope(|s| {
        let triggers: Vec<_> = (0..TRIGGER_THREADS)
            .map(|_| {
                s.spawn(|| {
                    let mut sink: heapless::Deque<Sample, TRIGGERS_PER_THREAD> =
                        heapless::Deque::new();
                    for _ in 0..TRIGGERS_PER_THREAD {
                        block_on(adc.on_trigger(&mut sink, &trigger)).unwrap();
                    }
                    sink.iter().copied().collect::<Vec<_>>()
                })
            })
            .collect();

        let reader = s.spawn(|| {
            (0..ONE_SHOT_READS)
                .map(|_| block_on(adc.read_raw(ONE_SHOT_CHANNEL)).unwrap())
                .collect::<Vec<_>>()
        });

        let captured: Vec<Sample> = triggers
            .into_iter()
            .flat_map(|t| t.join().unwrap())
            .collect();
        (reader.join().unwrap(), captured)
    });

    assert!(one_shots.iter().all(|v| *v == -900));
    assert_eq!(captured.len(), TRIGGER_THREADS * TRIGGERS_PER_THREAD);
    assert!(captured
        .iter()
        .all(|s| s.channel == STREAM_CHANNEL && s.value == 100));
    assert_eq!(
        usize::try_from(trigger.completed()).unwrap(),
        TRIGGER_THREADS * TRIGGERS_PER_THREAD
    );

    let (chip, _, _) = adc.free();
    let ops = opcodes(&chip);
    let frames = chip.frames();

    // Every one-shot sequence is five contiguous frames:
    // WREG INPMUX=9, START, RDATA, WREG INPMUX=1, START.
    assert_eq!(&ops[..SETUP_FRAMES], &[0x06, 0x42, 0x08]);
    let mut one_shot_sequences = 0;
    let mut i = SETUP_FRAMES;
    while i < ops.len() {
        if frames[i].as_slice() == [0x42, 0x00, ONE_SHOT_CHANNEL] {
            assert_eq!(&ops[i..i + 5], &[0x42, 0x08, 0x12, 0x42, 0x08]);
            assert_eq!(frames[i + 3].as_slice(), &[0x42, 0x00, STREAM_CHANNEL]);
            one_shot_sequences += 1;
            i += 5;
        } else {
            assert_eq!(ops[i], 0x12, "only RDATA may sit between one-shot sequences");
            assert_eq!(frames[i].len(), 3);
            i += 1;
        }
    }
    assert_eq!(one_shot_sequences, ONE_SHOT_READS);
    assert_eq!(chip.unlogged(), 0);
    assert!(chip.is_converting());
}

#[test]
fn test_concurrent_register_traffic_is_atomic() {
    let adc = streaming_adc();

    std::thread::scope(|s| {
        for reg_value in [0x11u8, 0x22, 0x33] {
            let adc = &adc;
            s.spawn(move || {
                for _ in 0..10 {
                    block_on(adc.write_register(ads114s0x::Register::Vbias, reg_value)).unwrap();
                    let read = block_on(adc.read_register(ads114s0x::Register::Vbias)).unwrap();
                    assert!([0x11, 0x22, 0x33].contains(&read));
                }
            });
        }
    });

    let (chip, _, _) = adc.free();
    for frame in &chip.frames()[SETUP_FRAMES..] {
        match frame.first() {
            Some(0x48) => assert_eq!(frame.len(), 3),
            Some(0x28) => assert_eq!(frame.len(), 2),
            other => panic!("unexpected frame start {other:?}"),
        }
    }
    assert_eq!(chip.frames().len(), SETUP_FRAMES + 60);
}
