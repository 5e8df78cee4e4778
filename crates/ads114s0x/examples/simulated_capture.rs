//! Streaming capture against the simulated chip.
//!
//! Attaches an ADS114S08B, enables channel 3, runs a streaming session of
//! 20 software triggers and logs every captured sample.
//!
//! ```text
//! RUST_LOG=debug cargo run -p ads114s0x --example simulated_capture --features std
//! ```

use ads114s0x::{
    Ads114s0x, ChannelSink, DeviceId, DriverConfig, NoResetPin, Register, Sample,
    SimulatedAds114s0x, SoftwareTrigger,
};
use embassy_futures::block_on;
use embassy_futures::join::join;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use platform::SpiConfig;
use tracing_subscriber::EnvFilter;

const CAPTURE_CHANNEL: u8 = 3;
const TRIGGERS: usize = 20;

static SAMPLES: Channel<CriticalSectionRawMutex, Sample, TRIGGERS> = Channel::new();
static TRIGGER: SoftwareTrigger<CriticalSectionRawMutex> = SoftwareTrigger::new();

/// Delay that returns immediately; the simulator converts instantly.
struct NoDelay;

impl embedded_hal_async::delay::DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

fn main() -> Result<(), ads114s0x::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let bus = SpiConfig::ads114s0x();
    tracing::info!(
        frequency_hz = bus.frequency,
        valid = bus.is_valid_for_ads114s0x(),
        "SPI bus configuration"
    );

    let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
    chip.set_code(CAPTURE_CHANNEL, 0x1F40);

    block_on(async {
        let adc: Ads114s0x<CriticalSectionRawMutex, _, NoResetPin, _> = Ads114s0x::attach(
            DeviceId::Ads114s08,
            chip,
            None,
            NoDelay,
            DriverConfig::default(),
        )
        .await?;

        let datarate = adc.read_register(Register::Datarate).await?;
        tracing::info!(datarate, "chip ready");

        let mut mask = adc.new_scan_mask();
        mask.enable(CAPTURE_CHANNEL)?;
        adc.update_scan_mode(mask).await?;
        adc.pre_enable().await?;

        let mut sink = ChannelSink::new(SAMPLES.sender());
        let acquisition = async {
            for _ in 0..TRIGGERS {
                TRIGGER.wait().await;
                if let Err(e) = adc.on_trigger(&mut sink, &TRIGGER).await {
                    tracing::warn!(error = %e, "trigger failed");
                }
            }
        };
        let timer = async {
            for fired in 1..=TRIGGERS {
                TRIGGER.fire();
                while usize::try_from(TRIGGER.completed()).unwrap_or(usize::MAX) < fired {
                    embassy_futures::yield_now().await;
                }
            }
        };
        join(acquisition, timer).await;

        adc.post_disable().await?;

        if let Some(spec) = adc.variant().channel(CAPTURE_CHANNEL) {
            tracing::info!(
                channel = spec.index,
                real_bits = spec.real_bits,
                signed = spec.signed,
                "channel layout"
            );
        }
        while let Ok(sample) = SAMPLES.try_receive() {
            tracing::info!(
                channel = sample.channel,
                code = sample.value,
                timestamp_us = sample.timestamp_us,
                "sample"
            );
        }
        tracing::info!(dropped = sink.dropped(), "capture finished");
        Ok::<(), ads114s0x::Error>(())
    })
}
