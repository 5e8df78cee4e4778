//! ADS114S0x device instance
//!
//! One [`Ads114s0x`] owns everything needed to talk to one chip. All bus
//! state lives in [`Inner`] behind a single async mutex:
//!
//! ```text
//! Ads114s0x
//!  ├── id / variant / config     immutable after attach, read without locking
//!  └── Mutex<M, Inner>
//!       ├── spi, reset line, delay
//!       ├── scratch buffer       every frame is built here
//!       ├── sequencer state      Idle → Reset → Ready ⇄ Converting
//!       ├── scan mask / active channel / streaming flag
//!       └── cached DATARATE, mock-mode switch, synthetic source
//! ```
//!
//! Every public operation that touches the bus takes the lock for its whole
//! sequence, so frames from the one-shot path and the trigger path never
//! interleave on the wire. The guard is released by scope on every return
//! path, including `?` exits.
//!
//! The submodules split the implementation by concern:
//! - [`access`]: register frames (WREG / RREG / command / RDATA)
//! - [`sequencer`]: START / STOP / reset and the sequencer state
//! - [`conversion`]: one-shot `read_raw`
//! - [`trigger`]: streaming session hooks and the trigger handler

mod access;
mod conversion;
mod sequencer;
mod trigger;

pub use conversion::ConversionStep;
pub use sequencer::SequencerState;

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};
use platform::config::{DRIVER_NAME, DRIVER_VERSION};
use platform::DmaScratch;

use crate::config::DriverConfig;
use crate::mock::SyntheticSource;
use crate::registers::{DataRate, Register, ID_DEV_MASK};
use crate::scan::ScanMask;
use crate::transaction::SCRATCH_LEN;
use crate::variant::{ChannelSpec, ChipVariant, DeviceId};
use crate::{Error, Result};

/// Placeholder reset line for boards that leave RESET tied high.
///
/// Pass `None::<NoResetPin>` so [`Ads114s0x::reset`] falls back to the RESET
/// command.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResetPin;

impl ErrorType for NoResetPin {
    type Error = Infallible;
}

impl OutputPin for NoResetPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Channel information selector for [`Ads114s0x::read_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InfoMask {
    /// Raw conversion code.
    Raw,
    /// Scale to physical units.
    Scale,
    /// Offset to physical units.
    Offset,
    /// Sampling frequency.
    SamplingFrequency,
}

/// Lock-protected device state.
pub(crate) struct Inner<SPI, RST, D> {
    pub(crate) spi: SPI,
    pub(crate) reset: Option<RST>,
    pub(crate) delay: D,
    pub(crate) scratch: DmaScratch<SCRATCH_LEN>,
    pub(crate) state: SequencerState,
    pub(crate) scan_mask: ScanMask,
    pub(crate) active_channel: u8,
    pub(crate) streaming: bool,
    pub(crate) data_rate: DataRate,
    pub(crate) mock_mode: bool,
    pub(crate) synthetic: SyntheticSource,
}

/// ADS114S06B / ADS114S08B driver.
///
/// Generic over:
/// - `M`: the [`RawMutex`] behind the bus guard. Use
///   `CriticalSectionRawMutex` when the one-shot and trigger paths run on
///   different executors or threads, `NoopRawMutex` otherwise.
/// - `SPI`: an async [`SpiDevice`] (manages CS).
/// - `RST`: optional RESET [`OutputPin`]; see [`NoResetPin`].
/// - `D`: a [`DelayNs`] provider (`embassy_time::Delay` on hardware).
pub struct Ads114s0x<M: RawMutex, SPI, RST, D> {
    id: DeviceId,
    variant: &'static ChipVariant,
    config: DriverConfig,
    inner: Mutex<M, Inner<SPI, RST, D>>,
}

impl<M, SPI, RST, D> Ads114s0x<M, SPI, RST, D>
where
    M: RawMutex,
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create an instance without touching the bus.
    ///
    /// The sequencer starts in [`SequencerState::Idle`]; call
    /// [`reset`](Self::reset) (or use [`attach`](Self::attach)) before
    /// sampling.
    pub fn new(id: DeviceId, spi: SPI, reset: Option<RST>, delay: D, config: DriverConfig) -> Self {
        let variant = id.variant();
        Self {
            id,
            variant,
            config,
            inner: Mutex::new(Inner {
                spi,
                reset,
                delay,
                scratch: DmaScratch::new(),
                state: SequencerState::Idle,
                scan_mask: ScanMask::new(variant.num_channels()),
                active_channel: 0,
                streaming: false,
                data_rate: DataRate::default(),
                mock_mode: false,
                synthetic: SyntheticSource::new(),
            }),
        }
    }

    /// Create an instance and reset the chip.
    pub async fn attach(
        id: DeviceId,
        spi: SPI,
        reset: Option<RST>,
        delay: D,
        config: DriverConfig,
    ) -> Result<Self> {
        let device = Self::new(id, spi, reset, delay, config);
        device.reset().await.inspect_err(|e| {
            error!("{}: attach failed: {}", device.variant.name, e);
        })?;
        info!(
            "{} {}: {} attached, {} channels",
            DRIVER_NAME,
            DRIVER_VERSION,
            device.variant.name,
            device.variant.num_channels()
        );
        Ok(device)
    }

    /// [`attach`](Self::attach) by compatible string (`"ti,ads114s08b"`).
    pub async fn probe(
        compatible: &str,
        spi: SPI,
        reset: Option<RST>,
        delay: D,
        config: DriverConfig,
    ) -> Result<Self> {
        let id = DeviceId::from_compatible(compatible).inspect_err(|_| {
            warn!("no matching device for {}", compatible);
        })?;
        Self::attach(id, spi, reset, delay, config).await
    }

    /// Part this instance was attached as.
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Static part description.
    pub fn variant(&self) -> &'static ChipVariant {
        self.variant
    }

    /// Channel table exposed to the framework.
    pub fn channels(&self) -> &'static [ChannelSpec] {
        self.variant.channels
    }

    /// Timing configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Empty scan mask sized for this part.
    pub fn new_scan_mask(&self) -> ScanMask {
        ScanMask::new(self.variant.num_channels())
    }

    /// Framework read callback.
    ///
    /// Only [`InfoMask::Raw`] is provided; everything else is
    /// [`Error::Unsupported`] and touches nothing.
    pub async fn read_info(&self, channel: u8, mask: InfoMask) -> Result<i16> {
        match mask {
            InfoMask::Raw => self.read_raw(channel).await,
            InfoMask::Scale | InfoMask::Offset | InfoMask::SamplingFrequency => {
                Err(Error::Unsupported)
            }
        }
    }

    /// Compare the ID register's DEV_ID field with the attached part.
    ///
    /// A mismatch is logged and reported as `Ok(false)`; the instance stays
    /// usable.
    pub async fn check_identity(&self) -> Result<bool> {
        let id = self.read_register(Register::Id).await?;
        let dev_id = id & ID_DEV_MASK;
        if dev_id == self.variant.dev_id {
            debug!("{}: DEV_ID {} matches", self.variant.name, dev_id);
            Ok(true)
        } else {
            warn!(
                "{}: DEV_ID {} does not match expected {}",
                self.variant.name, dev_id, self.variant.dev_id
            );
            Ok(false)
        }
    }

    /// Current sequencer state.
    pub async fn state(&self) -> SequencerState {
        self.inner.lock().await.state
    }

    /// Whether the synthetic sample source replaces RDATA.
    pub async fn mock_mode(&self) -> bool {
        self.inner.lock().await.mock_mode
    }

    /// Tear the instance down and hand back the owned peripherals.
    pub fn free(self) -> (SPI, Option<RST>, D) {
        let inner = self.inner.into_inner();
        (inner.spi, inner.reset, inner.delay)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    type TestDevice = Ads114s0x<NoopRawMutex, SpiMock<u8>, NoResetPin, NoopDelay>;

    fn device(id: DeviceId, expectations: &[SpiTransaction<u8>]) -> TestDevice {
        Ads114s0x::new(
            id,
            SpiMock::new(expectations),
            None,
            NoopDelay::new(),
            DriverConfig::default(),
        )
    }

    fn finish(device: TestDevice) {
        let (mut spi, _, _) = device.free();
        spi.done();
    }

    #[tokio::test]
    async fn new_device_is_idle_and_silent() {
        let dev = device(DeviceId::Ads114s08, &[]);
        assert_eq!(dev.state().await, SequencerState::Idle);
        assert_eq!(dev.channels().len(), 12);
        assert!(!dev.mock_mode().await);
        finish(dev);
    }

    #[tokio::test]
    async fn unsupported_info_masks_issue_no_traffic() {
        let dev = device(DeviceId::Ads114s06, &[]);
        for mask in [InfoMask::Scale, InfoMask::Offset, InfoMask::SamplingFrequency] {
            assert_eq!(dev.read_info(0, mask).await, Err(Error::Unsupported));
        }
        finish(dev);
    }

    #[tokio::test]
    async fn identity_matches_dev_id_bits() {
        let dev = device(
            DeviceId::Ads114s08,
            &[
                SpiTransaction::transaction_start(),
                SpiTransaction::write_vec(vec![0x20, 0x00]),
                SpiTransaction::read_vec(vec![0x04]),
                SpiTransaction::transaction_end(),
            ],
        );
        assert_eq!(dev.check_identity().await, Ok(true));
        finish(dev);
    }

    #[tokio::test]
    async fn identity_mismatch_is_not_fatal() {
        let dev = device(
            DeviceId::Ads114s08,
            &[
                SpiTransaction::transaction_start(),
                SpiTransaction::write_vec(vec![0x20, 0x00]),
                SpiTransaction::read_vec(vec![0x05]),
                SpiTransaction::transaction_end(),
            ],
        );
        assert_eq!(dev.check_identity().await, Ok(false));
        finish(dev);
    }

    #[tokio::test]
    async fn probe_rejects_unknown_compatible() {
        use crate::mock::SimulatedAds114s0x;

        let result: Result<Ads114s0x<NoopRawMutex, SimulatedAds114s0x, NoResetPin, NoopDelay>> =
            Ads114s0x::probe(
                "ti,ads1220",
                SimulatedAds114s0x::new(DeviceId::Ads114s08),
                None,
                NoopDelay::new(),
                DriverConfig::default(),
            )
            .await;
        assert!(matches!(result, Err(Error::UnknownDevice)));
    }
}
