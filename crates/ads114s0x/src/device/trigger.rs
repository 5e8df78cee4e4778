//! Streaming session and triggered acquisition
//!
//! A session is bracketed by [`pre_enable`](Ads114s0x::pre_enable) (START)
//! and [`post_disable`](Ads114s0x::post_disable) (STOP). In between, each
//! trigger runs RDATA on the active channel without a per-sample START.
//!
//! The lock covers the bus work only. The sink push and the completion
//! acknowledgement happen after it is released.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Instant;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};
use platform::{Sample, SampleSink, TriggerSource};

use super::Ads114s0x;
use crate::registers::Register;
use crate::scan::{select_channel, ScanMask};
use crate::{Error, Result};

impl<M, SPI, RST, D> Ads114s0x<M, SPI, RST, D>
where
    M: RawMutex,
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    /// Apply a new scan mask and point INPMUX at the channel it selects.
    ///
    /// The lowest enabled channel wins; an empty mask selects channel 0.
    /// The mask must be sized for this part (see
    /// [`new_scan_mask`](Self::new_scan_mask)).
    pub async fn update_scan_mode(&self, mask: ScanMask) -> Result<()> {
        if mask.num_channels() != self.variant.num_channels() {
            return Err(Error::InvalidChannel);
        }
        let channel = select_channel(&mask);

        let mut inner = self.inner.lock().await;
        inner.write_register(Register::Inpmux, channel).await?;
        inner.scan_mask = mask;
        inner.active_channel = channel;
        debug!("scan mask {} -> ch{}", mask.bits(), channel);
        Ok(())
    }

    /// Scan mask last applied with [`update_scan_mode`](Self::update_scan_mode).
    pub async fn scan_mask(&self) -> ScanMask {
        self.inner.lock().await.scan_mask
    }

    /// Channel the trigger path samples.
    pub async fn active_channel(&self) -> u8 {
        self.inner.lock().await.active_channel
    }

    /// Whether a streaming session is running.
    pub async fn is_streaming(&self) -> bool {
        self.inner.lock().await.streaming
    }

    /// Open a streaming session: one START for the whole session.
    ///
    /// Refused with [`Error::InvalidConfiguration`], and no START, when the
    /// scan mask is empty.
    pub async fn pre_enable(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.scan_mask.is_empty() {
            warn!("streaming refused: empty scan mask");
            return Err(Error::InvalidConfiguration);
        }
        inner.start().await?;
        inner.streaming = true;
        info!("streaming on ch{}", inner.active_channel);
        Ok(())
    }

    /// Close the streaming session with one STOP.
    ///
    /// The session is closed and the sequencer left
    /// [`Ready`](super::SequencerState::Ready) even when STOP fails.
    pub async fn post_disable(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.streaming = false;
        inner.stop().await?;
        info!("streaming off");
        Ok(())
    }

    /// Trigger handler: read the active channel, push the sample, then
    /// acknowledge the trigger.
    ///
    /// The trigger is acknowledged on every path. Outside a streaming
    /// session the bus is not touched and [`Error::NotStreaming`] is
    /// returned. On a read failure nothing is pushed and the error is
    /// returned after the acknowledgement.
    pub async fn on_trigger<S, T>(&self, sink: &mut S, trigger: &T) -> Result<()>
    where
        S: SampleSink + ?Sized,
        T: TriggerSource + ?Sized,
    {
        let read = {
            let mut inner = self.inner.lock().await;
            let channel = inner.active_channel;
            if inner.streaming {
                inner.sample(channel).await.map(|value| (channel, value))
            } else {
                Err(Error::NotStreaming)
            }
        };

        let outcome = match read {
            Ok((channel, value)) => {
                sink.push(Sample {
                    channel,
                    value,
                    timestamp_us: Instant::now().as_micros(),
                });
                Ok(())
            }
            Err(e) => {
                warn!("triggered read failed: {}", e);
                Err(e)
            }
        };
        trigger.notify_done();
        outcome
    }
}
