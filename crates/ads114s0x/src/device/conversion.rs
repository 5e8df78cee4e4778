//! One-shot conversion
//!
//! `read_raw(ch)` runs, under one lock:
//!
//! ```text
//! WREG INPMUX=ch → START → wait(period + margin) → RDATA → STOP
//! ```
//!
//! While a streaming session is running the tail is replaced by
//! `WREG INPMUX=<session channel> → START`, so the session resumes on its own
//! input once the one-shot sample is taken.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};

use super::{Ads114s0x, Inner, SequencerState};
use crate::config::DriverConfig;
use crate::registers::{Command, Register};
use crate::{Error, Result};

/// Step of the one-shot sequence, reported when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionStep {
    /// WREG INPMUX.
    SelectInput,
    /// START.
    Start,
    /// RDATA.
    ReadData,
    /// STOP.
    Stop,
    /// Restoring a running streaming session.
    ResumeSession,
}

impl ConversionStep {
    /// Log-friendly name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SelectInput => "select input",
            Self::Start => "start",
            Self::ReadData => "read data",
            Self::Stop => "stop",
            Self::ResumeSession => "resume session",
        }
    }
}

impl<SPI, RST, D> Inner<SPI, RST, D>
where
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    async fn convert_once(
        &mut self,
        channel: u8,
        config: &DriverConfig,
    ) -> core::result::Result<i16, (ConversionStep, Error)> {
        let step = |step: ConversionStep| move |e: Error| (step, e);

        self.write_register(Register::Inpmux, channel)
            .await
            .map_err(step(ConversionStep::SelectInput))?;
        let started = if self.streaming {
            self.restart().await
        } else {
            self.start().await
        };
        started.map_err(step(ConversionStep::Start))?;

        let settle_us = self
            .data_rate
            .period_us()
            .saturating_add(config.settle_margin_us);
        self.delay.delay_us(settle_us).await;

        let value = self
            .read_data()
            .await
            .map_err(step(ConversionStep::ReadData))?;

        if self.streaming {
            let session_channel = self.active_channel;
            self.write_register(Register::Inpmux, session_channel)
                .await
                .map_err(step(ConversionStep::ResumeSession))?;
            self.restart()
                .await
                .map_err(step(ConversionStep::ResumeSession))?;
        } else {
            self.stop().await.map_err(step(ConversionStep::Stop))?;
        }
        Ok(value)
    }

    /// Best-effort return to a stable state after a failed sequence.
    ///
    /// An interrupted session is closed, not resumed: INPMUX goes back to the
    /// session channel and triggers are refused until the next `pre_enable`.
    async fn recover(&mut self) {
        if self.command(Command::Stop).await.is_err() {
            warn!("recovery STOP failed");
        }
        self.state = SequencerState::Ready;
        if self.streaming {
            self.streaming = false;
            let session_channel = self.active_channel;
            if self
                .write_register(Register::Inpmux, session_channel)
                .await
                .is_err()
            {
                warn!("ch{}: INPMUX restore failed", session_channel);
            }
            warn!("streaming session on ch{} closed", session_channel);
        }
    }
}

impl<M, SPI, RST, D> Ads114s0x<M, SPI, RST, D>
where
    M: RawMutex,
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    /// Take one conversion on `channel` and return the raw code.
    ///
    /// Out-of-range channels fail with [`Error::InvalidChannel`] before the
    /// lock is taken. In mock mode the synthetic source answers and the bus
    /// is not touched.
    ///
    /// A transport failure at any step aborts the rest, logs the step, sends
    /// a best-effort STOP and leaves the sequencer
    /// [`Ready`](SequencerState::Ready). There is no retry. A streaming
    /// session running at the time is closed and its channel re-selected.
    pub async fn read_raw(&self, channel: u8) -> Result<i16> {
        if self.variant.channel(channel).is_none() {
            return Err(Error::InvalidChannel);
        }

        let mut inner = self.inner.lock().await;
        if inner.mock_mode {
            return Ok(inner.synthetic.next(channel));
        }

        match inner.convert_once(channel, &self.config).await {
            Ok(value) => {
                debug!("ch{}: {}", channel, value);
                Ok(value)
            }
            Err((step, e)) => {
                error!("ch{}: {} failed: {}", channel, step.name(), e);
                inner.recover().await;
                Err(e)
            }
        }
    }
}
