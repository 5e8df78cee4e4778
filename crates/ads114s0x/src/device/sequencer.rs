//! Command sequencer
//!
//! ```text
//!   Idle ──reset()──▶ Reset ──▶ Ready ──start()──▶ Converting
//!    ▲                  │         ▲                    │
//!    └──reset failed────┘         └──────stop()────────┘
//! ```
//!
//! START while converting and STOP while ready are logged and sent anyway;
//! the chip treats both as no-ops.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};

use super::{Ads114s0x, Inner};
use crate::config::DriverConfig;
use crate::registers::{Command, DataRate};
use crate::{Error, Result};

/// Sequencer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// Not reset since attach, or the last reset failed.
    Idle,
    /// Reset in progress.
    Reset,
    /// Registers valid, no conversion running.
    Ready,
    /// START issued, conversions running.
    Converting,
}

impl SequencerState {
    /// Log-friendly name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Reset => "reset",
            Self::Ready => "ready",
            Self::Converting => "converting",
        }
    }
}

impl<SPI, RST, D> Inner<SPI, RST, D>
where
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    pub(crate) async fn start(&mut self) -> Result<()> {
        if self.state != SequencerState::Ready {
            warn!("START issued while {}", self.state.name());
        }
        self.command(Command::Start).await?;
        self.state = SequencerState::Converting;
        Ok(())
    }

    /// START inside a running session, after a one-shot borrowed the
    /// converter.
    pub(crate) async fn restart(&mut self) -> Result<()> {
        self.command(Command::Start).await?;
        self.state = SequencerState::Converting;
        Ok(())
    }

    /// Send STOP. The sequencer ends up `Ready` even when the transfer
    /// fails.
    pub(crate) async fn stop(&mut self) -> Result<()> {
        if self.state != SequencerState::Converting {
            warn!("STOP issued while {}", self.state.name());
        }
        let outcome = self.command(Command::Stop).await;
        if let Err(e) = outcome {
            error!("STOP failed: {}", e);
        }
        self.state = SequencerState::Ready;
        outcome
    }

    /// Hold RESET low for the configured pulse, then release it.
    async fn pulse_reset_line(&mut self, pulse_ns: u32) -> Result<()> {
        let Some(pin) = self.reset.as_mut() else {
            return Err(Error::Gpio);
        };
        pin.set_low().map_err(|_| Error::Gpio)?;
        self.delay.delay_ns(pulse_ns).await;
        pin.set_high().map_err(|_| Error::Gpio)
    }

    pub(crate) async fn reset(&mut self, config: &DriverConfig) -> Result<()> {
        self.state = SequencerState::Reset;

        let outcome = if self.reset.is_some() {
            let pulse_ns = config.effective_reset_pulse_ns();
            debug!("reset: RESET low for {} ns", pulse_ns);
            self.pulse_reset_line(pulse_ns).await
        } else {
            debug!("reset: RESET command");
            self.command(Command::Reset).await
        };
        if let Err(e) = outcome {
            error!("reset failed: {}", e);
            self.state = SequencerState::Idle;
            return Err(e);
        }

        self.delay.delay_us(config.post_reset_delay_us).await;

        self.data_rate = DataRate::default();
        self.streaming = false;
        self.state = SequencerState::Ready;
        Ok(())
    }
}

impl<M, SPI, RST, D> Ads114s0x<M, SPI, RST, D>
where
    M: RawMutex,
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    /// Reset the chip and wait until it accepts commands.
    ///
    /// Pulses the RESET line when one was supplied, otherwise sends the
    /// RESET command. Leaves the sequencer [`Ready`](SequencerState::Ready)
    /// with the power-on data rate cached; on failure it stays
    /// [`Idle`](SequencerState::Idle).
    pub async fn reset(&self) -> Result<()> {
        self.inner.lock().await.reset(&self.config).await
    }

    /// Send START.
    pub async fn start(&self) -> Result<()> {
        self.inner.lock().await.start().await
    }

    /// Send STOP.
    pub async fn stop(&self) -> Result<()> {
        self.inner.lock().await.stop().await
    }

    /// Send WAKEUP.
    pub async fn wakeup(&self) -> Result<()> {
        self.inner.lock().await.command(Command::Wakeup).await
    }

    /// Send PWRDWN.
    pub async fn power_down(&self) -> Result<()> {
        self.inner.lock().await.command(Command::PowerDown).await
    }
}
